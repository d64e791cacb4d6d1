use twc_merge::MergedTree;

use crate::artifact::Artifact;
use crate::error::BuildResult;

/// Compiles a merged tree into a single output file.
///
/// Invokers receive the tree by reference and must not retain it. A failed
/// build returns an error and no artifact.
pub trait BuildInvoker: Send + Sync {
    /// Short name for logs, e.g. `"tiddlywiki"`.
    fn name(&self) -> &str;

    fn compile(&self, tree: &MergedTree) -> BuildResult<Artifact>;
}
