use std::sync::Mutex;

use twc_merge::MergedTree;
use twc_types::TreeDigest;

use crate::artifact::Artifact;
use crate::error::{BuildError, BuildResult};
use crate::invoker::BuildInvoker;

/// A build invoker that never leaves the process.
///
/// Returns the same artifact for every call and remembers the digest of each
/// tree it was handed. Used to check when, and with what, a build ran.
pub struct RecordingBuilder {
    artifact: Artifact,
    failure: Option<String>,
    seen: Mutex<Vec<TreeDigest>>,
}

impl RecordingBuilder {
    pub fn new(artifact: Artifact) -> Self {
        Self {
            artifact,
            failure: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Fail every call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            artifact: Artifact::new("index.html", Vec::new()),
            failure: Some(message.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().expect("lock poisoned").len()
    }

    /// Digests of the trees passed to `compile`, in call order.
    pub fn seen(&self) -> Vec<TreeDigest> {
        self.seen.lock().expect("lock poisoned").clone()
    }
}

impl Default for RecordingBuilder {
    fn default() -> Self {
        Self::new(Artifact::new("index.html", b"<!doctype html>".to_vec()))
    }
}

impl BuildInvoker for RecordingBuilder {
    fn name(&self) -> &str {
        "recording"
    }

    fn compile(&self, tree: &MergedTree) -> BuildResult<Artifact> {
        self.seen.lock().expect("lock poisoned").push(tree.digest());
        match &self.failure {
            Some(message) => Err(BuildError::Injected(message.clone())),
            None => Ok(self.artifact.clone()),
        }
    }
}

impl std::fmt::Debug for RecordingBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingBuilder")
            .field("artifact", &self.artifact.name)
            .field("calls", &self.call_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_each_tree() {
        let builder = RecordingBuilder::default();
        let tree = MergedTree::new();
        let artifact = builder.compile(&tree).unwrap();
        assert_eq!(artifact.name, "index.html");
        assert_eq!(builder.seen(), vec![tree.digest()]);
    }

    #[test]
    fn failing_builder_still_records() {
        let builder = RecordingBuilder::failing("no node");
        let err = builder.compile(&MergedTree::new()).unwrap_err();
        assert_eq!(err.to_string(), "no node");
        assert_eq!(builder.call_count(), 1);
    }
}
