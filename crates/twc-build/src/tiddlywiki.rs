use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use twc_merge::MergedTree;
use twc_source::{write_folder, TiddlyWikiCli};

use crate::artifact::Artifact;
use crate::error::{BuildError, BuildResult};
use crate::invoker::BuildInvoker;

/// Build target passed to `tiddlywiki --build`.
pub const DEFAULT_TARGET: &str = "index";

/// Where the `index` target leaves its output, relative to the wiki folder.
pub const DEFAULT_OUTPUT: &str = "output/index.html";

/// Compiles a merged tree with the `tiddlywiki` command-line tool.
///
/// Each call writes the tree into a fresh scratch directory, runs
/// `tiddlywiki <dir> --build <target>` there and reads back the output file.
/// The scratch directory is removed when the call returns.
#[derive(Clone, Debug)]
pub struct TiddlyWikiBuilder {
    cli: TiddlyWikiCli,
    target: String,
    output: PathBuf,
}

impl TiddlyWikiBuilder {
    pub fn new(cli: TiddlyWikiCli) -> Self {
        Self {
            cli,
            target: DEFAULT_TARGET.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }

    /// Use a different build target, reading its output from `output`.
    pub fn with_target(mut self, target: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        self.target = target.into();
        self.output = output.into();
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl Default for TiddlyWikiBuilder {
    fn default() -> Self {
        Self::new(TiddlyWikiCli::default())
    }
}

impl BuildInvoker for TiddlyWikiBuilder {
    fn name(&self) -> &str {
        "tiddlywiki"
    }

    fn compile(&self, tree: &MergedTree) -> BuildResult<Artifact> {
        let scratch = tempfile::Builder::new().prefix("twc-build-").tempdir()?;
        let wiki_dir = scratch.path().join("wiki");
        fs::create_dir_all(&wiki_dir)?;

        let written = write_folder(tree.iter(), &wiki_dir)?;
        debug!(dir = %wiki_dir.display(), files = written, "materialized merged tree");

        self.cli.build(&wiki_dir, &self.target)?;

        let produced = wiki_dir.join(&self.output);
        if !produced.is_file() {
            return Err(BuildError::MissingOutput(self.output.clone()));
        }
        let content = fs::read(&produced)?;
        let name = self
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.target.clone());

        info!(target = %self.target, bytes = content.len(), "build finished");
        Ok(Artifact::new(name, content))
    }
}
