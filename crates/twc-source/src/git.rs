use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;
use twc_types::{LayerSpec, LayerTree};

use crate::error::{SourceError, SourceResult};
use crate::folder::read_folder;
use crate::traits::SourceResolver;

/// Shallow-clones a git repository and reads it as a wiki folder.
///
/// The clone lives in a temporary directory that is removed once the tree has
/// been read. The branch comes from the layer, defaulting to
/// [`twc_types::DEFAULT_BRANCH`].
#[derive(Clone, Debug)]
pub struct GitResolver {
    program: PathBuf,
}

impl GitResolver {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }

    /// Use a specific `git` executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn clone_into(&self, url: &str, branch: &str, dest: &Path) -> SourceResult<()> {
        let dest_arg = dest.display().to_string();
        let args = [
            "clone",
            "--quiet",
            "--depth",
            "1",
            "--single-branch",
            "--branch",
            branch,
            url,
            dest_arg.as_str(),
        ];
        let out = Command::new(&self.program).args(args).output()?;
        if out.status.success() {
            Ok(())
        } else {
            Err(SourceError::Git {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_owned(),
                exit_code: out.status.code(),
            })
        }
    }
}

impl Default for GitResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceResolver for GitResolver {
    fn resolve(&self, layer: &LayerSpec) -> SourceResult<LayerTree> {
        let url = &layer.source.location;
        let branch = layer.effective_branch();
        info!(%url, %branch, "cloning wiki repository");

        let scratch = tempfile::Builder::new().prefix("twc-git-").tempdir()?;
        let checkout = scratch.path().join("checkout");
        self.clone_into(url, branch, &checkout)?;
        read_folder(&checkout)
    }
}
