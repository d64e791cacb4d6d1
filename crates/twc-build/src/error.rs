use std::path::PathBuf;

use twc_source::{SourceError, ToolError};

/// Errors from compiling a merged tree.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The merged tree could not be written to the scratch folder.
    #[error("writing wiki folder: {0}")]
    Materialize(#[from] SourceError),

    /// The `tiddlywiki` build command failed.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The build finished but did not produce the expected file.
    #[error("build produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    /// A failure configured on a recording builder.
    #[error("{0}")]
    Injected(String),

    /// I/O error while preparing or collecting the build.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;
