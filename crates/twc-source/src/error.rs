use std::path::PathBuf;

use crate::tiddlywiki::ToolError;

/// Errors from resolving a layer source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The local path does not exist or is not a directory.
    #[error("wiki folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    /// A git command failed.
    #[error("`{command}` failed (exit code {exit_code:?}): {stderr}")]
    Git {
        command: String,
        stderr: String,
        exit_code: Option<i32>,
    },

    /// Downloading a remote document failed.
    #[error("fetching {url} failed: {reason}")]
    Http { url: String, reason: String },

    /// The `tiddlywiki` executable failed.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Walking a folder failed.
    #[error("walking {}: {reason}", path.display())]
    Walk { path: PathBuf, reason: String },

    /// A tree key cannot be written below the target folder.
    #[error("refusing to write entry outside the wiki folder: {0}")]
    UnsafePath(String),

    /// A merged folder would be written over existing files.
    #[error("output folder is not empty: {}", .0.display())]
    OutputNotEmpty(PathBuf),

    /// The resolver does not know this source.
    #[error("unknown source: {0}")]
    UnknownSource(String),

    /// A failure configured on an in-memory resolver.
    #[error("{0}")]
    Injected(String),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
