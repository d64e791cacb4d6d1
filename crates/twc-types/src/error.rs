use thiserror::Error;

/// Errors produced while constructing or validating core types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("tiddler title must not be empty")]
    EmptyTitle,

    #[error("exclusion pattern must not be empty")]
    EmptyPattern,

    #[error("layer source must not be empty")]
    EmptySource,

    #[error("configuration must declare at least one layer")]
    NoLayers,

    #[error("layer {index} ({source_location}): {reason}")]
    InvalidLayer {
        index: usize,
        source_location: String,
        reason: String,
    },

    #[error("unknown source kind: {0}")]
    UnknownSourceKind(String),

    #[error("unknown precedence: {0}")]
    UnknownPrecedence(String),
}
