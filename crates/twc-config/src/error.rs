use std::path::PathBuf;

use twc_types::TypeError;

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML syntax or shape error.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML syntax or shape error.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The document has no `layers` list.
    #[error("invalid configuration: 'layers' list not found")]
    MissingLayers,

    /// A layer record failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] TypeError),
}

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
