use std::fs;
use std::path::Path;

use tracing::debug;
use twc_types::Configuration;

use crate::error::{ConfigError, ConfigResult};
use crate::raw::RawConfig;

/// Syntax of a configuration document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Parse a YAML document.
pub fn parse_yaml(text: &str) -> ConfigResult<Configuration> {
    parse(text, ConfigFormat::Yaml, None)
}

/// Parse a TOML document.
pub fn parse_toml(text: &str) -> ConfigResult<Configuration> {
    parse(text, ConfigFormat::Toml, None)
}

/// Parse a document in `format`, rebasing relative local paths on `base_dir`.
pub fn parse(
    text: &str,
    format: ConfigFormat,
    base_dir: Option<&Path>,
) -> ConfigResult<Configuration> {
    let raw: RawConfig = match format {
        ConfigFormat::Yaml => {
            // An empty YAML document decodes to unit, not a mapping.
            if text.trim().is_empty() {
                return Err(ConfigError::MissingLayers);
            }
            serde_yaml::from_str(text)?
        }
        ConfigFormat::Toml => toml::from_str(text)?,
    };
    raw.into_configuration(base_dir)
}

/// Read and validate a configuration file.
///
/// Relative local-path sources are resolved against the file's directory.
pub fn load_file(path: &Path) -> ConfigResult<Configuration> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let format = ConfigFormat::from_path(path);
    let base_dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let config = parse(&text, format, base_dir)?;
    debug!(
        path = %path.display(),
        ?format,
        layers = config.layers.len(),
        precedence = %config.precedence,
        "loaded configuration"
    );
    Ok(config)
}
