//! Configuration loading for the TiddlyWiki combobulator.
//!
//! The loader is the only place configuration syntax is understood. It
//! decodes YAML or TOML into a raw, loosely-typed document, then validates
//! and converts it into a [`twc_types::Configuration`]. Everything past this
//! crate works with the validated value only.
//!
//! ```rust
//! let config = twc_config::parse_yaml(
//!     r#"
//! layers:
//!   - source: ./overrides
//!     exclude: ["$:/SiteTitle"]
//!   - source: https://github.com/example/base-wiki.git
//! "#,
//! )
//! .unwrap();
//! assert_eq!(config.layers.len(), 2);
//! ```

pub mod error;
pub mod loader;
pub mod raw;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_file, parse, parse_toml, parse_yaml, ConfigFormat};
pub use raw::{RawConfig, RawLayer};
