//! The configuration document as written, before validation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use twc_types::{
    Configuration, LayerSpec, Precedence, Source, SourceKind, TitlePattern, TypeError,
};

use crate::error::{ConfigError, ConfigResult};

/// Top-level document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub layers: Option<Vec<RawLayer>>,
    #[serde(default)]
    pub precedence: Option<Precedence>,
}

/// One `layers` record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLayer {
    pub source: String,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub branch: Option<String>,
    /// Overrides the classification of `source`.
    #[serde(default)]
    pub kind: Option<SourceKind>,
}

impl RawLayer {
    fn into_layer(self, index: usize, base_dir: Option<&Path>) -> ConfigResult<LayerSpec> {
        let invalid = |reason: String| TypeError::InvalidLayer {
            index,
            source_location: self.source.clone(),
            reason,
        };

        let source = match self.kind {
            Some(kind) => Source::with_kind(self.source.clone(), kind),
            None => Source::new(self.source.clone()),
        }
        .map_err(|e| invalid(e.to_string()))?;
        let source = rebase_local(source, base_dir);

        let mut spec = LayerSpec::new(source);
        for title in &self.exclude {
            let pattern = TitlePattern::new(title.clone()).map_err(|e| invalid(e.to_string()))?;
            spec.exclude.insert(pattern);
        }
        spec.branch = self.branch.clone();
        Ok(spec)
    }
}

impl RawConfig {
    /// Validate and convert into a [`Configuration`].
    ///
    /// Relative local paths are joined onto `base_dir` when it is given.
    pub fn into_configuration(self, base_dir: Option<&Path>) -> ConfigResult<Configuration> {
        let layers = self.layers.ok_or(ConfigError::MissingLayers)?;
        let layers = layers
            .into_iter()
            .enumerate()
            .map(|(index, layer)| layer.into_layer(index, base_dir))
            .collect::<ConfigResult<Vec<_>>>()?;

        let config = Configuration {
            layers,
            precedence: self.precedence.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

fn rebase_local(source: Source, base_dir: Option<&Path>) -> Source {
    match (source.kind, base_dir) {
        (SourceKind::LocalPath, Some(base)) if Path::new(&source.location).is_relative() => {
            Source {
                location: base.join(&source.location).display().to_string(),
                kind: source.kind,
            }
        }
        _ => source,
    }
}
