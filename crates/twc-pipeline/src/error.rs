use twc_build::BuildError;
use twc_source::SourceError;
use twc_types::TypeError;

use crate::phase::PipelinePhase;

/// Errors that abort a pipeline run.
///
/// Every variant belongs to exactly one phase; see [`PipelineError::phase`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The configuration failed validation. Nothing was resolved.
    #[error("configuration error: {0}")]
    Configuration(#[from] TypeError),

    /// A layer's source could not be resolved. Later layers were not resolved.
    #[error("resolving layer {index} ({location}): {error}")]
    Resolution {
        index: usize,
        location: String,
        #[source]
        error: SourceError,
    },

    /// Filtering a layer failed. Literal title matching cannot fail, so this
    /// is only produced by future pattern kinds.
    #[error("filtering layer {index}: {reason}")]
    Filter { index: usize, reason: String },

    /// The build invoker failed after a successful merge.
    #[error("build failed: {0}")]
    Build(#[from] BuildError),
}

impl PipelineError {
    /// The phase the run was in when the error occurred.
    pub fn phase(&self) -> PipelinePhase {
        match self {
            Self::Configuration(_) => PipelinePhase::Validating,
            Self::Resolution { .. } => PipelinePhase::Resolving,
            Self::Filter { .. } => PipelinePhase::Filtering,
            Self::Build(_) => PipelinePhase::Building,
        }
    }

    /// Declared index of the offending layer, if the error concerns one.
    pub fn layer_index(&self) -> Option<usize> {
        match self {
            Self::Resolution { index, .. } | Self::Filter { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_their_phase() {
        let resolution = PipelineError::Resolution {
            index: 1,
            location: "./b".into(),
            error: SourceError::UnknownSource("./b".into()),
        };
        assert_eq!(resolution.phase(), PipelinePhase::Resolving);
        assert_eq!(resolution.layer_index(), Some(1));
        assert!(resolution.to_string().starts_with("resolving layer 1 (./b)"));

        let config = PipelineError::from(TypeError::NoLayers);
        assert_eq!(config.phase(), PipelinePhase::Validating);
        assert_eq!(config.layer_index(), None);

        let build = PipelineError::from(BuildError::Injected("boom".into()));
        assert_eq!(build.phase(), PipelinePhase::Building);
    }
}
