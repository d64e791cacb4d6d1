use std::path::PathBuf;

use tracing::info;
use twc_types::{LayerSpec, LayerTree};

use crate::error::SourceResult;
use crate::folder::read_folder;
use crate::traits::SourceResolver;

/// Reads a wiki folder from the local filesystem.
///
/// Relative locations are joined onto `base_dir` when one is set, otherwise
/// they are relative to the process working directory.
#[derive(Clone, Debug, Default)]
pub struct LocalPathResolver {
    base_dir: Option<PathBuf>,
}

impl LocalPathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn path_for(&self, location: &str) -> PathBuf {
        let path = PathBuf::from(location);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }
}

impl SourceResolver for LocalPathResolver {
    fn resolve(&self, layer: &LayerSpec) -> SourceResult<LayerTree> {
        let path = self.path_for(&layer.source.location);
        info!(path = %path.display(), "reading local wiki folder");
        read_folder(&path)
    }
}
