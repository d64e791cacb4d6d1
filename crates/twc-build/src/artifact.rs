use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BuildResult;

/// The compiled output of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// File name the build produced, e.g. `index.html`.
    pub name: String,
    pub content: Vec<u8>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Write the artifact to `path`, creating parent directories.
    ///
    /// The content goes to a sibling temporary file first and is renamed into
    /// place, so a failed write never leaves a truncated output behind.
    pub fn write_to(&self, path: &Path) -> BuildResult<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        std::io::Write::write_all(&mut staged, &self.content)?;
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
