use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::source::Source;
use crate::title::TitlePattern;

/// Branch checked out for repository layers that do not name one.
pub const DEFAULT_BRANCH: &str = "master";

/// One declared layer: where its tiddlers come from and which to drop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub source: Source,
    /// Tiddlers removed from this layer before it is merged.
    pub exclude: BTreeSet<TitlePattern>,
    /// Git branch for repository sources. Ignored for other kinds.
    pub branch: Option<String>,
}

impl LayerSpec {
    /// A layer with no exclusions.
    pub fn new(source: Source) -> Self {
        Self {
            source,
            exclude: BTreeSet::new(),
            branch: None,
        }
    }

    /// Add exclusion patterns.
    pub fn excluding<I, S>(mut self, titles: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for title in titles {
            self.exclude.insert(TitlePattern::new(title)?);
        }
        Ok(self)
    }

    /// Set the git branch for a repository source.
    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// The branch to check out, falling back to [`DEFAULT_BRANCH`].
    pub fn effective_branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }
}

/// Which end of the declared layer list wins on collision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precedence {
    /// The first-declared layer wins; the last-declared layer is the base.
    #[default]
    FirstDeclared,
    /// The last-declared layer wins; the first-declared layer is the base.
    LastDeclared,
}

impl Precedence {
    /// Declared indices ordered from highest to lowest precedence.
    pub fn precedence_order(&self, layer_count: usize) -> Vec<usize> {
        match self {
            Self::FirstDeclared => (0..layer_count).collect(),
            Self::LastDeclared => (0..layer_count).rev().collect(),
        }
    }

    /// Declared indices in the order they are folded: lowest precedence first.
    pub fn combination_order(&self, layer_count: usize) -> Vec<usize> {
        let mut order = self.precedence_order(layer_count);
        order.reverse();
        order
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstDeclared => "first-declared",
            Self::LastDeclared => "last-declared",
        }
    }
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Precedence {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-declared" => Ok(Self::FirstDeclared),
            "last-declared" => Ok(Self::LastDeclared),
            other => Err(TypeError::UnknownPrecedence(other.to_string())),
        }
    }
}

/// The full layer stack for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Layers in declared order.
    pub layers: Vec<LayerSpec>,
    pub precedence: Precedence,
}

impl Configuration {
    /// Build and validate a configuration with the default precedence.
    pub fn new(layers: Vec<LayerSpec>) -> Result<Self, TypeError> {
        let config = Self {
            layers,
            precedence: Precedence::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Check the structural rules every run relies on.
    ///
    /// The layer list must be non-empty and every source location must be
    /// non-blank. Patterns are non-empty by construction.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.layers.is_empty() {
            return Err(TypeError::NoLayers);
        }
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.source.location.trim().is_empty() {
                return Err(TypeError::InvalidLayer {
                    index,
                    source_location: layer.source.location.clone(),
                    reason: "source must not be empty".into(),
                });
            }
            if let Some(branch) = &layer.branch {
                if branch.trim().is_empty() {
                    return Err(TypeError::InvalidLayer {
                        index,
                        source_location: layer.source.location.clone(),
                        reason: "branch must not be empty".into(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Declared indices in fold order (lowest precedence first).
    pub fn combination_order(&self) -> Vec<usize> {
        self.precedence.combination_order(self.layers.len())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
