//! Title matching for exclusion lists.

use std::collections::BTreeSet;

use twc_types::{Title, TitlePattern};

/// Returns `true` when `title` is excluded by `pattern`.
///
/// Matching is literal: the title must equal the pattern exactly. There is no
/// wildcard, regex or case folding.
pub fn matches(title: &Title, pattern: &TitlePattern) -> bool {
    title.as_str() == pattern.as_str()
}

/// The exclusion list of one layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    patterns: BTreeSet<TitlePattern>,
}

impl ExclusionSet {
    pub fn new(patterns: BTreeSet<TitlePattern>) -> Self {
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if any pattern matches `title`.
    ///
    /// Entries without a title are never excluded.
    pub fn matches_any(&self, title: Option<&Title>) -> bool {
        let Some(title) = title else {
            return false;
        };
        self.patterns.iter().any(|pattern| matches(title, pattern))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &TitlePattern> {
        self.patterns.iter()
    }
}

impl From<&BTreeSet<TitlePattern>> for ExclusionSet {
    fn from(patterns: &BTreeSet<TitlePattern>) -> Self {
        Self::new(patterns.clone())
    }
}

impl FromIterator<TitlePattern> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = TitlePattern>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
