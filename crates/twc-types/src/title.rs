use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The title of a tiddler: the only identity a tiddler has inside a layer.
///
/// Titles are compared byte for byte. TiddlyWiki titles are case-sensitive and
/// may contain spaces, slashes and `$:/` system prefixes, so no normalization
/// is applied.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Create a title, rejecting the empty string.
    pub fn new(title: impl Into<String>) -> Result<Self, TypeError> {
        let title = title.into();
        if title.is_empty() {
            return Err(TypeError::EmptyTitle);
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Title({:?})", self.0)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Title {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A pattern naming tiddlers to exclude from a layer.
///
/// Patterns are literal titles. A pattern matches a tiddler only when the
/// tiddler's title is exactly equal to it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TitlePattern(String);

impl TitlePattern {
    /// Create a pattern, rejecting the empty string.
    pub fn new(pattern: impl Into<String>) -> Result<Self, TypeError> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(TypeError::EmptyPattern);
        }
        Ok(Self(pattern))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TitlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TitlePattern({:?})", self.0)
    }
}

impl fmt::Display for TitlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TitlePattern {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TitlePattern> for String {
    fn from(pattern: TitlePattern) -> Self {
        pattern.0
    }
}
