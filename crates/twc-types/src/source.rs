use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// How a layer's tiddlers are obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// A git repository containing a wiki folder.
    Repository,
    /// A single-file HTML wiki fetched over HTTP(S).
    RemoteDocument,
    /// A wiki folder on the local filesystem.
    LocalPath,
}

impl SourceKind {
    /// Classify a source location.
    ///
    /// Rules are evaluated in order, so a `https://github.com/...` URL is a
    /// repository and not a remote document:
    ///
    /// 1. ends with `.git` or mentions `github.com` → [`SourceKind::Repository`]
    /// 2. starts with `http` → [`SourceKind::RemoteDocument`]
    /// 3. anything else → [`SourceKind::LocalPath`]
    pub fn classify(location: &str) -> Self {
        if location.ends_with(".git") || location.contains("github.com") {
            Self::Repository
        } else if location.starts_with("http") {
            Self::RemoteDocument
        } else {
            Self::LocalPath
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::RemoteDocument => "remote-document",
            Self::LocalPath => "local-path",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repository" | "git" => Ok(Self::Repository),
            "remote-document" | "remote" => Ok(Self::RemoteDocument),
            "local-path" | "local" => Ok(Self::LocalPath),
            other => Err(TypeError::UnknownSourceKind(other.to_string())),
        }
    }
}

/// A classified layer source.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    /// URL or filesystem path as written in the configuration.
    pub location: String,
    /// Decided once, when the configuration is loaded.
    pub kind: SourceKind,
}

impl Source {
    /// Create a source, classifying the location with [`SourceKind::classify`].
    pub fn new(location: impl Into<String>) -> Result<Self, TypeError> {
        let location = location.into();
        if location.trim().is_empty() {
            return Err(TypeError::EmptySource);
        }
        let kind = SourceKind::classify(&location);
        Ok(Self { location, kind })
    }

    /// Create a source with an explicit kind, bypassing classification.
    pub fn with_kind(location: impl Into<String>, kind: SourceKind) -> Result<Self, TypeError> {
        let location = location.into();
        if location.trim().is_empty() {
            return Err(TypeError::EmptySource);
        }
        Ok(Self { location, kind })
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.location, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_git_suffix_is_repository() {
        assert_eq!(
            SourceKind::classify("https://example.org/wikis/base.git"),
            SourceKind::Repository
        );
        assert_eq!(
            SourceKind::classify("git@example.org:wikis/base.git"),
            SourceKind::Repository
        );
    }

    #[test]
    fn github_url_is_repository_even_without_suffix() {
        assert_eq!(
            SourceKind::classify("https://github.com/example/wiki"),
            SourceKind::Repository
        );
    }

    #[test]
    fn http_url_is_remote_document() {
        assert_eq!(
            SourceKind::classify("https://tiddlywiki.com/empty.html"),
            SourceKind::RemoteDocument
        );
        assert_eq!(
            SourceKind::classify("http://localhost:8080/"),
            SourceKind::RemoteDocument
        );
    }

    #[test]
    fn anything_else_is_local_path() {
        assert_eq!(SourceKind::classify("./wiki"), SourceKind::LocalPath);
        assert_eq!(SourceKind::classify("/srv/wikis/notes"), SourceKind::LocalPath);
    }

    #[test]
    fn blank_source_is_rejected() {
        assert_eq!(Source::new("   "), Err(TypeError::EmptySource));
    }

    #[test]
    fn explicit_kind_overrides_classification() {
        let source = Source::with_kind("https://github.com/x/y/raw/wiki.html", SourceKind::RemoteDocument)
            .unwrap();
        assert_eq!(source.kind, SourceKind::RemoteDocument);
    }

    #[test]
    fn kind_parses_long_and_short_names() {
        assert_eq!("repository".parse::<SourceKind>().unwrap(), SourceKind::Repository);
        assert_eq!("remote".parse::<SourceKind>().unwrap(), SourceKind::RemoteDocument);
        assert_eq!("local-path".parse::<SourceKind>().unwrap(), SourceKind::LocalPath);
        assert!("ftp".parse::<SourceKind>().is_err());
    }
}
