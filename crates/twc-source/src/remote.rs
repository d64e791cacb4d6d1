use std::fs;
use std::time::Duration;

use tracing::info;
use twc_types::{LayerSpec, LayerTree};

use crate::error::{SourceError, SourceResult};
use crate::folder::read_folder;
use crate::tiddlywiki::TiddlyWikiCli;
use crate::traits::SourceResolver;

const USER_AGENT: &str = concat!("twc/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Downloads a single-file HTML wiki and explodes it into a wiki folder.
pub struct RemoteDocumentResolver {
    client: reqwest::blocking::Client,
    cli: TiddlyWikiCli,
}

impl RemoteDocumentResolver {
    /// Create a resolver that explodes documents with `cli`.
    pub fn new(cli: TiddlyWikiCli) -> SourceResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| SourceError::Http {
                url: String::new(),
                reason: format!("building HTTP client: {e}"),
            })?;
        Ok(Self { client, cli })
    }

    fn download(&self, url: &str) -> SourceResult<Vec<u8>> {
        let response = self.client.get(url).send().map_err(|e| SourceError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(SourceError::Http {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| SourceError::Http {
                url: url.to_string(),
                reason: format!("reading body: {e}"),
            })
    }
}

impl SourceResolver for RemoteDocumentResolver {
    fn resolve(&self, layer: &LayerSpec) -> SourceResult<LayerTree> {
        let url = &layer.source.location;
        info!(%url, "fetching remote wiki document");
        let html = self.download(url)?;

        let scratch = tempfile::Builder::new().prefix("twc-remote-").tempdir()?;
        let document = scratch.path().join("index.html");
        let folder = scratch.path().join("dist");
        fs::write(&document, &html)?;

        self.cli.explode(&document, &folder, scratch.path())?;
        read_folder(&folder)
    }
}

impl std::fmt::Debug for RemoteDocumentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDocumentResolver")
            .field("cli", &self.cli)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twc_types::{Source, SourceKind};

    #[test]
    fn unreachable_host_is_an_http_error() {
        let resolver = RemoteDocumentResolver::new(TiddlyWikiCli::default()).unwrap();
        let layer = LayerSpec::new(
            Source::with_kind("http://127.0.0.1:1/wiki.html", SourceKind::RemoteDocument).unwrap(),
        );
        match resolver.resolve(&layer) {
            Err(SourceError::Http { url, .. }) => assert_eq!(url, "http://127.0.0.1:1/wiki.html"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
