use std::sync::Arc;

use twc_types::{LayerSpec, LayerTree, SourceKind};

use crate::error::SourceResult;
use crate::git::GitResolver;
use crate::local::LocalPathResolver;
use crate::remote::RemoteDocumentResolver;
use crate::tiddlywiki::TiddlyWikiCli;
use crate::traits::SourceResolver;

/// Routes each layer to the resolver for its [`SourceKind`].
///
/// The match is exhaustive: adding a kind forces a decision here.
pub struct DispatchingResolver {
    repository: Arc<dyn SourceResolver>,
    remote_document: Arc<dyn SourceResolver>,
    local_path: Arc<dyn SourceResolver>,
}

impl DispatchingResolver {
    /// Wire up one resolver per kind.
    pub fn new(
        repository: Arc<dyn SourceResolver>,
        remote_document: Arc<dyn SourceResolver>,
        local_path: Arc<dyn SourceResolver>,
    ) -> Self {
        Self {
            repository,
            remote_document,
            local_path,
        }
    }

    /// The standard resolvers: `git`, HTTP plus `tiddlywiki`, and the local
    /// filesystem relative to `base_dir`.
    pub fn standard(
        cli: TiddlyWikiCli,
        base_dir: Option<std::path::PathBuf>,
    ) -> SourceResult<Self> {
        let local = match base_dir {
            Some(dir) => LocalPathResolver::with_base_dir(dir),
            None => LocalPathResolver::new(),
        };
        Ok(Self::new(
            Arc::new(GitResolver::new()),
            Arc::new(RemoteDocumentResolver::new(cli)?),
            Arc::new(local),
        ))
    }

    fn route(&self, kind: SourceKind) -> &dyn SourceResolver {
        match kind {
            SourceKind::Repository => self.repository.as_ref(),
            SourceKind::RemoteDocument => self.remote_document.as_ref(),
            SourceKind::LocalPath => self.local_path.as_ref(),
        }
    }
}

impl SourceResolver for DispatchingResolver {
    fn resolve(&self, layer: &LayerSpec) -> SourceResult<LayerTree> {
        self.route(layer.source.kind).resolve(layer)
    }
}
