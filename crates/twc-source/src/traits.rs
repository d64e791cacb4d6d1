use twc_types::{LayerSpec, LayerTree};

use crate::error::SourceResult;

/// Resolves a declared layer into its tree of tiddlers.
///
/// All implementations must satisfy these invariants:
/// - The returned tree is complete; no entry is fetched lazily afterwards.
/// - Resolution of one layer never observes another layer's tree.
/// - Exclusions are not applied here. The caller filters the returned tree.
/// - Failures are returned as errors, never as partial trees.
///
/// Resolvers are `Send + Sync` so several layers can be resolved at once.
pub trait SourceResolver: Send + Sync {
    /// Materialize the tree for `layer`.
    ///
    /// Only `layer.source` and, for repositories, `layer.branch` are read.
    fn resolve(&self, layer: &LayerSpec) -> SourceResult<LayerTree>;
}

impl<R: SourceResolver + ?Sized> SourceResolver for std::sync::Arc<R> {
    fn resolve(&self, layer: &LayerSpec) -> SourceResult<LayerTree> {
        (**self).resolve(layer)
    }
}

impl<R: SourceResolver + ?Sized> SourceResolver for Box<R> {
    fn resolve(&self, layer: &LayerSpec) -> SourceResult<LayerTree> {
        (**self).resolve(layer)
    }
}
