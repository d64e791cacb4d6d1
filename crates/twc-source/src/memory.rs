use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use twc_types::{LayerSpec, LayerTree};

use crate::error::{SourceError, SourceResult};
use crate::traits::SourceResolver;

/// In-memory resolver keyed by source location.
///
/// Intended for tests and embedding. Every call to [`SourceResolver::resolve`]
/// is recorded, whether it succeeds or not, so callers can check which layers
/// were resolved and in what order.
pub struct InMemoryResolver {
    trees: RwLock<HashMap<String, LayerTree>>,
    failures: RwLock<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryResolver {
    /// Create a resolver that knows no sources.
    pub fn new() -> Self {
        Self {
            trees: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Register the tree returned for `location`.
    pub fn insert(&self, location: impl Into<String>, tree: LayerTree) {
        self.trees
            .write()
            .expect("lock poisoned")
            .insert(location.into(), tree);
    }

    /// Builder form of [`Self::insert`].
    pub fn with_tree(self, location: impl Into<String>, tree: LayerTree) -> Self {
        self.insert(location, tree);
        self
    }

    /// Make resolution of `location` fail with `message`.
    pub fn fail(&self, location: impl Into<String>, message: impl Into<String>) {
        self.failures
            .write()
            .expect("lock poisoned")
            .insert(location.into(), message.into());
    }

    /// Builder form of [`Self::fail`].
    pub fn with_failure(self, location: impl Into<String>, message: impl Into<String>) -> Self {
        self.fail(location, message);
        self
    }

    /// Locations passed to `resolve`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// Number of `resolve` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock poisoned").len()
    }
}

impl Default for InMemoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceResolver for InMemoryResolver {
    fn resolve(&self, layer: &LayerSpec) -> SourceResult<LayerTree> {
        let location = &layer.source.location;
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(location.clone());

        if let Some(message) = self.failures.read().expect("lock poisoned").get(location) {
            return Err(SourceError::Injected(message.clone()));
        }

        self.trees
            .read()
            .expect("lock poisoned")
            .get(location)
            .cloned()
            .ok_or_else(|| SourceError::UnknownSource(location.clone()))
    }
}

impl std::fmt::Debug for InMemoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sources = self.trees.read().expect("lock poisoned").len();
        f.debug_struct("InMemoryResolver")
            .field("sources", &sources)
            .field("calls", &self.call_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twc_types::Source;

    fn layer(location: &str) -> LayerSpec {
        LayerSpec::new(Source::new(location).unwrap())
    }

    #[test]
    fn resolves_registered_tree() {
        let tree = LayerTree::from_tiddlers([("Foo", "1")]).unwrap();
        let resolver = InMemoryResolver::new().with_tree("a", tree.clone());
        assert_eq!(resolver.resolve(&layer("a")).unwrap(), tree);
    }

    #[test]
    fn unknown_source_is_an_error() {
        let resolver = InMemoryResolver::new();
        let err = resolver.resolve(&layer("missing")).unwrap_err();
        assert!(matches!(err, SourceError::UnknownSource(ref s) if s == "missing"));
    }

    #[test]
    fn failure_wins_over_tree() {
        let resolver = InMemoryResolver::new()
            .with_tree("a", LayerTree::new())
            .with_failure("a", "network unreachable");
        let err = resolver.resolve(&layer("a")).unwrap_err();
        assert_eq!(err.to_string(), "network unreachable");
    }

    #[test]
    fn calls_are_recorded_in_order() {
        let resolver = InMemoryResolver::new()
            .with_tree("a", LayerTree::new())
            .with_failure("b", "boom");
        let _ = resolver.resolve(&layer("b"));
        let _ = resolver.resolve(&layer("a"));
        assert_eq!(resolver.calls(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(resolver.call_count(), 2);
    }

    #[test]
    fn returned_tree_is_independent() {
        let resolver = InMemoryResolver::new()
            .with_tree("a", LayerTree::from_tiddlers([("Foo", "1")]).unwrap());
        let mut first = resolver.resolve(&layer("a")).unwrap();
        first.remove("Foo");
        assert!(resolver.resolve(&layer("a")).unwrap().contains_key("Foo"));
    }
}
