//! Overlay merging of filtered layers.
//!
//! The contract is a single rule: when a key appears in more than one layer,
//! the entry from the layer with the highest precedence wins. Content is never
//! compared; identical and differing entries are treated alike.

use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use twc_types::{LayerTree, TreeDigest, TreeEntry};

/// Counts from folding one layer into a [`MergedTree`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayStats {
    /// Keys that were not present before.
    pub added: usize,
    /// Keys whose existing entry was replaced by the incoming layer.
    pub replaced: usize,
    /// Incoming keys discarded because the existing entry outranks them.
    pub shadowed: usize,
}

/// The accumulated result of overlaying layers.
///
/// Besides the winning entry for every key, the tree remembers which layer
/// supplied it. Layer numbers are whatever the caller passes in; the pipeline
/// uses declared positions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedTree {
    entries: BTreeMap<String, TreeEntry>,
    origins: BTreeMap<String, usize>,
}

impl MergedTree {
    /// An empty tree: the starting point of every merge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `tree` on top of the current state: incoming entries win.
    pub fn overlay_over(&mut self, layer: usize, tree: LayerTree) -> OverlayStats {
        let mut stats = OverlayStats::default();
        for (key, entry) in tree {
            if self.entries.insert(key.clone(), entry).is_some() {
                stats.replaced += 1;
            } else {
                stats.added += 1;
            }
            self.origins.insert(key, layer);
        }
        debug!(layer, added = stats.added, replaced = stats.replaced, "overlay over");
        stats
    }

    /// Fold `tree` beneath the current state: existing entries win.
    pub fn overlay_under(&mut self, layer: usize, tree: LayerTree) -> OverlayStats {
        let mut stats = OverlayStats::default();
        for (key, entry) in tree {
            match self.entries.entry(key) {
                Entry::Occupied(_) => stats.shadowed += 1,
                Entry::Vacant(slot) => {
                    self.origins.insert(slot.key().clone(), layer);
                    slot.insert(entry);
                    stats.added += 1;
                }
            }
        }
        debug!(layer, added = stats.added, shadowed = stats.shadowed, "overlay under");
        stats
    }

    pub fn get(&self, key: &str) -> Option<&TreeEntry> {
        self.entries.get(key)
    }

    pub fn content(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(|e| e.content.as_slice())
    }

    /// The layer that supplied the entry under `key`.
    pub fn origin(&self, key: &str) -> Option<usize> {
        self.origins.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, TreeEntry> {
        self.entries.iter()
    }

    /// Number of surviving entries contributed by each layer.
    pub fn contributions(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for layer in self.origins.values() {
            *counts.entry(*layer).or_insert(0) += 1;
        }
        counts
    }

    /// Digest of the merged entries. Provenance does not take part.
    pub fn digest(&self) -> TreeDigest {
        TreeDigest::of_entries(self.entries.iter())
    }

    /// Copy the merged entries into a plain [`LayerTree`].
    pub fn to_layer_tree(&self) -> LayerTree {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Drop provenance and keep the entries.
    pub fn into_layer_tree(self) -> LayerTree {
        self.entries.into_iter().collect()
    }
}

/// Merge layers given in precedence order, highest first.
///
/// Layers are folded from the lowest-precedence end with
/// [`MergedTree::overlay_over`], so every key ends up holding the entry of the
/// first tree in `trees` that contains it. Provenance records each tree's
/// position in `trees`.
pub fn merge<I>(trees: I) -> MergedTree
where
    I: IntoIterator<Item = LayerTree>,
{
    let trees: Vec<LayerTree> = trees.into_iter().collect();
    let mut merged = MergedTree::new();
    for (position, tree) in trees.into_iter().enumerate().rev() {
        merged.overlay_over(position, tree);
    }
    merged
}
