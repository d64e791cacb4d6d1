use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::digest::TreeDigest;
use crate::error::TypeError;
use crate::title::Title;

/// One file of a layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// The tiddler this file carries, if any. Files such as
    /// `tiddlywiki.info` have no title and can never be excluded.
    pub title: Option<Title>,
    pub content: Vec<u8>,
}

impl TreeEntry {
    /// An entry carrying the tiddler `title`.
    pub fn tiddler(title: Title, content: impl Into<Vec<u8>>) -> Self {
        Self {
            title: Some(title),
            content: content.into(),
        }
    }

    /// An entry that is not a tiddler.
    pub fn file(content: impl Into<Vec<u8>>) -> Self {
        Self {
            title: None,
            content: content.into(),
        }
    }
}

/// A resolved layer: entries keyed by tiddler title or `/`-separated path.
///
/// Keys are kept in a `BTreeMap` so iteration, serialization and digests are
/// deterministic regardless of the order a resolver produced them in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerTree {
    entries: BTreeMap<String, TreeEntry>,
}

impl LayerTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree whose keys are tiddler titles.
    pub fn from_tiddlers<I, K, V>(tiddlers: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let mut tree = Self::new();
        for (title, content) in tiddlers {
            let title = Title::new(title)?;
            tree.insert(title.as_str().to_string(), TreeEntry::tiddler(title, content));
        }
        Ok(tree)
    }

    /// Insert an entry, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, entry: TreeEntry) -> Option<TreeEntry> {
        self.entries.insert(key.into(), entry)
    }

    pub fn remove(&mut self, key: &str) -> Option<TreeEntry> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&TreeEntry> {
        self.entries.get(key)
    }

    /// The content stored under `key`.
    pub fn content(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(|e| e.content.as_slice())
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

    /// Titles of every tiddler in the tree, in key order.
    pub fn titles(&self) -> impl Iterator<Item = &Title> {
        self.entries.values().filter_map(|e| e.title.as_ref())
    }

    /// Digest over every key, title and content in key order.
    pub fn digest(&self) -> TreeDigest {
        TreeDigest::of_entries(self.entries.iter())
    }
}

impl FromIterator<(String, TreeEntry)> for LayerTree {
    fn from_iter<T: IntoIterator<Item = (String, TreeEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LayerTree {
    type Item = (String, TreeEntry);
    type IntoIter = btree_map::IntoIter<String, TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a LayerTree {
    type Item = (&'a String, &'a TreeEntry);
    type IntoIter = btree_map::Iter<'a, String, TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_tiddlers_keys_by_title() {
        let tree = LayerTree::from_tiddlers([("Foo", "a1"), ("Bar", "a2")]).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.content("Foo"), Some(&b"a1"[..]));
        assert_eq!(tree.get("Bar").unwrap().title.as_ref().unwrap().as_str(), "Bar");
    }

    #[test]
    fn from_tiddlers_rejects_empty_title() {
        assert!(LayerTree::from_tiddlers([("", "x")]).is_err());
    }

    #[test]
    fn keys_iterate_in_sorted_order() {
        let tree = LayerTree::from_tiddlers([("b", "1"), ("a", "2"), ("c", "3")]).unwrap();
        let keys: Vec<_> = tree.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn plain_files_have_no_title() {
        let mut tree = LayerTree::new();
        tree.insert("tiddlywiki.info", TreeEntry::file("{}"));
        assert_eq!(tree.titles().count(), 0);
    }

    #[test]
    fn digest_ignores_insertion_order() {
        let a = LayerTree::from_tiddlers([("x", "1"), ("y", "2")]).unwrap();
        let b = LayerTree::from_tiddlers([("y", "2"), ("x", "1")]).unwrap();
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn digest_sees_content_changes() {
        let a = LayerTree::from_tiddlers([("x", "1")]).unwrap();
        let b = LayerTree::from_tiddlers([("x", "2")]).unwrap();
        assert_ne!(a.digest(), b.digest());
    }
}
