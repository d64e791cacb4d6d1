//! Per-layer exclusion filtering.
//!
//! Filtering is layer-local: removing `Foo` from one layer says nothing about
//! a `Foo` supplied by any other layer.

use std::collections::BTreeSet;

use tracing::debug;
use twc_types::{LayerTree, TitlePattern};

use crate::matcher::ExclusionSet;

/// The result of filtering one layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Entries that survived the filter.
    pub tree: LayerTree,
    /// Keys of the entries that were removed, in key order.
    pub removed: Vec<String>,
}

/// Return a copy of `tree` without the tiddlers named in `excludes`.
///
/// An empty exclusion set returns an identical tree. Patterns that match no
/// tiddler are ignored. `tree` itself is never modified.
pub fn filter(tree: &LayerTree, excludes: &BTreeSet<TitlePattern>) -> LayerTree {
    filter_with_report(tree, &ExclusionSet::from(excludes)).tree
}

/// Like [`filter`], also reporting which keys were removed.
pub fn filter_with_report(tree: &LayerTree, excludes: &ExclusionSet) -> FilterOutcome {
    if excludes.is_empty() {
        return FilterOutcome {
            tree: tree.clone(),
            removed: Vec::new(),
        };
    }

    let mut kept = LayerTree::new();
    let mut removed = Vec::new();
    for (key, entry) in tree {
        if excludes.matches_any(entry.title.as_ref()) {
            removed.push(key.clone());
        } else {
            kept.insert(key.clone(), entry.clone());
        }
    }

    debug!(
        patterns = excludes.len(),
        removed = removed.len(),
        kept = kept.len(),
        "filtered layer"
    );

    FilterOutcome {
        tree: kept,
        removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twc_types::{Title, TreeEntry};

    fn patterns(titles: &[&str]) -> BTreeSet<TitlePattern> {
        titles.iter().map(|t| TitlePattern::new(*t).unwrap()).collect()
    }

    fn tree_a() -> LayerTree {
        LayerTree::from_tiddlers([("Foo", "a1"), ("Bar", "a2")]).unwrap()
    }

    #[test]
    fn empty_exclusions_are_identity() {
        let tree = tree_a();
        assert_eq!(filter(&tree, &BTreeSet::new()), tree);
    }

    #[test]
    fn excluded_title_is_removed() {
        let filtered = filter(&tree_a(), &patterns(&["Foo"]));
        assert!(!filtered.contains_key("Foo"));
        assert_eq!(filtered.content("Bar"), Some(&b"a2"[..]));
    }

    #[test]
    fn absent_title_is_a_no_op() {
        let tree = tree_a();
        assert_eq!(filter(&tree, &patterns(&["Nope"])), tree);
    }

    #[test]
    fn input_is_untouched() {
        let tree = tree_a();
        let before = tree.clone();
        let mut filtered = filter(&tree, &patterns(&["Foo"]));
        filtered.insert("Extra", TreeEntry::file("x"));
        assert_eq!(tree, before);
    }

    #[test]
    fn matching_uses_title_not_key() {
        let mut tree = LayerTree::new();
        tree.insert(
            "tiddlers/Foo.tid",
            TreeEntry::tiddler(Title::new("Foo").unwrap(), "title: Foo\n\nbody"),
        );
        tree.insert("tiddlers/Foo.tid.bak", TreeEntry::file("stale"));
        let outcome = filter_with_report(&tree, &ExclusionSet::from(&patterns(&["Foo"])));
        assert_eq!(outcome.removed, vec!["tiddlers/Foo.tid".to_string()]);
        assert!(outcome.tree.contains_key("tiddlers/Foo.tid.bak"));
    }

    #[test]
    fn sidecar_and_payload_share_a_title() {
        let title = Title::new("logo.png").unwrap();
        let mut tree = LayerTree::new();
        tree.insert("tiddlers/logo.png", TreeEntry::tiddler(title.clone(), vec![0x89, 0x50]));
        tree.insert("tiddlers/logo.png.meta", TreeEntry::tiddler(title, "title: logo.png"));
        let outcome = filter_with_report(&tree, &ExclusionSet::from(&patterns(&["logo.png"])));
        assert_eq!(outcome.removed.len(), 2);
        assert!(outcome.tree.is_empty());
    }

    #[test]
    fn excluding_a_plugin_removes_its_whole_folder() {
        let plugin = Title::new("$:/plugins/tiddlywiki/markdown").unwrap();
        let mut tree = LayerTree::new();
        tree.insert("tiddlywiki.info", TreeEntry::file(r#"{"plugins":[]}"#));
        tree.insert(
            "plugins/markdown/plugin.info",
            TreeEntry::tiddler(plugin.clone(), r#"{"title":"$:/plugins/tiddlywiki/markdown"}"#),
        );
        tree.insert("plugins/markdown/wrapper.js", TreeEntry::tiddler(plugin.clone(), "//"));
        tree.insert("plugins/markdown/files/markdown-it.js", TreeEntry::tiddler(plugin, "//"));
        tree.insert("tiddlers/Notes.tid", TreeEntry::tiddler(Title::new("Notes").unwrap(), "title: Notes"));

        let outcome = filter_with_report(
            &tree,
            &ExclusionSet::from(&patterns(&["$:/plugins/tiddlywiki/markdown"])),
        );
        assert_eq!(
            outcome.removed,
            vec![
                "plugins/markdown/files/markdown-it.js",
                "plugins/markdown/plugin.info",
                "plugins/markdown/wrapper.js",
            ]
        );
        let kept: Vec<_> = outcome.tree.keys().collect();
        assert_eq!(kept, vec!["tiddlers/Notes.tid", "tiddlywiki.info"]);
    }

    #[test]
    fn report_is_empty_for_empty_set() {
        let outcome = filter_with_report(&tree_a(), &ExclusionSet::default());
        assert!(outcome.removed.is_empty());
        assert_eq!(outcome.tree, tree_a());
    }
}
