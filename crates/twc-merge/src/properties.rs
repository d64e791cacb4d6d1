//! Property tests for filtering and overlay merging.
//!
//! Titles are drawn from a small alphabet so that generated layers collide
//! often enough to exercise precedence.

use std::collections::BTreeSet;

use proptest::prelude::*;
use twc_types::{LayerTree, TitlePattern};

use crate::filter::filter;
use crate::matcher::ExclusionSet;
use crate::overlay::merge;

fn title_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Foo", "Bar", "Baz", "Qux", "$:/SiteTitle", "Getting Started"])
        .prop_map(str::to_string)
}

fn tree_strategy() -> impl Strategy<Value = LayerTree> {
    prop::collection::btree_map(title_strategy(), "[a-z0-9]{0,8}", 0..6).prop_map(|map| {
        LayerTree::from_tiddlers(map).expect("generated titles are non-empty")
    })
}

fn excludes_strategy() -> impl Strategy<Value = BTreeSet<TitlePattern>> {
    prop::collection::btree_set(title_strategy(), 0..4).prop_map(|set| {
        set.into_iter()
            .map(|t| TitlePattern::new(t).expect("generated patterns are non-empty"))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn filter_with_no_patterns_is_identity(tree in tree_strategy()) {
        prop_assert_eq!(filter(&tree, &BTreeSet::new()), tree);
    }

    #[test]
    fn filter_is_sound_and_complete(tree in tree_strategy(), excludes in excludes_strategy()) {
        let set = ExclusionSet::from(&excludes);
        let filtered = filter(&tree, &excludes);

        for (_, entry) in &filtered {
            prop_assert!(!set.matches_any(entry.title.as_ref()));
        }
        for (key, entry) in &tree {
            if !set.matches_any(entry.title.as_ref()) {
                prop_assert_eq!(filtered.get(key), Some(entry));
            }
        }
    }

    #[test]
    fn first_tree_containing_a_key_wins(trees in prop::collection::vec(tree_strategy(), 0..5)) {
        let merged = merge(trees.clone());
        for tree in &trees {
            for key in tree.keys() {
                let winner = trees
                    .iter()
                    .position(|t| t.contains_key(key))
                    .expect("key came from one of the trees");
                prop_assert_eq!(merged.get(key), trees[winner].get(key));
                prop_assert_eq!(merged.origin(key), Some(winner));
            }
        }
        let total_keys: BTreeSet<&str> = trees.iter().flat_map(|t| t.keys()).collect();
        prop_assert_eq!(merged.len(), total_keys.len());
    }

    #[test]
    fn disjoint_trees_merge_to_their_union(trees in prop::collection::vec(tree_strategy(), 0..5)) {
        // Make keys disjoint by prefixing with the tree position.
        let disjoint: Vec<LayerTree> = trees
            .iter()
            .enumerate()
            .map(|(i, t)| {
                t.iter()
                    .map(|(k, v)| (format!("{i}/{k}"), v.clone()))
                    .collect::<LayerTree>()
            })
            .collect();

        let forward = merge(disjoint.clone()).into_layer_tree();
        let mut reversed = disjoint.clone();
        reversed.reverse();
        let backward = merge(reversed).into_layer_tree();

        let union: LayerTree = disjoint.into_iter().flatten().collect();
        prop_assert_eq!(&forward, &union);
        prop_assert_eq!(&backward, &union);
    }

    #[test]
    fn merge_is_deterministic(trees in prop::collection::vec(tree_strategy(), 0..5)) {
        let first = merge(trees.clone());
        let second = merge(trees);
        prop_assert_eq!(first.digest(), second.digest());
        prop_assert_eq!(first, second);
    }
}
