//! Synthetic statute generation, rendering and the applicability oracle

use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statprobe_parser::statute::applicability::{applicability, Applicability};
use statprobe_parser::statute::citation::Citation;
use statprobe_parser::statute::error::{GenerateError, TreeError};
use statprobe_parser::statute::synthetic::{
    generate, render_as_sentences, render_as_statute, render_compact, NoncePool,
};
use statprobe_parser::statute::tree::{StatuteTree, TreeShape};

fn scenario_pool() -> NoncePool {
    NoncePool::from_words(["Foo", "Bar", "Baz", "Qux", "Quux", "Corge", "Grault"]).unwrap()
}

fn seeded_tree(depth: usize, width: usize, seed: u64) -> StatuteTree {
    let mut pool = NoncePool::systematic(&mut StdRng::seed_from_u64(seed));
    generate(&mut pool, depth, width).unwrap()
}

#[test]
fn test_concrete_scenario() {
    let mut tree = generate(&mut scenario_pool(), 2, 2).unwrap();
    let text = render_as_statute(&mut tree).unwrap();
    assert!(text.contains("The term \"foo\" means"));

    let root = tree.root();
    let first_child = tree.node_at_path(&[0]).unwrap();
    let leaf_under_first = tree.node_at_path(&[0, 0]).unwrap();
    let leaf_under_second = tree.node_at_path(&[1, 0]).unwrap();
    assert_eq!(
        applicability(&tree, root, leaf_under_first).unwrap(),
        Applicability::Applies
    );
    assert_eq!(
        applicability(&tree, first_child, leaf_under_second).unwrap(),
        Applicability::DoesNotApply
    );
}

#[test]
fn test_shuffled_pool_is_reproducible() {
    let build = |seed| {
        let mut pool = scenario_pool();
        pool.shuffle(&mut StdRng::seed_from_u64(seed));
        let mut tree = generate(&mut pool, 2, 2).unwrap();
        render_as_statute(&mut tree).unwrap()
    };
    assert_eq!(build(42), build(42));
}

#[test]
fn test_analogous_node_across_same_shape_trees() {
    let first = seeded_tree(3, 2, 1);
    let second = seeded_tree(3, 2, 2);
    for id in first.iter() {
        let other = first.analogous_node(id, &second).unwrap();
        assert_eq!(first.path(id).unwrap(), second.path(other).unwrap());
        assert_eq!(first.level(id).unwrap(), second.level(other).unwrap());
    }
}

#[test]
fn test_analogous_node_rejects_different_shapes() {
    let first = seeded_tree(2, 2, 1);
    let second = seeded_tree(2, 3, 1);
    let leaf = first.leaves()[0];
    let err = first.analogous_node(leaf, &second).unwrap_err();
    assert_eq!(
        err,
        TreeError::ShapeMismatch {
            left: "depth 2 width 2".into(),
            right: "depth 2 width 3".into(),
        }
    );
}

#[test]
fn test_cross_tree_nodes_are_rejected() {
    let first = seeded_tree(2, 2, 1);
    let second = seeded_tree(2, 2, 1);
    let err = applicability(&first, first.root(), second.leaves()[0]).unwrap_err();
    assert!(matches!(err, TreeError::ForeignNode { .. }));
    assert!(first.distance(first.root(), second.root()).is_err());
}

#[test]
fn test_generation_needs_enough_terms() {
    let mut pool = NoncePool::systematic(&mut StdRng::seed_from_u64(0));
    let err = generate(&mut pool, 3, 7).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::PoolExhausted {
            needed: 400,
            available: 260
        }
    ));
}

#[test]
fn test_nonce_file_pool() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nonces.txt");
    std::fs::write(&path, "blicket\nwug\ndax\nfep\ntoma\ngazzer\nzorp\n").unwrap();
    let mut pool = NoncePool::from_path(&path).unwrap();
    assert_eq!(pool.len(), 7);
    let mut tree = generate(&mut pool, 2, 2).unwrap();
    let text = render_as_statute(&mut tree).unwrap();
    assert!(text.starts_with("Section 1001.  Definition of Blicket.\n"));
}

fn shapes() -> impl Strategy<Value = (usize, usize, u64)> {
    (1usize..=4, 1usize..=3, any::<u64>())
}

proptest! {
    #[test]
    fn leaf_and_internal_counts((depth, width, seed) in shapes()) {
        let tree = seeded_tree(depth, width, seed);
        let leaves = width.pow(depth as u32);
        let internal = (0..depth).map(|d| width.pow(d as u32)).sum::<usize>();
        prop_assert_eq!(tree.leaves().len(), leaves);
        prop_assert_eq!(tree.len() - tree.leaves().len(), internal);
        if width > 1 {
            prop_assert_eq!(internal, (leaves - 1) / (width - 1));
        }
        prop_assert_eq!(tree.shape(), Some(TreeShape { depth, width }));
    }

    #[test]
    fn applies_exactly_for_ancestors((depth, width, seed) in shapes()) {
        let tree = seeded_tree(depth, width, seed);
        for a in tree.iter() {
            for b in tree.iter() {
                let result = applicability(&tree, a, b).unwrap();
                let ancestor = tree.is_strict_ancestor(a, b).unwrap();
                if a != b {
                    prop_assert_eq!(result == Applicability::Applies, ancestor);
                }
            }
        }
    }

    #[test]
    fn self_application((depth, width, seed) in shapes()) {
        let tree = seeded_tree(depth, width, seed);
        for a in tree.iter() {
            let expected = if tree.is_leaf(a).unwrap() {
                Applicability::Applies
            } else {
                Applicability::Indeterminate
            };
            prop_assert_eq!(applicability(&tree, a, a).unwrap(), expected);
        }
    }

    #[test]
    fn unrelated_nodes_are_symmetric((depth, width, seed) in shapes()) {
        let tree = seeded_tree(depth, width, seed);
        for a in tree.iter() {
            for b in tree.iter() {
                let related = a == b
                    || tree.is_strict_ancestor(a, b).unwrap()
                    || tree.is_strict_ancestor(b, a).unwrap();
                if !related {
                    prop_assert_eq!(applicability(&tree, a, b).unwrap(), Applicability::DoesNotApply);
                    prop_assert_eq!(applicability(&tree, b, a).unwrap(), Applicability::DoesNotApply);
                }
            }
        }
    }

    #[test]
    fn citations_are_unique((depth, width, seed) in shapes()) {
        let mut tree = seeded_tree(depth, width, seed);
        for compact in [false, true] {
            if compact {
                render_compact(&mut tree).unwrap();
            } else {
                render_as_statute(&mut tree).unwrap();
            }
            let used: Vec<_> = tree.iter().filter_map(|id| tree[id].cite_used.clone()).collect();
            let defined: Vec<_> = tree.iter().filter_map(|id| tree[id].cite_defined.clone()).collect();
            prop_assert_eq!(used.len(), tree.len() - 1);
            prop_assert_eq!(defined.len(), tree.len() - tree.leaves().len());
            prop_assert_eq!(used.iter().collect::<HashSet<_>>().len(), used.len());
            prop_assert_eq!(defined.iter().collect::<HashSet<_>>().len(), defined.len());
            for cite in used.iter().chain(&defined) {
                prop_assert!(Citation::parse(cite).is_ok(), "{} does not parse", cite);
            }
        }
    }

    #[test]
    fn sentences_number_definitions_in_order((depth, width, seed) in shapes()) {
        let mut tree = seeded_tree(depth, width, seed);
        let text = render_as_sentences(&mut tree, Some("Sentence {}: ")).unwrap();
        let defined: Vec<_> = tree
            .iter()
            .filter(|id| !tree.is_leaf(*id).unwrap())
            .map(|id| tree[id].sentence_num)
            .collect();
        let expected: Vec<_> = (1..=defined.len()).map(Some).collect();
        prop_assert_eq!(defined, expected);
        prop_assert_eq!(text.lines().count(), tree.len() - tree.leaves().len());
        for leaf in tree.leaves() {
            prop_assert_eq!(tree[leaf].sentence_num, None);
        }
    }

    #[test]
    fn distance_is_a_metric((depth, width, seed) in shapes()) {
        let tree = seeded_tree(depth, width, seed);
        let root = tree.root();
        for a in tree.iter() {
            prop_assert_eq!(tree.distance(a, a).unwrap(), 0);
            prop_assert_eq!(tree.distance(a, root).unwrap(), tree.level(a).unwrap());
            for b in tree.iter() {
                prop_assert_eq!(tree.distance(a, b).unwrap(), tree.distance(b, a).unwrap());
            }
        }
    }
}
