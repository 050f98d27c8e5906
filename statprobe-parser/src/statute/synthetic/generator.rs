//! Tree generation from a nonce pool.

use tracing::info;

use super::nonce::NoncePool;
use crate::statute::error::{GenerateError, GenerateResult, TreeResult};
use crate::statute::tree::{NodeId, StatuteNode, StatuteTree};

pub const ROOT_IDENTIFIER: &str = "/synthetic";

/// Number of terms a complete tree of the given shape consumes, or `None` on overflow.
pub fn required_terms(depth: usize, width: usize) -> Option<usize> {
    let mut total: usize = 0;
    let mut level: usize = 1;
    for _ in 0..=depth {
        total = total.checked_add(level)?;
        level = level.checked_mul(width)?;
    }
    Some(total)
}

/// Builds a complete `width`-ary tree with `depth` levels below the root.
///
/// Terms are popped depth-first: each node takes its term before its children do,
/// and the root takes the last term of all. The pool is consumed even when
/// generation fails part way.
pub fn generate(pool: &mut NoncePool, depth: usize, width: usize) -> GenerateResult<StatuteTree> {
    if depth == 0 || width == 0 {
        return Err(GenerateError::InvalidShape { depth, width });
    }
    let needed = required_terms(depth, width).ok_or(GenerateError::InvalidShape { depth, width })?;
    let shape = Shape {
        depth,
        width,
        needed,
        available: pool.len(),
    };
    if needed > shape.available {
        return Err(shape.exhausted());
    }

    let mut tree = StatuteTree::new(StatuteNode::new(ROOT_IDENTIFIER, ""));
    let root = tree.root();
    grow(&mut tree, root, pool, 1, &shape)?;
    let term = take(pool, &shape)?;
    tree.node_mut(root)?.term = Some(term);

    info!(depth, width, nodes = tree.len(), "generated synthetic statute");
    Ok(tree)
}

/// The tree being built and the pool size it started from.
struct Shape {
    depth: usize,
    width: usize,
    needed: usize,
    available: usize,
}

impl Shape {
    fn exhausted(&self) -> GenerateError {
        GenerateError::PoolExhausted {
            needed: self.needed,
            available: self.available,
        }
    }
}

fn grow(
    tree: &mut StatuteTree,
    parent: NodeId,
    pool: &mut NoncePool,
    level: usize,
    shape: &Shape,
) -> GenerateResult<()> {
    if level > shape.depth {
        return Ok(());
    }
    for i in 0..shape.width {
        let term = take(pool, shape)?;
        check_siblings(tree, parent, &term)?;
        let identifier = format!("{}/{i}", tree.node(parent)?.identifier);
        let child = tree.add_child(parent, StatuteNode::new(identifier, "").with_term(term))?;
        grow(tree, child, pool, level + 1, shape)?;
    }
    Ok(())
}

fn take(pool: &mut NoncePool, shape: &Shape) -> GenerateResult<String> {
    pool.pop().ok_or_else(|| shape.exhausted())
}

fn check_siblings(tree: &StatuteTree, parent: NodeId, term: &str) -> GenerateResult<()> {
    let lowered = term.to_lowercase();
    for sibling in tree.children(parent)? {
        let Some(existing) = tree.node(*sibling)?.term.as_deref() else {
            continue;
        };
        let other = existing.to_lowercase();
        if other.contains(&lowered) || lowered.contains(&other) {
            return Err(GenerateError::SiblingCollision {
                term: term.to_string(),
                sibling: existing.to_string(),
            });
        }
    }
    Ok(())
}

/// Every non-root node whose parent is not the root, paired with its parent's
/// siblings. Used to pick distractor definitions one level up.
pub fn auncles(tree: &StatuteTree) -> TreeResult<Vec<(NodeId, Vec<NodeId>)>> {
    let mut out = Vec::new();
    for id in tree.iter() {
        let Some(parent) = tree.parent(id)? else {
            continue;
        };
        let Some(grandparent) = tree.parent(parent)? else {
            continue;
        };
        let siblings = tree
            .children(grandparent)?
            .iter()
            .copied()
            .filter(|n| *n != parent)
            .collect();
        out.push((id, siblings));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_pool() -> NoncePool {
        NoncePool::from_words(["Foo", "Bar", "Baz", "Qux", "Quux", "Corge", "Grault"]).unwrap()
    }

    fn term(tree: &StatuteTree, id: NodeId) -> &str {
        tree[id].term.as_deref().unwrap()
    }

    #[test]
    fn pops_parent_before_children_and_root_last() {
        let mut pool = scenario_pool();
        let tree = generate(&mut pool, 2, 2).unwrap();
        let terms: Vec<_> = tree.iter().map(|id| term(&tree, id)).collect();
        assert_eq!(terms, vec!["Foo", "Grault", "Corge", "Quux", "Qux", "Baz", "Bar"]);
        assert!(pool.is_empty());
    }

    #[test]
    fn identifiers_follow_child_indices() {
        let tree = generate(&mut scenario_pool(), 2, 2).unwrap();
        let ids: Vec<_> = tree.iter().map(|id| tree[id].identifier.clone()).collect();
        assert_eq!(
            ids,
            vec![
                "/synthetic",
                "/synthetic/0",
                "/synthetic/0/0",
                "/synthetic/0/1",
                "/synthetic/1",
                "/synthetic/1/0",
                "/synthetic/1/1",
            ]
        );
    }

    #[test]
    fn exhausted_pool_fails_before_building() {
        let mut pool = NoncePool::from_words(["Foo", "Bar"]).unwrap();
        let err = generate(&mut pool, 2, 2).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::PoolExhausted {
                needed: 7,
                available: 2
            }
        ));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn running_dry_mid_tree_reports_the_whole_shape() {
        let mut pool = NoncePool::from_words(["Foo", "Bar", "Baz", "Qux", "Quux"]).unwrap();
        let shape = Shape {
            depth: 2,
            width: 2,
            needed: 7,
            available: pool.len(),
        };
        let mut tree = StatuteTree::new(StatuteNode::new(ROOT_IDENTIFIER, ""));
        let root = tree.root();
        let err = grow(&mut tree, root, &mut pool, 1, &shape).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::PoolExhausted {
                needed: 7,
                available: 5
            }
        ));
        assert!(pool.is_empty());
    }

    #[test]
    fn zero_shape_is_invalid() {
        assert!(matches!(
            generate(&mut scenario_pool(), 0, 2),
            Err(GenerateError::InvalidShape { depth: 0, width: 2 })
        ));
        assert!(matches!(
            generate(&mut scenario_pool(), 2, 0),
            Err(GenerateError::InvalidShape { depth: 2, width: 0 })
        ));
    }

    #[test]
    fn required_terms_counts_every_level() {
        assert_eq!(required_terms(2, 2), Some(7));
        assert_eq!(required_terms(3, 3), Some(40));
        assert_eq!(required_terms(1, 1), Some(2));
        assert_eq!(required_terms(64, usize::MAX), None);
    }

    #[test]
    fn auncles_of_grandchildren() {
        let tree = generate(&mut scenario_pool(), 2, 2).unwrap();
        let pairs = auncles(&tree).unwrap();
        assert_eq!(pairs.len(), 4);
        let (corge, auncles) = &pairs[0];
        assert_eq!(term(&tree, *corge), "Corge");
        let names: Vec<_> = auncles.iter().map(|id| term(&tree, *id)).collect();
        assert_eq!(names, vec!["Qux"]);
    }
}
