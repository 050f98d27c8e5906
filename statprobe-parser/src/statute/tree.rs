//! Statute tree model
//!
//! Both pipelines produce a [`StatuteTree`]: an arena of [`StatuteNode`]s owned by the
//! tree, addressed by [`NodeId`]. A `NodeId` remembers which tree minted it, so handing
//! a node from one tree to another tree's queries fails with
//! [`TreeError::ForeignNode`] instead of silently reading an unrelated slot.
//!
//! Levels are never stored. They are derived from the parent chain, so a node's level
//! always agrees with its position.

pub mod stats;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::error::{TreeError, TreeResult};

pub use stats::TreeStats;

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a node inside one particular [`StatuteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId {
    tree: u64,
    index: usize,
}

impl NodeId {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tree(&self) -> u64 {
        self.tree
    }
}

/// A single provision of a statute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatuteNode {
    /// Locates the node in its source document (USLM identifier or synthetic path).
    pub identifier: String,
    /// Own text, exclusive of descendants.
    pub text: String,
    /// Nonce term named by a synthetic node.
    pub term: Option<String>,
    /// Citation of the list item where the term is used in its parent's definition.
    pub cite_used: Option<String>,
    /// Citation of the provision that defines the term.
    pub cite_defined: Option<String>,
    /// Number of the prose sentence defining the term.
    pub sentence_num: Option<usize>,
    /// Set when the source had structural children that were all dropped.
    pub placeholder: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl StatuteNode {
    pub fn new(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            text: text.into(),
            term: None,
            cite_used: None,
            cite_defined: None,
            sentence_num: None,
            placeholder: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: bool) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// A leaf has no children and is not a placeholder for dropped content.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && !self.placeholder
    }
}

/// Uniform shape of a complete tree: every internal node has `width` children and
/// every leaf sits `depth` levels below the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeShape {
    pub depth: usize,
    pub width: usize,
}

impl std::fmt::Display for TreeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "depth {} width {}", self.depth, self.width)
    }
}

/// Arena of statute nodes rooted at a single node.
///
/// Cloning a tree keeps its id, so node handles stay valid in the copy.
#[derive(Debug, Clone)]
pub struct StatuteTree {
    id: u64,
    nodes: Vec<StatuteNode>,
}

impl StatuteTree {
    pub fn new(root: StatuteNode) -> Self {
        let id = NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed);
        let mut root = root;
        root.parent = None;
        root.children.clear();
        Self {
            id,
            nodes: vec![root],
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn root(&self) -> NodeId {
        NodeId {
            tree: self.id,
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: StatuteNode) -> TreeResult<NodeId> {
        self.check(parent)?;
        let id = NodeId {
            tree: self.id,
            index: self.nodes.len(),
        };
        let mut node = node;
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.index].children.push(id);
        Ok(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.tree == self.id && id.index < self.nodes.len()
    }

    pub fn check(&self, id: NodeId) -> TreeResult<()> {
        if id.tree != self.id {
            return Err(TreeError::ForeignNode {
                index: id.index,
                expected: self.id,
                found: id.tree,
            });
        }
        if id.index >= self.nodes.len() {
            return Err(TreeError::UnknownNode {
                index: id.index,
                tree: self.id,
            });
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> TreeResult<&StatuteNode> {
        self.check(id)?;
        Ok(&self.nodes[id.index])
    }

    pub fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut StatuteNode> {
        self.check(id)?;
        Ok(&mut self.nodes[id.index])
    }

    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// Number of edges between `id` and the root.
    pub fn level(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.ancestors(id)?.count())
    }

    pub fn is_leaf(&self, id: NodeId) -> TreeResult<bool> {
        Ok(self.node(id)?.is_leaf())
    }

    pub fn has_children(&self, id: NodeId) -> TreeResult<bool> {
        Ok(self.node(id)?.has_children())
    }

    /// True when the first child itself has children. Synthetic trees are complete,
    /// so the first child stands for all of them.
    pub fn has_grandchildren(&self, id: NodeId) -> TreeResult<bool> {
        let node = self.node(id)?;
        Ok(node
            .children
            .first()
            .is_some_and(|child| self.nodes[child.index].has_children()))
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> TreeResult<Ancestors<'_>> {
        let node = self.node(id)?;
        Ok(Ancestors {
            tree: self,
            next: node.parent,
        })
    }

    pub fn is_strict_ancestor(&self, ancestor: NodeId, node: NodeId) -> TreeResult<bool> {
        self.check(ancestor)?;
        Ok(self.ancestors(node)?.any(|a| a == ancestor))
    }

    /// `id` followed by all of its descendants in pre-order.
    pub fn descendants(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        self.check(id)?;
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current.index].children.iter().rev().copied());
        }
        Ok(out)
    }

    /// All nodes in pre-order (document order), root first.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let current = stack.pop()?;
            stack.extend(self.nodes[current.index].children.iter().rev().copied());
            Some(current)
        })
    }

    pub fn leaves(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|id| self.nodes[id.index].is_leaf())
            .collect()
    }

    /// Number of tree edges on the path between `a` and `b`.
    pub fn distance(&self, a: NodeId, b: NodeId) -> TreeResult<usize> {
        let up_a: Vec<NodeId> = std::iter::once(a).chain(self.ancestors(a)?).collect();
        let up_b: Vec<NodeId> = std::iter::once(b).chain(self.ancestors(b)?).collect();
        for (steps_a, candidate) in up_a.iter().enumerate() {
            if let Some(steps_b) = up_b.iter().position(|n| n == candidate) {
                return Ok(steps_a + steps_b);
            }
        }
        // Every node reaches the root, so a common ancestor always exists.
        Ok(up_a.len() + up_b.len() - 2)
    }

    /// Child indices leading from the root to `id`.
    pub fn path(&self, id: NodeId) -> TreeResult<Vec<usize>> {
        self.check(id)?;
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current.index].parent {
            let position = self.nodes[parent.index]
                .children
                .iter()
                .position(|c| *c == current)
                .unwrap_or_default();
            path.push(position);
            current = parent;
        }
        path.reverse();
        Ok(path)
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        let mut current = self.root();
        for &step in path {
            current = *self.nodes[current.index].children.get(step)?;
        }
        Some(current)
    }

    /// Shape of the tree if it is complete and uniform.
    pub fn shape(&self) -> Option<TreeShape> {
        let root = &self.nodes[0];
        let width = root.children.len();
        let mut depth = None;
        for id in self.iter() {
            let node = &self.nodes[id.index];
            if node.children.is_empty() {
                let level = self.level(id).ok()?;
                match depth {
                    None => depth = Some(level),
                    Some(d) if d != level => return None,
                    _ => {}
                }
            } else if node.children.len() != width {
                return None;
            }
        }
        depth.map(|depth| TreeShape { depth, width })
    }

    /// The node of `other` sitting at the same child-index path as `node` in `self`.
    pub fn analogous_node(&self, node: NodeId, other: &StatuteTree) -> TreeResult<NodeId> {
        let path = self.path(node)?;
        let (left, right) = (self.shape(), other.shape());
        if left.is_none() || left != right {
            return Err(TreeError::ShapeMismatch {
                left: describe_shape(left),
                right: describe_shape(right),
            });
        }
        other
            .node_at_path(&path)
            .ok_or_else(|| TreeError::ShapeMismatch {
                left: describe_shape(left),
                right: describe_shape(right),
            })
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats::of(self)
    }
}

fn describe_shape(shape: Option<TreeShape>) -> String {
    shape.map_or_else(|| "irregular".to_string(), |s| s.to_string())
}

impl std::ops::Index<NodeId> for StatuteTree {
    type Output = StatuteNode;

    /// Panics when `id` belongs to another tree; use [`StatuteTree::node`] to get an error.
    fn index(&self, id: NodeId) -> &StatuteNode {
        assert_eq!(id.tree, self.id, "node {} used with a foreign tree", id.index);
        &self.nodes[id.index]
    }
}

/// Iterator over the strict ancestors of a node.
pub struct Ancestors<'a> {
    tree: &'a StatuteTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.nodes[current.index].parent;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> (StatuteTree, Vec<NodeId>) {
        // root
        // ├── a
        // │   ├── a1
        // │   └── a2
        // └── b
        let mut tree = StatuteTree::new(StatuteNode::new("/s", "root"));
        let root = tree.root();
        let a = tree.add_child(root, StatuteNode::new("/s/a", "a")).unwrap();
        let a1 = tree.add_child(a, StatuteNode::new("/s/a/1", "a1")).unwrap();
        let b = tree.add_child(root, StatuteNode::new("/s/b", "b")).unwrap();
        let a2 = tree.add_child(a, StatuteNode::new("/s/a/2", "a2")).unwrap();
        (tree, vec![root, a, a1, a2, b])
    }

    #[test]
    fn test_iter_is_preorder() {
        let (tree, ids) = small_tree();
        let order: Vec<_> = tree.iter().collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_levels_follow_parents() {
        let (tree, ids) = small_tree();
        let levels: Vec<_> = ids.iter().map(|id| tree.level(*id).unwrap()).collect();
        assert_eq!(levels, vec![0, 1, 2, 2, 1]);
    }

    #[test]
    fn test_leaves_and_grandchildren() {
        let (tree, ids) = small_tree();
        assert_eq!(tree.leaves(), vec![ids[2], ids[3], ids[4]]);
        assert!(tree.has_grandchildren(ids[0]).unwrap());
        assert!(!tree.has_grandchildren(ids[1]).unwrap());
    }

    #[test]
    fn test_placeholder_is_not_a_leaf() {
        let mut tree = StatuteTree::new(StatuteNode::new("/s", "root"));
        let root = tree.root();
        let p = tree
            .add_child(root, StatuteNode::new("/s/a", "a").with_placeholder(true))
            .unwrap();
        assert!(!tree.is_leaf(p).unwrap());
        assert!(tree.leaves().is_empty());
    }

    #[test]
    fn test_distance() {
        let (tree, ids) = small_tree();
        assert_eq!(tree.distance(ids[2], ids[2]).unwrap(), 0);
        assert_eq!(tree.distance(ids[2], ids[3]).unwrap(), 2);
        assert_eq!(tree.distance(ids[2], ids[4]).unwrap(), 3);
        assert_eq!(tree.distance(ids[0], ids[3]).unwrap(), 2);
    }

    #[test]
    fn test_path_round_trips() {
        let (tree, ids) = small_tree();
        for id in ids {
            let path = tree.path(id).unwrap();
            assert_eq!(tree.node_at_path(&path), Some(id));
        }
        assert_eq!(tree.node_at_path(&[5]), None);
    }

    #[test]
    fn test_irregular_tree_has_no_shape() {
        let (tree, _) = small_tree();
        assert_eq!(tree.shape(), None);
    }

    #[test]
    fn test_foreign_node_is_rejected() {
        let (tree, _) = small_tree();
        let (other, other_ids) = small_tree();
        let err = tree.node(other_ids[1]).unwrap_err();
        assert_eq!(
            err,
            TreeError::ForeignNode {
                index: 1,
                expected: tree.id(),
                found: other.id(),
            }
        );
    }

    #[test]
    fn test_descendants_include_self() {
        let (tree, ids) = small_tree();
        assert_eq!(tree.descendants(ids[1]).unwrap(), vec![ids[1], ids[2], ids[3]]);
    }
}
