//! Tree snapshot - a normalized, serializable copy of a statute tree
//!
//! The snapshot captures the node kind, a display label, the node's annotations and
//! its children, so serializers only deal with presentation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::statute::tree::{NodeId, StatuteTree};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// `Root`, `Provision`, `Leaf` or `Placeholder`
    pub node_type: String,

    /// The term for synthetic nodes, otherwise the node's own text
    pub label: String,

    pub attributes: BTreeMap<String, String>,

    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn new(node_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            label: label.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: NodeSnapshot) -> Self {
        self.children.push(child);
        self
    }
}

pub fn snapshot_tree(tree: &StatuteTree) -> NodeSnapshot {
    build_snapshot(tree, tree.root())
}

fn build_snapshot(tree: &StatuteTree, id: NodeId) -> NodeSnapshot {
    let node = &tree[id];
    let node_type = if node.parent().is_none() {
        "Root"
    } else if node.has_children() {
        "Provision"
    } else if node.placeholder {
        "Placeholder"
    } else {
        "Leaf"
    };
    let label = node.term.clone().unwrap_or_else(|| node.text.clone());

    let mut snapshot =
        NodeSnapshot::new(node_type, label).with_attribute("identifier", node.identifier.clone());
    if let Some(cite) = &node.cite_used {
        snapshot = snapshot.with_attribute("cite_used", cite.clone());
    }
    if let Some(cite) = &node.cite_defined {
        snapshot = snapshot.with_attribute("cite_defined", cite.clone());
    }
    if let Some(num) = node.sentence_num {
        snapshot = snapshot.with_attribute("sentence_num", num.to_string());
    }
    for child in node.children() {
        snapshot = snapshot.with_child(build_snapshot(tree, *child));
    }
    snapshot
}

pub fn to_json(tree: &StatuteTree) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&snapshot_tree(tree))
}
