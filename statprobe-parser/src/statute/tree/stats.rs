//! Size and shape statistics of a statute tree.

use serde::Serialize;

use super::StatuteTree;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeStats {
    pub nodes: usize,
    pub max_depth: usize,
    pub max_width: usize,
    pub leaves: usize,
    pub non_leaves: usize,
    pub placeholders: usize,
    pub total_leaf_depth: usize,
    pub total_branching: usize,
}

impl TreeStats {
    pub fn of(tree: &StatuteTree) -> Self {
        let mut stats = TreeStats::default();
        let mut stack = vec![(tree.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &tree[id];
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            if node.has_children() {
                stats.non_leaves += 1;
                stats.total_branching += node.children().len();
                stats.max_width = stats.max_width.max(node.children().len());
                stack.extend(node.children().iter().map(|c| (*c, depth + 1)));
            } else if node.placeholder {
                stats.placeholders += 1;
            } else {
                stats.leaves += 1;
                stats.total_leaf_depth += depth;
            }
        }
        stats
    }

    pub fn average_leaf_depth(&self) -> Option<f64> {
        (self.leaves > 0).then(|| self.total_leaf_depth as f64 / self.leaves as f64)
    }

    pub fn average_branching(&self) -> Option<f64> {
        (self.non_leaves > 0).then(|| self.total_branching as f64 / self.non_leaves as f64)
    }
}

impl std::fmt::Display for TreeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "nodes={} depth={} width={} leaves={} non_leaves={} placeholders={}",
            self.nodes, self.max_depth, self.max_width, self.leaves, self.non_leaves, self.placeholders
        )?;
        if let Some(avg) = self.average_leaf_depth() {
            write!(f, " avg_leaf_depth={avg:.2}")?;
        }
        if let Some(avg) = self.average_branching() {
            write!(f, " avg_branching={avg:.2}")?;
        }
        Ok(())
    }
}
