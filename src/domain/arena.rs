use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{NodeRecord, Side};

/// Tree node in the arena-based decision tree.
#[derive(Debug)]
pub struct TreeNode {
    /// Record this node was promoted from
    pub record: NodeRecord,
    left: Option<Index>,
    right: Option<Index>,
}

impl TreeNode {
    fn new(record: NodeRecord) -> Self {
        Self {
            record,
            left: None,
            right: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn left(&self) -> Option<Index> {
        self.left
    }

    pub fn right(&self) -> Option<Index> {
        self.right
    }

    pub fn child(&self, side: Side) -> Option<Index> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Existing children, left before right.
    pub fn children(&self) -> impl Iterator<Item = (Side, Index)> + '_ {
        [(Side::Left, self.left), (Side::Right, self.right)]
            .into_iter()
            .filter_map(|(side, idx)| idx.map(|idx| (side, idx)))
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Binary decision tree stored in a generational arena.
///
/// Nodes are linked by stable arena indices. The only way to obtain a tree is
/// through [`crate::domain::TreeBuilder`]; once built it is read-only.
#[derive(Debug)]
pub struct DecisionTree {
    arena: Arena<TreeNode>,
    root: Index,
}

impl DecisionTree {
    pub(crate) fn with_root(record: NodeRecord) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode::new(record));
        Self { arena, root }
    }

    /// Insert `record` as the `side` child of `parent`, returning its index.
    ///
    /// Returns `None` if `parent` is not in this tree or the slot is taken.
    pub(crate) fn attach(&mut self, parent: Index, side: Side, record: NodeRecord) -> Option<Index> {
        if self.arena.get(parent)?.child(side).is_some() {
            return None;
        }
        let idx = self.arena.insert(TreeNode::new(record));
        let parent = self.arena.get_mut(parent)?;
        match side {
            Side::Left => parent.left = Some(idx),
            Side::Right => parent.right = Some(idx),
        }
        Some(idx)
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &TreeNode {
        &self.arena[self.root]
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Number of nodes reachable from the root.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal: node, left subtree, right subtree.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn find(&self, name: &str) -> Option<&TreeNode> {
        self.iter().map(|(_, node)| node).find(|node| node.name() == name)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                for (_, child) in node.children() {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Leaf nodes in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<&TreeNode> {
        self.iter()
            .map(|(_, node)| node)
            .filter(|node| node.is_leaf())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a DecisionTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a DecisionTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Right first so the left subtree is visited first
                if let Some(right) = node.right {
                    self.stack.push(right);
                }
                if let Some(left) = node.left {
                    self.stack.push(left);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DecisionTree {
        let mut tree = DecisionTree::with_root(NodeRecord::named("Root").with_split("age", 30.0));
        let root = tree.root();
        let left = tree
            .attach(root, Side::Left, NodeRecord::named("Root_L").with_split("income", 5.0))
            .unwrap();
        tree.attach(root, Side::Right, NodeRecord::named("Root_R")).unwrap();
        tree.attach(left, Side::Left, NodeRecord::named("Root_L_L")).unwrap();
        tree
    }

    #[test]
    fn test_preorder() {
        let tree = sample();
        let names: Vec<_> = tree.iter().map(|(_, n)| n.name().to_string()).collect();
        assert_eq!(names, vec!["Root", "Root_L", "Root_L_L", "Root_R"]);
    }

    #[test]
    fn test_depth_and_leaves() {
        let tree = sample();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.depth(), 3);
        let leaves: Vec<_> = tree.leaf_nodes().iter().map(|n| n.name()).collect();
        assert_eq!(leaves, vec!["Root_L_L", "Root_R"]);
    }

    #[test]
    fn test_attach_rejects_occupied_slot() {
        let mut tree = sample();
        let root = tree.root();
        assert!(tree.attach(root, Side::Left, NodeRecord::named("Root_L")).is_none());
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_is_leaf_iff_no_children() {
        let tree = sample();
        for (_, node) in tree.iter() {
            assert_eq!(node.is_leaf(), node.children().count() == 0);
        }
    }
}
