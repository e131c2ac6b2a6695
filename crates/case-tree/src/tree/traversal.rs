//! Traversal and lookup over nested forests

use std::collections::{HashSet, VecDeque};

use crate::error::{Result, TreeError};
use crate::tree::{NodeKey, TreeNode};

/// Traversal order for walking a forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Visit parent before children (top-down)
    PreOrder,
    /// Visit children before parent (bottom-up)
    PostOrder,
    /// Visit level by level (breadth-first)
    BreadthFirst,
}

/// Walk every node of a forest in the given order
///
/// Yields `(depth, node)` pairs, with roots at depth 0.
pub fn walk(forest: &[TreeNode], order: TraversalOrder) -> TreeWalker<'_> {
    TreeWalker::new(forest, order)
}

struct Frame<'a> {
    depth: usize,
    node: &'a TreeNode,
    expanded: bool,
}

/// Iterator for traversing a forest in different orders
pub struct TreeWalker<'a> {
    order: TraversalOrder,
    pending: VecDeque<Frame<'a>>,
}

impl<'a> TreeWalker<'a> {
    fn new(forest: &'a [TreeNode], order: TraversalOrder) -> Self {
        let mut walker = Self {
            order,
            pending: VecDeque::new(),
        };
        walker.push_level(forest, 0);
        walker
    }

    /// Queue a sibling list so that it is visited in its given order
    fn push_level(&mut self, nodes: &'a [TreeNode], depth: usize) {
        let frames = nodes.iter().map(|node| Frame {
            depth,
            node,
            expanded: false,
        });
        match self.order {
            // Stack disciplines pop from the back, so push in reverse
            TraversalOrder::PreOrder | TraversalOrder::PostOrder => {
                for frame in frames.rev() {
                    self.pending.push_back(frame);
                }
            }
            TraversalOrder::BreadthFirst => self.pending.extend(frames),
        }
    }

    fn next_preorder(&mut self) -> Option<(usize, &'a TreeNode)> {
        let frame = self.pending.pop_back()?;
        self.push_level(frame.node.children(), frame.depth + 1);
        Some((frame.depth, frame.node))
    }

    fn next_postorder(&mut self) -> Option<(usize, &'a TreeNode)> {
        loop {
            let frame = self.pending.back_mut()?;
            if frame.expanded {
                let frame = self.pending.pop_back()?;
                return Some((frame.depth, frame.node));
            }
            frame.expanded = true;
            let (node, depth) = (frame.node, frame.depth);
            self.push_level(node.children(), depth + 1);
        }
    }

    fn next_breadthfirst(&mut self) -> Option<(usize, &'a TreeNode)> {
        let frame = self.pending.pop_front()?;
        self.push_level(frame.node.children(), frame.depth + 1);
        Some((frame.depth, frame.node))
    }
}

impl<'a> Iterator for TreeWalker<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        match self.order {
            TraversalOrder::PreOrder => self.next_preorder(),
            TraversalOrder::PostOrder => self.next_postorder(),
            TraversalOrder::BreadthFirst => self.next_breadthfirst(),
        }
    }
}

/// Count every node at every depth
pub fn node_count(forest: &[TreeNode]) -> usize {
    walk(forest, TraversalOrder::PreOrder).count()
}

/// Depth of the deepest node plus one (0 for an empty forest)
pub fn max_depth(forest: &[TreeNode]) -> usize {
    walk(forest, TraversalOrder::PreOrder)
        .map(|(depth, _)| depth + 1)
        .max()
        .unwrap_or(0)
}

/// Find a node by key
pub fn find<'a>(forest: &'a [TreeNode], key: &NodeKey) -> Option<&'a TreeNode> {
    walk(forest, TraversalOrder::PreOrder)
        .map(|(_, node)| node)
        .find(|node| &node.key == key)
}

/// Ancestor path of a node, root first and ending at the node itself
pub fn path_to<'a>(forest: &'a [TreeNode], key: &NodeKey) -> Option<Vec<&'a TreeNode>> {
    for node in forest {
        if &node.key == key {
            return Some(vec![node]);
        }
        if let Some(mut path) = path_to(node.children(), key) {
            path.insert(0, node);
            return Some(path);
        }
    }
    None
}

/// Keys below a node in pre-order, excluding the node itself
pub fn descendant_keys(node: &TreeNode) -> Vec<NodeKey> {
    walk(node.children(), TraversalOrder::PreOrder)
        .map(|(_, child)| child.key.clone())
        .collect()
}

/// Check that no two nodes anywhere in the forest share a key
pub fn validate_keys(forest: &[TreeNode]) -> Result<()> {
    let mut seen = HashSet::new();
    for (_, node) in walk(forest, TraversalOrder::PreOrder) {
        if !seen.insert(&node.key) {
            return Err(TreeError::DuplicateKey(node.key.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TreeNode> {
        vec![
            TreeNode::branch(
                1,
                "root",
                vec![
                    TreeNode::branch(2, "dir1", vec![TreeNode::leaf(3, "file2")]),
                    TreeNode::leaf(4, "file1"),
                ],
            ),
            TreeNode::leaf(5, "other"),
        ]
    }

    fn keys<'a>(nodes: impl Iterator<Item = (usize, &'a TreeNode)>) -> Vec<NodeKey> {
        nodes.map(|(_, node)| node.key.clone()).collect()
    }

    fn ints(ids: &[i64]) -> Vec<NodeKey> {
        ids.iter().copied().map(NodeKey::from).collect()
    }

    #[test]
    fn test_tree_traversal_preorder() {
        let forest = sample();
        assert_eq!(
            keys(walk(&forest, TraversalOrder::PreOrder)),
            ints(&[1, 2, 3, 4, 5])
        );
    }

    #[test]
    fn test_tree_traversal_postorder() {
        let forest = sample();
        assert_eq!(
            keys(walk(&forest, TraversalOrder::PostOrder)),
            ints(&[3, 2, 4, 1, 5])
        );
    }

    #[test]
    fn test_tree_traversal_breadthfirst() {
        let forest = sample();
        assert_eq!(
            keys(walk(&forest, TraversalOrder::BreadthFirst)),
            ints(&[1, 5, 2, 4, 3])
        );
    }

    #[test]
    fn test_tree_depth() {
        let forest = sample();
        let depths: Vec<_> = walk(&forest, TraversalOrder::PreOrder)
            .map(|(depth, _)| depth)
            .collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0]);
        assert_eq!(max_depth(&forest), 3);
        assert_eq!(max_depth(&[]), 0);
    }

    #[test]
    fn test_find_and_path() {
        let forest = sample();
        assert_eq!(node_count(&forest), 5);
        assert_eq!(find(&forest, &NodeKey::from(3)).unwrap().title, "file2");
        assert!(find(&forest, &NodeKey::from(9)).is_none());

        let path: Vec<_> = path_to(&forest, &NodeKey::from(3))
            .unwrap()
            .into_iter()
            .map(|node| node.title.as_str())
            .collect();
        assert_eq!(path, vec!["root", "dir1", "file2"]);
        assert!(path_to(&forest, &NodeKey::from("3")).is_none());
    }

    #[test]
    fn test_descendant_keys() {
        let forest = sample();
        assert_eq!(descendant_keys(&forest[0]), ints(&[2, 3, 4]));
        assert!(descendant_keys(&forest[1]).is_empty());
    }

    #[test]
    fn test_validate_keys() {
        assert!(validate_keys(&sample()).is_ok());

        let duplicated = vec![TreeNode::branch(1, "a", vec![TreeNode::leaf(1, "b")])];
        assert_eq!(
            validate_keys(&duplicated),
            Err(TreeError::DuplicateKey(NodeKey::from(1)))
        );
    }
}
