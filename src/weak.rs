//! Non-owning node handles.
//!
//! A [`WeakTreeNode`] refers to a node without keeping it alive, the same way
//! a node refers to its parent. It has to be upgraded before use and stops
//! upgrading once the node has been released.

use std::fmt;
use std::rc::Weak;

use crate::node::{Node, TreeNode};

/// A handle that observes a node without owning it.
///
/// # Examples
///
/// ```
/// use bintree::TreeNode;
///
/// let root = TreeNode::fork(0, Some(TreeNode::leaf(1)), None);
/// let watch = root.left().unwrap().downgrade();
/// assert!(watch.is_alive());
///
/// // The evicted leaf is dropped right away since nothing else owns it.
/// root.remove_left();
/// assert!(!watch.is_alive());
/// assert!(watch.upgrade().is_none());
/// ```
pub struct WeakTreeNode<T> {
    node: Weak<Node<T>>,
}

impl<T> WeakTreeNode<T> {
    pub(crate) fn new(node: Weak<Node<T>>) -> Self {
        WeakTreeNode { node }
    }

    /// Returns an owning handle if the node is still alive.
    pub fn upgrade(&self) -> Option<TreeNode<T>> {
        self.node.upgrade().map(TreeNode::from_rc)
    }

    pub fn is_alive(&self) -> bool {
        self.node.strong_count() > 0
    }

    /// Returns `true` if both handles observe the same node.
    pub fn ptr_eq(&self, other: &WeakTreeNode<T>) -> bool {
        self.node.ptr_eq(&other.node)
    }
}

impl<T> Clone for WeakTreeNode<T> {
    fn clone(&self) -> Self {
        WeakTreeNode {
            node: Weak::clone(&self.node),
        }
    }
}

/// A handle that never upgrades.
impl<T> Default for WeakTreeNode<T> {
    fn default() -> Self {
        WeakTreeNode { node: Weak::new() }
    }
}

impl<T> fmt::Debug for WeakTreeNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakTreeNode")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_never_upgrades() {
        let weak: WeakTreeNode<u32> = WeakTreeNode::default();
        assert!(!weak.is_alive());
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_upgrade_returns_same_node() {
        let node = TreeNode::leaf(5);
        let weak = node.downgrade();

        assert_eq!(weak.upgrade(), Some(node.clone()));
        assert!(weak.ptr_eq(&node.downgrade()));
        assert!(!weak.ptr_eq(&TreeNode::leaf(5).downgrade()));
    }

    #[test]
    fn test_does_not_keep_node_alive() {
        let node = TreeNode::leaf(5);
        let weak = node.downgrade();
        assert_eq!(node.strong_count(), 1);

        drop(node);
        assert!(!weak.is_alive());
        assert_eq!(format!("{:?}", weak), "WeakTreeNode { alive: false }");
    }
}
