use std::collections::HashSet;
use std::rc::{Rc, Weak};

use crate::node::Node;

/// Points `child`'s back-reference at `parent`, or clears it.
pub(crate) fn set_parent<T>(child: &Node<T>, parent: Option<&Rc<Node<T>>>) {
    *child.parent.borrow_mut() = parent.map_or_else(Weak::new, Rc::downgrade);
}

/// Returns `true` if `child`'s back-reference names `parent`.
pub(crate) fn parent_is<T>(child: &Node<T>, parent: &Rc<Node<T>>) -> bool {
    child.parent.borrow().as_ptr() == Rc::as_ptr(parent)
}

/// Returns `true` if `candidate` is `node` or one of its ancestors.
///
/// A back-reference chain that loops (only possible after a precondition was
/// broken) counts as a cycle.
pub(crate) fn is_ancestor_or_self<T>(candidate: &Rc<Node<T>>, node: &Rc<Node<T>>) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(Rc::clone(node));

    while let Some(n) = current {
        if Rc::ptr_eq(&n, candidate) || !seen.insert(Rc::as_ptr(&n)) {
            return true;
        }
        current = n.parent.borrow().upgrade();
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TreeNode;

    fn rc_of<T>(node: &TreeNode<T>) -> Rc<Node<T>> {
        Rc::clone(&node.node)
    }

    #[test]
    fn test_set_parent() {
        let parent = TreeNode::leaf(0);
        let child = TreeNode::leaf(1);
        let parent_rc = rc_of(&parent);
        let child_rc = rc_of(&child);

        set_parent(&child_rc, Some(&parent_rc));
        assert!(parent_is(&child_rc, &parent_rc));
        assert_eq!(child.parent(), Some(parent.clone()));

        set_parent(&child_rc, None);
        assert!(!parent_is(&child_rc, &parent_rc));
        assert!(!child.has_parent());
    }

    #[test]
    fn test_is_ancestor_or_self() {
        let leaf = TreeNode::leaf(2);
        let mid = TreeNode::fork(1, Some(leaf.clone()), None);
        let root = TreeNode::fork(0, None, Some(mid.clone()));
        let stranger = TreeNode::leaf(3);

        assert!(is_ancestor_or_self(&rc_of(&leaf), &rc_of(&leaf)));
        assert!(is_ancestor_or_self(&rc_of(&mid), &rc_of(&leaf)));
        assert!(is_ancestor_or_self(&rc_of(&root), &rc_of(&leaf)));
        assert!(!is_ancestor_or_self(&rc_of(&leaf), &rc_of(&root)));
        assert!(!is_ancestor_or_self(&rc_of(&stranger), &rc_of(&leaf)));
    }

    #[test]
    fn test_looping_back_references_count_as_cycle() {
        let a = TreeNode::leaf(0);
        let b = TreeNode::leaf(1);
        let a_rc = rc_of(&a);
        let b_rc = rc_of(&b);

        set_parent(&a_rc, Some(&b_rc));
        set_parent(&b_rc, Some(&a_rc));

        let stranger = TreeNode::leaf(2);
        assert!(is_ancestor_or_self(&rc_of(&stranger), &a_rc));
    }
}
