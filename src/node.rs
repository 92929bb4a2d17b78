//! The binary tree node.
//!
//! A [`TreeNode`] is an owning handle to a node allocated behind an `Rc`.
//! Children are held through strong links and the parent through a `Weak`
//! one, so the tree is released as soon as the last handle to its root goes
//! away even though every child can still navigate upwards.
//!
//! Nodes can only be allocated through [`TreeNode::leaf`] and
//! [`TreeNode::fork`] (or [`TreeNode::try_fork`]). Every operation that
//! installs a child link writes the matching back-reference in the same call,
//! and every eviction clears the evicted node's back-reference before the
//! evicted handle is handed back.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::error::{Error, NodeResult};
use crate::side::Side;
use crate::util::{is_ancestor_or_self, parent_is, set_parent};
use crate::weak::WeakTreeNode;

pub(crate) type Link<T> = Option<Rc<Node<T>>>;

/// Node storage.
///
/// Each field sits in its own `RefCell` so relinking a child never needs a
/// borrow of the payload, and a node attached to itself (a caller error)
/// cannot trip a double borrow.
pub(crate) struct Node<T> {
    value: RefCell<T>,
    pub(crate) left: RefCell<Link<T>>,
    pub(crate) right: RefCell<Link<T>>,
    pub(crate) parent: RefCell<Weak<Node<T>>>,
}

impl<T> Node<T> {
    fn new(value: T, left: Link<T>, right: Link<T>) -> Self {
        Node {
            value: RefCell::new(value),
            left: RefCell::new(left),
            right: RefCell::new(right),
            parent: RefCell::new(Weak::new()),
        }
    }

    pub(crate) fn slot(&self, side: Side) -> &RefCell<Link<T>> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

// Releasing a subtree unlinks it iteratively so a degenerate spine cannot
// overflow the stack. Children still co-owned by a handle only lose one count.
impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut pending: Vec<Rc<Node<T>>> = Vec::new();
        pending.extend(self.left.get_mut().take());
        pending.extend(self.right.get_mut().take());

        let mut released = 0usize;
        while let Some(child) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(child) {
                pending.extend(node.left.get_mut().take());
                pending.extend(node.right.get_mut().take());
                released += 1;
            }
        }

        if released > 0 {
            trace!(released, "released subtree");
        }
    }
}

/// An owning handle to a binary tree node.
///
/// Cloning a handle co-owns the node; the node lives as long as a handle or
/// a parent's child link refers to it. Equality compares node identity.
///
/// # Preconditions
///
/// The unchecked attachment operations ([`fork`](Self::fork),
/// [`replace_child`](Self::replace_child) and friends) expect the subtree
/// being attached to be detached, and not to be the node itself or one of
/// its ancestors. Breaking this is memory safe but leaves the links
/// inconsistent (two parents claim the same child) or builds a reference
/// cycle whose nodes are never released. The `try_*` variants check both
/// conditions and return an [`Error`] instead.
///
/// # Examples
///
/// ```
/// use bintree::TreeNode;
///
/// let left = TreeNode::leaf(1);
/// let right = TreeNode::leaf(2);
/// let root = TreeNode::fork(0, Some(left.clone()), Some(right));
///
/// assert_eq!(*root.left().unwrap().value(), 1);
/// assert_eq!(*left.parent().unwrap().value(), 0);
/// assert!(!root.has_parent());
/// ```
pub struct TreeNode<T> {
    pub(crate) node: Rc<Node<T>>,
}

impl<T> Clone for TreeNode<T> {
    fn clone(&self) -> Self {
        TreeNode {
            node: Rc::clone(&self.node),
        }
    }
}

impl<T> TreeNode<T> {
    pub(crate) fn from_rc(node: Rc<Node<T>>) -> Self {
        TreeNode { node }
    }

    /// Creates a detached node holding `value` with no children.
    pub fn leaf(value: T) -> Self {
        TreeNode::from_rc(Rc::new(Node::new(value, None, None)))
    }

    /// Creates a detached node holding `value` with the given children.
    ///
    /// Both children get their back-reference set to the new node before it
    /// is returned. Each child must be detached and the two must be distinct
    /// nodes; see [`try_fork`](Self::try_fork) for the checked form.
    pub fn fork(value: T, left: Option<TreeNode<T>>, right: Option<TreeNode<T>>) -> Self {
        let fork = TreeNode::from_rc(Rc::new(Node::new(
            value,
            left.map(|l| l.node),
            right.map(|r| r.node),
        )));
        fork.adopt(Side::Left);
        fork.adopt(Side::Right);

        trace!(left = fork.has_left(), right = fork.has_right(), "forked node");
        fork
    }

    /// Like [`fork`](Self::fork), but refuses children that already have a
    /// parent or that are the same node.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::{Error, TreeNode};
    ///
    /// let shared = TreeNode::leaf(1);
    /// let _owner = TreeNode::fork(0, Some(shared.clone()), None);
    ///
    /// let err = TreeNode::try_fork(2, Some(shared), None).unwrap_err();
    /// assert_eq!(err, Error::AlreadyAttached);
    /// ```
    pub fn try_fork(
        value: T,
        left: Option<TreeNode<T>>,
        right: Option<TreeNode<T>>,
    ) -> NodeResult<Self> {
        if let (Some(l), Some(r)) = (&left, &right) {
            if TreeNode::ptr_eq(l, r) {
                debug!(err = %Error::DuplicateChild, "rejected fork");
                return Err(Error::DuplicateChild);
            }
        }
        if left.iter().chain(right.iter()).any(TreeNode::has_parent) {
            debug!(err = %Error::AlreadyAttached, "rejected fork");
            return Err(Error::AlreadyAttached);
        }
        Ok(TreeNode::fork(value, left, right))
    }

    fn adopt(&self, side: Side) {
        if let Some(child) = self.node.slot(side).borrow().as_ref() {
            set_parent(child, Some(&self.node));
        }
    }

    /// Returns `true` if the slot on `side` holds a child.
    pub fn has_child(&self, side: Side) -> bool {
        self.node.slot(side).borrow().is_some()
    }

    pub fn has_left(&self) -> bool {
        self.has_child(Side::Left)
    }

    pub fn has_right(&self) -> bool {
        self.has_child(Side::Right)
    }

    /// Returns `true` if this node is attached to a live parent.
    ///
    /// A detached node and a node whose parent has been released report the
    /// same thing: there is no current owner.
    pub fn has_parent(&self) -> bool {
        self.node.parent.borrow().strong_count() > 0
    }

    pub fn is_root(&self) -> bool {
        !self.has_parent()
    }

    pub fn is_leaf(&self) -> bool {
        !self.has_left() && !self.has_right()
    }

    /// Borrows the payload.
    ///
    /// # Panics
    ///
    /// Panics if the payload is currently borrowed through
    /// [`value_mut`](Self::value_mut).
    pub fn value(&self) -> Ref<'_, T> {
        self.node.value.borrow()
    }

    /// Mutably borrows the payload.
    ///
    /// # Panics
    ///
    /// Panics if the payload is currently borrowed.
    pub fn value_mut(&self) -> RefMut<'_, T> {
        self.node.value.borrow_mut()
    }

    /// Stores `value` in this node and returns the previous payload.
    pub fn replace_value(&self, value: T) -> T {
        mem::replace(&mut *self.value_mut(), value)
    }

    /// Returns a co-owning handle to the child on `side`, if any.
    pub fn child(&self, side: Side) -> Option<TreeNode<T>> {
        self.node
            .slot(side)
            .borrow()
            .as_ref()
            .map(|child| TreeNode::from_rc(Rc::clone(child)))
    }

    pub fn left(&self) -> Option<TreeNode<T>> {
        self.child(Side::Left)
    }

    pub fn right(&self) -> Option<TreeNode<T>> {
        self.child(Side::Right)
    }

    /// Resolves the back-reference into a temporary owning handle.
    ///
    /// Returns `None` when the node is detached or its parent has already
    /// been released.
    pub fn parent(&self) -> Option<TreeNode<T>> {
        self.node.parent.borrow().upgrade().map(TreeNode::from_rc)
    }

    /// Returns which slot of the current parent holds this node.
    pub fn side(&self) -> Option<Side> {
        self.parent().and_then(|parent| parent.slot_of(self))
    }

    fn slot_of(&self, child: &TreeNode<T>) -> Option<Side> {
        [Side::Left, Side::Right]
            .iter()
            .copied()
            .find(|&side| self.holds(side, child))
    }

    fn holds(&self, side: Side, child: &TreeNode<T>) -> bool {
        self.node
            .slot(side)
            .borrow()
            .as_ref()
            .map_or(false, |held| Rc::ptr_eq(held, &child.node))
    }

    /// Installs `child` in the slot on `side` and returns the evicted child.
    ///
    /// The evicted child comes back detached: its back-reference is cleared
    /// and the caller now owns it. Dropping the returned handle releases the
    /// subtree unless other handles to it remain. Passing `None` only evicts.
    ///
    /// `child` must be detached and must not be this node or one of its
    /// ancestors; see [`try_replace_child`](Self::try_replace_child).
    pub fn replace_child(&self, side: Side, child: Option<TreeNode<T>>) -> Option<TreeNode<T>> {
        let evicted = self.node.slot(side).borrow_mut().take();
        if let Some(old) = &evicted {
            // Only clear a back-reference that still names this node.
            if parent_is(old, &self.node) {
                set_parent(old, None);
            }
        }
        if let Some(new) = &child {
            set_parent(&new.node, Some(&self.node));
        }

        let installed = child.is_some();
        *self.node.slot(side).borrow_mut() = child.map(|c| c.node);

        trace!(%side, installed, evicted = evicted.is_some(), "replaced child");
        evicted.map(TreeNode::from_rc)
    }

    /// # Examples
    ///
    /// ```
    /// use bintree::TreeNode;
    ///
    /// let root = TreeNode::fork(0, Some(TreeNode::leaf(1)), Some(TreeNode::leaf(2)));
    /// let old = root.replace_right(Some(TreeNode::leaf(3))).unwrap();
    ///
    /// assert_eq!(*old.value(), 2);
    /// assert!(!old.has_parent());
    /// assert_eq!(*root.right().unwrap().value(), 3);
    /// ```
    pub fn replace_right(&self, child: Option<TreeNode<T>>) -> Option<TreeNode<T>> {
        self.replace_child(Side::Right, child)
    }

    pub fn replace_left(&self, child: Option<TreeNode<T>>) -> Option<TreeNode<T>> {
        self.replace_child(Side::Left, child)
    }

    /// Detaches and returns the child on `side`.
    pub fn remove_child(&self, side: Side) -> Option<TreeNode<T>> {
        self.replace_child(side, None)
    }

    pub fn remove_left(&self) -> Option<TreeNode<T>> {
        self.remove_child(Side::Left)
    }

    pub fn remove_right(&self) -> Option<TreeNode<T>> {
        self.remove_child(Side::Right)
    }

    /// Installs a fresh leaf holding `value` on `side` and returns the
    /// evicted child.
    pub fn replace_child_with_leaf(&self, side: Side, value: T) -> Option<TreeNode<T>> {
        self.replace_child(side, Some(TreeNode::leaf(value)))
    }

    pub fn replace_left_with_leaf(&self, value: T) -> Option<TreeNode<T>> {
        self.replace_child_with_leaf(Side::Left, value)
    }

    pub fn replace_right_with_leaf(&self, value: T) -> Option<TreeNode<T>> {
        self.replace_child_with_leaf(Side::Right, value)
    }

    /// Checked form of [`replace_child`](Self::replace_child).
    ///
    /// Fails with [`Error::CycleDetected`] if `child` is this node or one of
    /// its ancestors, and with [`Error::AlreadyAttached`] if `child` has a
    /// parent and is not already the child on `side`. Nothing is changed on
    /// error.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::{Error, Side, TreeNode};
    ///
    /// let child = TreeNode::leaf(1);
    /// let root = TreeNode::fork(0, Some(child.clone()), None);
    ///
    /// let err = child.try_replace_child(Side::Left, Some(root)).unwrap_err();
    /// assert_eq!(err, Error::CycleDetected);
    /// assert!(child.is_leaf());
    /// ```
    pub fn try_replace_child(
        &self,
        side: Side,
        child: Option<TreeNode<T>>,
    ) -> NodeResult<Option<TreeNode<T>>> {
        if let Some(candidate) = &child {
            if let Err(err) = self.check_attachable(side, candidate) {
                debug!(%side, %err, "rejected attachment");
                return Err(err);
            }
        }
        Ok(self.replace_child(side, child))
    }

    pub fn try_replace_left(&self, child: Option<TreeNode<T>>) -> NodeResult<Option<TreeNode<T>>> {
        self.try_replace_child(Side::Left, child)
    }

    pub fn try_replace_right(&self, child: Option<TreeNode<T>>) -> NodeResult<Option<TreeNode<T>>> {
        self.try_replace_child(Side::Right, child)
    }

    fn check_attachable(&self, side: Side, candidate: &TreeNode<T>) -> NodeResult<()> {
        if is_ancestor_or_self(&candidate.node, &self.node) {
            return Err(Error::CycleDetected);
        }
        if candidate.has_parent() && !self.holds(side, candidate) {
            return Err(Error::AlreadyAttached);
        }
        Ok(())
    }

    /// Removes this node from its parent's child slot.
    ///
    /// Returns `false` if the node was not attached. The node itself stays
    /// alive for as long as `self` does.
    pub fn detach(&self) -> bool {
        let parent = match self.parent() {
            Some(parent) => parent,
            None => return false,
        };
        match parent.slot_of(self) {
            Some(side) => {
                parent.remove_child(side);
                true
            }
            None => false,
        }
    }

    /// Returns a non-owning handle to this node.
    pub fn downgrade(&self) -> WeakTreeNode<T> {
        WeakTreeNode::new(Rc::downgrade(&self.node))
    }

    /// Number of owning references to this node: handles plus the parent's
    /// child link, if attached.
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.node)
    }

    /// Returns `true` if both handles refer to the same node.
    pub fn ptr_eq(this: &TreeNode<T>, other: &TreeNode<T>) -> bool {
        Rc::ptr_eq(&this.node, &other.node)
    }
}

impl<T> PartialEq for TreeNode<T> {
    fn eq(&self, other: &Self) -> bool {
        TreeNode::ptr_eq(self, other)
    }
}

impl<T> Eq for TreeNode<T> {}

impl<T> Hash for TreeNode<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.node).hash(state);
    }
}

enum DebugStep<T> {
    Node(Rc<Node<T>>),
    Child(Link<T>),
    Text(&'static str),
    Close(*const Node<T>),
}

// Rendered with an explicit stack so deep spines cannot overflow the call
// stack. A child that is also one of its own ancestors prints as `<cycle>`.
// The parent is never printed.
impl<T: fmt::Debug> fmt::Debug for TreeNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut path: HashSet<*const Node<T>> = HashSet::new();
        let mut steps = vec![DebugStep::Node(Rc::clone(&self.node))];

        while let Some(step) = steps.pop() {
            match step {
                DebugStep::Node(node) => {
                    path.insert(Rc::as_ptr(&node));
                    f.write_str("TreeNode { value: ")?;
                    match node.value.try_borrow() {
                        Ok(value) => fmt::Debug::fmt(&*value, f)?,
                        Err(_) => f.write_str("<borrowed>")?,
                    }
                    f.write_str(", left: ")?;

                    // Popped in reverse: left, separator, right, close.
                    steps.push(DebugStep::Close(Rc::as_ptr(&node)));
                    steps.push(DebugStep::Child(node.right.borrow().clone()));
                    steps.push(DebugStep::Text(", right: "));
                    steps.push(DebugStep::Child(node.left.borrow().clone()));
                }
                DebugStep::Child(None) => f.write_str("None")?,
                DebugStep::Child(Some(child)) if path.contains(&Rc::as_ptr(&child)) => {
                    f.write_str("Some(<cycle>)")?
                }
                DebugStep::Child(Some(child)) => {
                    f.write_str("Some(")?;
                    steps.push(DebugStep::Text(")"));
                    steps.push(DebugStep::Node(child));
                }
                DebugStep::Text(text) => f.write_str(text)?,
                DebugStep::Close(ptr) => {
                    path.remove(&ptr);
                    f.write_str(" }")?;
                }
            }
        }

        Ok(())
    }
}
