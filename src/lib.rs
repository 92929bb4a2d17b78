//! # Binary Tree Node
//!
//! A mutable binary tree node with bidirectional navigation and deterministic
//! release of memory.
//!
//! Parents own their children through strong `Rc` links while children refer
//! back to their parent through a `Weak` link. The back-reference never keeps
//! a parent alive, so a tree is released as soon as the last handle to its
//! root is dropped, and a child whose parent is gone simply reports no parent.
//!
//! ## Features
//!
//! - **Two factories**: [`TreeNode::leaf`] and [`TreeNode::fork`] are the only
//!   way to allocate a node
//! - **Consistent links**: every operation that installs or evicts a child
//!   updates the child's back-reference in the same call
//! - **Detach and reattach**: evicted subtrees are handed back to the caller,
//!   who may drop them or attach them elsewhere
//! - **Checked attachment**: `try_*` variants refuse subtrees that already
//!   have a parent or would create a cycle
//!
//! Handles are `!Send` and `!Sync`; a tree belongs to one thread.
//!
//! ## Example
//!
//! ```rust
//! use bintree::TreeNode;
//!
//! let a = TreeNode::leaf(1);
//! let b = TreeNode::leaf(2);
//! let root = TreeNode::fork(0, Some(a.clone()), Some(b));
//!
//! assert_eq!(*root.right().unwrap().value(), 2);
//! assert_eq!(a.parent(), Some(root.clone()));
//!
//! // Swap in a new right child and take ownership of the old one
//! let old = root.replace_right_with_leaf(3).unwrap();
//! assert_eq!(*old.value(), 2);
//! assert!(!old.has_parent());
//! ```

mod error;
pub mod node;
mod side;
mod util;
mod weak;

// Re-export public types
pub use crate::error::{Error, NodeResult};
pub use crate::node::TreeNode;
pub use crate::side::Side;
pub use crate::weak::WeakTreeNode;
