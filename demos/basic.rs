//! Building, relinking and releasing a small tree.
//!
//! Run with `RUST_LOG=bintree=trace` to see every relink.
use bintree::{Side, TreeNode};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Build a root with two leaves
    let leaf_a = TreeNode::leaf("a");
    let leaf_b = TreeNode::leaf("b");
    let root = TreeNode::fork("root", Some(leaf_a.clone()), Some(leaf_b.clone()));

    assert_eq!(*root.left().unwrap().value(), "a");
    assert_eq!(*leaf_b.parent().unwrap().value(), "root");
    assert_eq!(leaf_b.side(), Some(Side::Right));

    // Swap the right child out and move it under the left one
    let old = root.replace_right_with_leaf("c");
    assert!(!leaf_b.has_parent());
    leaf_a.replace_left(old);
    assert_eq!(leaf_b.parent(), Some(leaf_a.clone()));

    println!("{:#?}", root);

    // Checked attachment refuses to hang the root under its own grandchild
    if let Err(err) = leaf_b.try_replace_left(Some(root.clone())) {
        println!("refused: {}", err);
    }

    // Once the root is gone, the children no longer see a parent
    drop(root);
    assert!(leaf_a.parent().is_none());
    println!("leaf a is now a root: {}", leaf_a.is_root());
}
