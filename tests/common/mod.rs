#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

use bintree::TreeNode;

static TEST_SETUP: Lazy<()> = Lazy::new(|| {
    // RUST_LOG=bintree=trace shows every relink
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
});

pub fn init_test_setup() {
    Lazy::force(&TEST_SETUP);
}

/// Payload that counts how many times it has been dropped.
#[derive(Debug)]
pub struct DropCounter {
    pub id: u32,
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    pub fn new(id: u32, drops: &Rc<Cell<usize>>) -> Self {
        DropCounter {
            id,
            drops: Rc::clone(drops),
        }
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Checks both directions of every link touching `node`.
pub fn links_consistent<T>(node: &TreeNode<T>) -> bool {
    let upward = match node.parent() {
        Some(parent) => {
            parent.left().as_ref() == Some(node) || parent.right().as_ref() == Some(node)
        }
        None => true,
    };
    let downward = node
        .left()
        .into_iter()
        .chain(node.right())
        .all(|child| child.parent().as_ref() == Some(node));

    upward && downward
}
