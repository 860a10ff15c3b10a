//! Property-based tests for the directory-tree wire format.
//!
//! Verifies the testable property that any finite tree, once encoded and
//! decoded, comes back structurally equal: same names, same child counts,
//! same order, same depth.
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rfo_proto::DirTreeNode;

fn arbitrary_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.]{1,16}"
}

fn arbitrary_tree(max_depth: u32, max_children: usize) -> impl Strategy<Value = DirTreeNode> {
    let leaf = arbitrary_name().prop_map(DirTreeNode::new);
    leaf.prop_recursive(max_depth, 64, max_children as u32, move |inner| {
        (arbitrary_name(), prop::collection::vec(inner, 0..max_children))
            .prop_map(|(name, subdirs)| DirTreeNode { name, subdirs })
    })
}

proptest! {
    #[test]
    fn arbitrary_tree_round_trips(tree in arbitrary_tree(4, 4)) {
        let decoded = DirTreeNode::decode(&tree.encode()).unwrap();
        prop_assert_eq!(decoded, tree);
    }
}

#[test]
fn empty_root_round_trips() {
    let tree = DirTreeNode::new("");
    let decoded = DirTreeNode::decode(&tree.encode()).unwrap();
    assert_eq!(decoded, tree);
}

#[test]
fn wide_flat_tree_round_trips() {
    let tree = DirTreeNode {
        name: "root".to_string(),
        subdirs: (0..200).map(|i| DirTreeNode::new(format!("child{i}"))).collect(),
    };
    let decoded = DirTreeNode::decode(&tree.encode()).unwrap();
    assert_eq!(decoded, tree);
}
