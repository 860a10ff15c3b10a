//! Fuzz target for `DirTreeNode::decode`.
//!
//! This is the one recursive decoder in the protocol: a crafted
//! `num_subdirs` value could in principle be used to force unbounded
//! recursion or an allocation bomb via `Vec::with_capacity(num_subdirs)`
//! before any child has actually been validated. Must never panic or abort.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rfo_proto::DirTreeNode;

fuzz_target!(|data: &[u8]| {
    let _ = DirTreeNode::decode(data);
});
