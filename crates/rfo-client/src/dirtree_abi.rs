//! C ABI directory-tree type returned by `getdirtree` and consumed by
//! `freedirtree`.
//!
//! Matches the course-provided `struct dirtreenode` layout exactly (`name`,
//! `num_subdirs`, `subdirs`) so that callers written against the original C
//! interface see the same memory shape. Allocated with `libc::malloc`
//! throughout, not the Rust global allocator, since `freedirtree` releases
//! it with `libc::free` and a caller is entitled to assume malloc/free
//! symmetry.

use std::ffi::c_char;
use std::os::raw::c_int;
use std::ptr;

use rfo_proto::DirTreeNode;

/// The wire-equivalent of the original's `struct dirtreenode`.
#[repr(C)]
pub struct CDirTreeNode {
    /// Directory name, nul-terminated, heap-allocated.
    pub name: *mut c_char,
    /// Number of entries in `subdirs`.
    pub num_subdirs: c_int,
    /// Heap-allocated array of child pointers, `num_subdirs` long (null if
    /// `num_subdirs` is zero).
    pub subdirs: *mut *mut CDirTreeNode,
}

/// Builds a `malloc`-backed C tree from a decoded [`DirTreeNode`].
///
/// # Safety
/// The returned pointer (and its entire subtree) must eventually be passed
/// to [`free_tree`] exactly once.
pub unsafe fn build_tree(node: &DirTreeNode) -> *mut CDirTreeNode {
    let name_len = node.name.len() + 1;
    // SAFETY: malloc with a positive size; the result is checked below.
    let name_ptr = libc::malloc(name_len).cast::<c_char>();
    assert!(!name_ptr.is_null(), "malloc failed while building directory tree");
    ptr::copy_nonoverlapping(node.name.as_ptr().cast::<c_char>(), name_ptr, node.name.len());
    *name_ptr.add(node.name.len()) = 0;

    let num_subdirs = node.subdirs.len();
    let subdirs_ptr = if num_subdirs == 0 {
        ptr::null_mut()
    } else {
        let array = libc::malloc(num_subdirs * size_of::<*mut CDirTreeNode>()).cast::<*mut CDirTreeNode>();
        assert!(!array.is_null(), "malloc failed while building directory tree");
        for (i, child) in node.subdirs.iter().enumerate() {
            *array.add(i) = build_tree(child);
        }
        array
    };

    let tree_ptr = libc::malloc(size_of::<CDirTreeNode>()).cast::<CDirTreeNode>();
    assert!(!tree_ptr.is_null(), "malloc failed while building directory tree");
    tree_ptr.write(CDirTreeNode {
        name: name_ptr,
        num_subdirs: c_int::try_from(num_subdirs).unwrap_or(c_int::MAX),
        subdirs: subdirs_ptr,
    });
    tree_ptr
}

/// Recursively releases a tree built by [`build_tree`], entirely locally —
/// this performs no network I/O, matching the original's `freedirtree`.
///
/// # Safety
/// `dt` must point to a tree built by [`build_tree`] (or be null) and must
/// not be used again, nor freed twice.
pub unsafe fn free_tree(dt: *mut CDirTreeNode) {
    if dt.is_null() {
        return;
    }
    let node = &*dt;
    for i in 0..node.num_subdirs {
        free_tree(*node.subdirs.add(i as usize));
    }
    if !node.subdirs.is_null() {
        libc::free(node.subdirs.cast());
    }
    libc::free(node.name.cast());
    libc::free(dt.cast());
}
