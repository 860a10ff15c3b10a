//! The directory-tree walk backing the `getdirtree` handler.
//!
//! Not present in `original_source` (only the marshalling side is), so this
//! is implemented fresh against [`std::fs::read_dir`], in the same
//! depth-first preorder the wire format uses: a node's own name is known
//! before any of its children are visited.

use std::fs;
use std::io;
use std::path::Path;

use rfo_proto::DirTreeNode;

/// Walks `path` recursively, returning the tree of its subdirectories.
///
/// Only directory entries are included; regular files, symlinks, and other
/// entry kinds are skipped, since the tree this system transmits describes
/// directory structure, not full directory listings (that's what
/// `getdirentries` is for).
///
/// # Errors
/// Propagates the [`io::Error`] from the first failing `read_dir`/
/// `file_type`/`metadata` call encountered during the walk.
pub fn walk(path: &str) -> io::Result<DirTreeNode> {
    walk_inner(Path::new(path), path.to_string())
}

fn walk_inner(path: &Path, name: String) -> io::Result<DirTreeNode> {
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let child_name = entry.file_name().to_string_lossy().into_owned();
            subdirs.push(walk_inner(&entry.path(), child_name)?);
        }
    }
    subdirs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(DirTreeNode { name, subdirs })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn walks_nested_directories_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a").join("a1")).unwrap();
        fs::write(dir.path().join("not_a_dir.txt"), b"ignored").unwrap();

        let root_name = dir.path().to_string_lossy().into_owned();
        let tree = walk(&root_name).unwrap();
        assert_eq!(tree.subdirs.len(), 2);
        let a = tree.subdirs.iter().find(|n| n.name == "a").unwrap();
        assert_eq!(a.subdirs.len(), 1);
        assert_eq!(a.subdirs[0].name, "a1");
        let b = tree.subdirs.iter().find(|n| n.name == "b").unwrap();
        assert!(b.subdirs.is_empty());
    }

    #[test]
    fn missing_path_is_an_io_error() {
        assert!(walk("/no/such/rfo-test-path/at/all").is_err());
    }
}
