//! Directory-tree wire format, used by the `getdirtree` response.
//!
//! Depth-first preorder, mirroring `serde.c`'s `mem_write_tree`/
//! `mem_read_tree`: `num_subdirs` (u32), then the name length (machine-word
//! sized, to match the original's `size_t`), then the name bytes (including
//! the nul terminator — callers pass the full C-string length, not
//! [`str::len`]), then each child recursively.

use crate::codec::{read_bytes, read_u32, read_usize, write_bytes, write_u32, write_usize};
use crate::errors::Result;

/// One node of a directory tree: a name and its immediate subdirectories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirTreeNode {
    /// The directory's name (not a full path), without a nul terminator.
    pub name: String,
    /// Immediate subdirectories, in the order they were enumerated.
    pub subdirs: Vec<DirTreeNode>,
}

impl DirTreeNode {
    /// Builds a leaf node with no subdirectories.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), subdirs: Vec::new() }
    }

    /// Encodes this node and its subtree, depth-first preorder.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_into(&mut buf, 0);
        buf
    }

    fn write_into(&self, buf: &mut Vec<u8>, off: usize) -> usize {
        let num_subdirs = u32::try_from(self.subdirs.len()).unwrap_or(u32::MAX);
        let off = write_u32(buf, off, num_subdirs);
        let name_len = self.name.len() + 1;
        let off = write_usize(buf, off, name_len);
        let off = write_bytes(buf, off, self.name.as_bytes());
        let mut off = write_bytes(buf, off, &[0u8]);
        for child in &self.subdirs {
            off = child.write_into(buf, off);
        }
        off
    }

    /// Decodes a node previously produced by [`DirTreeNode::encode`].
    ///
    /// Tolerates arbitrary nesting depth; does not detect cycles, since the
    /// wire format can only describe finite trees.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError::Truncated`] if the buffer
    /// ends before a declared field is fully present.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (node, _) = Self::read_from(data, 0)?;
        Ok(node)
    }

    fn read_from(data: &[u8], off: usize) -> Result<(Self, usize)> {
        let (num_subdirs, off) = read_u32(data, off)?;
        let (name_len, off) = read_usize(data, off)?;
        let (raw_name, off) = read_bytes(data, off, name_len)?;
        let name = String::from_utf8_lossy(raw_name.strip_suffix(&[0u8]).unwrap_or(raw_name)).into_owned();
        // Not `Vec::with_capacity(num_subdirs as usize)`: num_subdirs is
        // attacker-controlled and unvalidated at this point, so a claimed
        // count in the billions would force a multi-gigabyte allocation
        // before a single child has actually been read off the wire.
        let mut subdirs = Vec::new();
        let mut off = off;
        for _ in 0..num_subdirs {
            let (child, next) = Self::read_from(data, off)?;
            subdirs.push(child);
            off = next;
        }
        Ok((Self { name, subdirs }, off))
    }
}
