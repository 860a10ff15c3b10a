//! Wire protocol for transparent remote file operations.
//!
//! This crate is pure encode/decode: it has no knowledge of sockets,
//! threads, or processes. It defines, bottom-up:
//!
//! - [`codec`]: offset-based primitive reads/writes.
//! - [`opcode`]: the fixed set of operation codes.
//! - [`dirtree`]: the recursive directory-tree wire format.
//! - [`envelope`]: the opcode-tagged request [`envelope::Frame`] and its
//!   [`envelope::Response`].
//! - [`ops`]: per-operation request/response payloads.
//!
//! The outer byte-stream length prefix that wraps an encoded [`envelope::Frame`]
//! or [`envelope::Response`] on the wire is a transport concern and lives in
//! `rfo-core`'s `transport` module, not here.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod dirtree;
pub mod envelope;
pub mod errors;
pub mod ops;
pub mod opcode;

pub use dirtree::DirTreeNode;
pub use envelope::{Frame, Response};
pub use errors::{ProtocolError, Result};
pub use opcode::Opcode;
