//! Shared runtime support for the transparent remote file operations system:
//! the descriptor-namespace scheme, byte-stream framing, environment
//! configuration, and the error taxonomy both peers share.
//!
//! `rfo-client` and `rfo-server` both depend on this crate so that the
//! framing algorithm and the FD_OFFSET scheme are implemented exactly once.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod fd;
pub mod transport;

pub use config::{RemoteConfig, ServerConfig};
pub use error::{abort_on_fatal, FatalError, TransportError};
pub use fd::{is_remote, pack_fd, unpack_fd, FD_OFFSET};
