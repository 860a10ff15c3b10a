//! Protocol-level error taxonomy.
//!
//! A [`ProtocolError`] reflects a malformed frame: a non-positive length
//! prefix, a truncated payload, or an unrecognized opcode. Per §7 of the
//! design, every [`ProtocolError`] is fatal to the connection that produced
//! it — there is no recovery path, only process termination by the caller.

use thiserror::Error;

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Malformed-frame errors raised by the codec and envelope layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A length prefix (frame length, payload size) was zero or negative.
    #[error("non-positive length prefix: {0}")]
    NonPositiveLength(i64),

    /// Fewer bytes were available than the declared length required.
    #[error("truncated payload: expected {expected} bytes, found {actual}")]
    Truncated {
        /// Bytes the declared length promised.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// The opcode on the wire does not match any known operation.
    #[error("unrecognized opcode: {0}")]
    UnknownOpcode(u32),

    /// A path or name field was not valid UTF-8 / not nul-terminated.
    #[error("malformed string field: {0}")]
    MalformedString(String),
}
