//! Shared error taxonomy.
//!
//! Four kinds of failure occur in this system, only two of which are ever
//! represented as a Rust `Result`:
//!
//! - [`TransportError`] and [`rfo_proto::ProtocolError`] are fatal at both
//!   peers: there is no recovery path, so they are propagated as
//!   [`FatalError`] up to the caller of [`abort_on_fatal`], which logs and
//!   terminates the process.
//! - An *operation* failure (the remote syscall itself returned an error) and
//!   a *local preflight* failure (e.g. `lseek` with no remote descriptor
//!   open) are not distinct Rust types at all: both are ordinary POSIX
//!   failures, surfaced to the caller as a sentinel return value plus a
//!   restored `errno`, exactly like a local syscall failure. The client
//!   stubs construct these directly; see `rfo-client`.

use std::io;

use thiserror::Error;

/// Failure of the underlying byte stream: connect, send, recv, or an
/// unexpected close. Always fatal.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The OS reported an I/O error on the connection.
    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),

    /// The peer closed the connection before the declared frame length was
    /// fully received.
    #[error("peer closed connection: expected {expected} bytes, received {received}")]
    PrematureClose {
        /// Bytes the frame's length prefix promised.
        expected: usize,
        /// Bytes actually received before EOF.
        received: usize,
    },
}

/// The union of the two process-fatal error kinds: a broken transport, or a
/// malformed frame. Per the connection state machine, both abort the owning
/// process outright; there is no retry.
#[derive(Error, Debug)]
pub enum FatalError {
    /// The connection itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame or response could not be decoded.
    #[error(transparent)]
    Protocol(#[from] rfo_proto::ProtocolError),
}

/// Logs `err` and terminates the process.
///
/// Both the client and server call this at the one place each owns a fatal
/// error: a connection is not salvageable, and the spec gives no retry
/// policy. `target` names the subsystem for the log line (`"client"` or
/// `"server"`).
pub fn abort_on_fatal(target: &str, err: &FatalError) -> ! {
    tracing::error!(target: "rfo", subsystem = target, error = %err, "fatal error, terminating");
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_displays_expected_and_received() {
        let err = TransportError::PrematureClose { expected: 16, received: 4 };
        assert!(err.to_string().contains("16"));
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn protocol_error_converts_into_fatal_error() {
        let proto_err = rfo_proto::ProtocolError::NonPositiveLength(0);
        let fatal: FatalError = proto_err.into();
        assert!(matches!(fatal, FatalError::Protocol(_)));
    }
}
