//! Per-process client session state.
//!
//! One [`Session`] lives for the life of the process, behind a global mutex
//! (see [`session`]): the cached connection, the remote-descriptor
//! watermark, and the count of currently-open remote descriptors. The
//! single mutex around the whole record is what the spec's concurrency
//! section asks for — a multithreaded caller serializes on it; a
//! single-threaded one pays an uncontended lock.

use std::net::TcpStream;
use std::sync::{Mutex, OnceLock};

use rfo_core::error::FatalError;
use rfo_core::{transport, RemoteConfig};
use rfo_proto::envelope::{Frame, Response};

/// Client-side connection/descriptor bookkeeping.
pub struct Session {
    conn: Option<TcpStream>,
    /// Remote descriptors are always `< min_fd`'s complement: any fd below
    /// this watermark is local, anything at or above it is remote. Starts
    /// at `i32::MAX` so that, before any remote open, every descriptor
    /// routes locally.
    min_fd: i32,
    opened_fd: u32,
    config: RemoteConfig,
}

impl Session {
    fn new() -> Self {
        Self { conn: None, min_fd: i32::MAX, opened_fd: 0, config: RemoteConfig::from_env() }
    }

    /// Whether `fd` should be routed to the real local syscall rather than
    /// the server.
    #[must_use]
    pub fn is_local(&self, fd: i32) -> bool {
        fd < self.min_fd
    }

    /// Whether at least one remote descriptor is currently open.
    #[must_use]
    pub fn has_remote_open(&self) -> bool {
        self.opened_fd > 0
    }

    /// Records a successful remote `open`: lowers the watermark and
    /// increments the open count.
    pub fn note_open_success(&mut self, fd: i32) {
        self.min_fd = self.min_fd.min(fd);
        self.opened_fd += 1;
        tracing::debug!(target: "rfo", fd, min_fd = self.min_fd, opened_fd = self.opened_fd, "remote open");
    }

    /// Records a successful remote `close`: decrements the open count and,
    /// if it reaches zero, drops the cached connection so the next call
    /// reconnects lazily.
    pub fn note_close_success(&mut self) {
        self.opened_fd = self.opened_fd.saturating_sub(1);
        tracing::debug!(target: "rfo", opened_fd = self.opened_fd, "remote close");
        if self.opened_fd == 0 {
            self.conn = None;
        }
    }

    fn ensure_connected(&mut self) -> Result<&mut TcpStream, FatalError> {
        if self.conn.is_none() {
            let addr = format!("{}:{}", self.config.host, self.config.port);
            tracing::debug!(target: "rfo", %addr, "connecting to remote file server");
            let stream = TcpStream::connect(&addr).map_err(rfo_core::TransportError::Io)?;
            self.conn = Some(stream);
        }
        self.conn.as_mut().ok_or_else(|| {
            rfo_core::TransportError::Io(std::io::Error::other("connection unexpectedly absent")).into()
        })
    }

    /// Sends `frame` and returns the decoded response, reconnecting first if
    /// the cached connection was closed.
    pub fn send_request(&mut self, frame: &Frame) -> Result<Response, FatalError> {
        let stream = self.ensure_connected()?;
        transport::send_all(stream, &frame.encode())?;
        let raw = transport::recv_frame(stream)?;
        Response::decode(&raw).map_err(FatalError::from)
    }
}

/// The single process-wide session, behind a mutex per the concurrency
/// model's serialization requirement.
pub fn session() -> &'static Mutex<Session> {
    static SESSION: OnceLock<Mutex<Session>> = OnceLock::new();
    SESSION.get_or_init(|| Mutex::new(Session::new()))
}
