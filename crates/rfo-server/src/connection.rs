//! Per-connection request loop.

use std::net::TcpStream;

use rfo_core::error::{abort_on_fatal, FatalError};
use rfo_core::transport;
use rfo_proto::envelope::Frame;

use crate::dispatch;

/// Serves one client connection until it closes cleanly or a fatal error
/// occurs.
///
/// Repeatedly reads a frame, dispatches it, and writes the response back.
/// A clean peer close at a frame boundary ends the loop normally; any
/// transport or protocol error aborts the process, matching the fatal
/// error policy the client also follows.
pub fn serve(mut stream: TcpStream) {
    loop {
        let raw = match transport::recv_frame_or_eof(&mut stream) {
            Ok(None) => {
                tracing::info!(target: "rfo", "peer closed connection");
                return;
            },
            Ok(Some(raw)) => raw,
            Err(err) => abort_on_fatal("server", &err),
        };

        let decoded = Frame::decode(&raw)
            .map_err(FatalError::from)
            .and_then(|frame| dispatch::dispatch(&frame).map_err(FatalError::from));
        let response = match decoded {
            Ok(response) => response,
            Err(err) => abort_on_fatal("server", &err),
        };

        if let Err(err) = transport::send_all(&mut stream, &response.encode()) {
            abort_on_fatal("server", &FatalError::from(err));
        }
    }
}
