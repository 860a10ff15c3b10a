//! Byte-stream framing: `send_all`/`recv_frame`.
//!
//! Both client and server speak this framing over their TCP connection: a
//! 4-byte host-native length prefix followed by exactly that many bytes.
//! What those bytes contain (an RPC [`rfo_proto::Frame`] or
//! [`rfo_proto::Response`]) is the caller's concern, not this module's.
//!
//! Generic over [`Read`]/[`Write`] rather than tied to [`std::net::TcpStream`]
//! so the framing logic can be exercised against in-memory buffers in tests.

use std::io::{self, Read, Write};

use crate::error::{FatalError, TransportError};

/// Writes `bytes` as one length-prefixed frame.
///
/// `Write::write_all` already loops internally on short writes, which is
/// the looping behavior the framing contract requires; there is no need to
/// stage the payload through a fixed-size intermediate buffer.
///
/// # Errors
/// Returns [`TransportError::Io`] if the underlying write fails.
pub fn send_all<W: Write>(stream: &mut W, bytes: &[u8]) -> Result<(), TransportError> {
    let len = i32::try_from(bytes.len()).unwrap_or(i32::MAX);
    stream.write_all(&len.to_ne_bytes())?;
    stream.write_all(bytes)?;
    Ok(())
}

/// Reads one length-prefixed frame and returns its payload.
///
/// # Errors
/// Returns [`FatalError::Protocol`] if the length prefix is non-positive,
/// and [`FatalError::Transport`] if the connection closes before the
/// declared length has been fully received, or on any other I/O error.
pub fn recv_frame<R: Read>(stream: &mut R) -> Result<Vec<u8>, FatalError> {
    let mut len_buf = [0u8; 4];
    read_exact_or_close(stream, &mut len_buf, 4)?;
    let len = i32::from_ne_bytes(len_buf);
    if len <= 0 {
        return Err(FatalError::Protocol(rfo_proto::ProtocolError::NonPositiveLength(i64::from(len))));
    }
    let mut data = vec![0u8; len as usize];
    read_exact_or_close(stream, &mut data, data.len())?;
    Ok(data)
}

/// Reads one length-prefixed frame, or reports a clean peer close.
///
/// Unlike [`recv_frame`], a connection closing with zero bytes transferred
/// while this call is waiting for the *start* of a new frame is not an
/// error: it returns `Ok(None)`. This is the server's per-connection loop
/// primitive (see `rfo-server`'s `connection` module) — a client calling
/// [`Session::send_request`](https://docs.rs/rfo-client) always expects a
/// response and should keep using [`recv_frame`], for which even a
/// zero-byte close is a [`FatalError`]. A close after some, but not all,
/// of the length prefix (or any of the payload) has arrived is still fatal
/// here too: only a close at the very first byte is "clean".
///
/// # Errors
/// Returns [`FatalError::Protocol`] if the length prefix is non-positive,
/// and [`FatalError::Transport`] on any I/O error or a close that lands
/// mid-frame.
pub fn recv_frame_or_eof<R: Read>(stream: &mut R) -> Result<Option<Vec<u8>>, FatalError> {
    let mut len_buf = [0u8; 4];
    let mut filled = 0usize;
    while filled < len_buf.len() {
        let n = stream.read(&mut len_buf[filled..]).map_err(TransportError::Io)?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(TransportError::PrematureClose { expected: len_buf.len(), received: filled }.into());
        }
        filled += n;
    }
    let len = i32::from_ne_bytes(len_buf);
    if len <= 0 {
        return Err(FatalError::Protocol(rfo_proto::ProtocolError::NonPositiveLength(i64::from(len))));
    }
    let mut data = vec![0u8; len as usize];
    read_exact_or_close(stream, &mut data, data.len())?;
    Ok(Some(data))
}

fn read_exact_or_close<R: Read>(stream: &mut R, buf: &mut [u8], expected: usize) -> Result<(), TransportError> {
    match stream.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            Err(TransportError::PrematureClose { expected, received: 0 })
        },
        Err(e) => Err(TransportError::Io(e)),
    }
}
