//! The RPC envelope: the opcode-tagged request frame and its response.
//!
//! These are the structures `send_all`/`recv_frame` carry as payloads (see
//! the `transport` module in `rfo-core`, which owns the outer byte-stream
//! length prefix). Encoding here never touches a socket.

use crate::codec::{read_bytes, read_i32, read_u32, write_bytes, write_i32, write_u32};
use crate::errors::{ProtocolError, Result};
use crate::opcode::Opcode;

/// A request: an opcode plus its already-marshalled operation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Which operation this request invokes.
    pub opcode: Opcode,
    /// The operation's marshalled argument payload (see `ops`).
    pub payload: Vec<u8>,
}

impl Frame {
    /// Builds a frame from an opcode and a pre-marshalled payload.
    #[must_use]
    pub fn new(opcode: Opcode, payload: Vec<u8>) -> Self {
        Self { opcode, payload }
    }

    /// Encodes as `[opcode u32][payload_size u32][payload bytes]`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + self.payload.len());
        let off = write_u32(&mut buf, 0, self.opcode.to_u32());
        let payload_size = u32::try_from(self.payload.len()).unwrap_or(u32::MAX);
        let off = write_u32(&mut buf, off, payload_size);
        write_bytes(&mut buf, off, &self.payload);
        buf
    }

    /// Decodes a frame previously produced by [`Frame::encode`].
    ///
    /// # Errors
    /// Returns [`ProtocolError::NonPositiveLength`] if `payload_size` is
    /// zero, and [`ProtocolError::UnknownOpcode`] for an unrecognized
    /// opcode.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (opcode_raw, off) = read_u32(data, 0)?;
        let opcode = Opcode::from_u32(opcode_raw).ok_or(ProtocolError::UnknownOpcode(opcode_raw))?;
        let (payload_size, off) = read_u32(data, off)?;
        if payload_size == 0 {
            return Err(ProtocolError::NonPositiveLength(0));
        }
        let (payload, _) = read_bytes(data, off, payload_size as usize)?;
        Ok(Self { opcode, payload: payload.to_vec() })
    }
}

/// A response: the captured `errno`, a size, and an operation-defined
/// payload (the out-parameters, if any, of the invoked operation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// `errno` captured on the server immediately after the real syscall.
    pub err_no: i32,
    /// The response payload.
    pub data: Vec<u8>,
}

impl Response {
    /// Builds a response from a captured `errno` and payload.
    #[must_use]
    pub fn new(err_no: i32, data: Vec<u8>) -> Self {
        Self { err_no, data }
    }

    /// Encodes as `[err_no i32][size u32][data bytes]`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + self.data.len());
        let off = write_i32(&mut buf, 0, self.err_no);
        let size = u32::try_from(self.data.len()).unwrap_or(u32::MAX);
        let off = write_u32(&mut buf, off, size);
        write_bytes(&mut buf, off, &self.data);
        buf
    }

    /// Decodes a response previously produced by [`Response::encode`].
    ///
    /// Unlike [`Frame::decode`], a zero-length payload is valid: it is how
    /// `getdirtree` signals failure (see the `ops::getdirtree` module).
    ///
    /// # Errors
    /// Returns [`ProtocolError::Truncated`] if fewer bytes than `size`
    /// declares are present.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (err_no, off) = read_i32(data, 0)?;
        let (size, off) = read_u32(data, off)?;
        let (payload, _) = read_bytes(data, off, size as usize)?;
        Ok(Self { err_no, data: payload.to_vec() })
    }
}
