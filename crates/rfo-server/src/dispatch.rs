//! Opcode dispatch: decodes a frame's opcode-specific payload and calls the
//! matching handler.

use rfo_proto::envelope::{Frame, Response};
use rfo_proto::ops::{
    CloseRequest, GetdirentriesRequest, GetdirtreeRequest, LseekRequest, OpenRequest, ReadRequest,
    StatRequest, UnlinkRequest, WriteRequest,
};
use rfo_proto::{Opcode, ProtocolError};

use crate::handlers;

/// Decodes `frame`'s payload per its opcode and invokes the matching
/// handler, returning the response it produces.
///
/// # Errors
/// Returns a [`ProtocolError`] if the payload does not match the shape its
/// opcode promises; per the connection loop's error policy, that is fatal
/// to the connection.
pub fn dispatch(frame: &Frame) -> Result<Response, ProtocolError> {
    let response = match frame.opcode {
        Opcode::Open => handlers::do_open(OpenRequest::decode(&frame.payload)?),
        Opcode::Close => handlers::do_close(CloseRequest::decode(&frame.payload)?),
        Opcode::Read => handlers::do_read(ReadRequest::decode(&frame.payload)?),
        Opcode::Write => handlers::do_write(WriteRequest::decode(&frame.payload)?),
        Opcode::Lseek => handlers::do_lseek(LseekRequest::decode(&frame.payload)?),
        Opcode::Stat => handlers::do_stat(StatRequest::decode(&frame.payload)?),
        Opcode::Unlink => handlers::do_unlink(UnlinkRequest::decode(&frame.payload)?),
        Opcode::Getdirentries => {
            handlers::do_getdirentries(GetdirentriesRequest::decode(&frame.payload)?)
        },
        Opcode::Getdirtree => handlers::do_getdirtree(GetdirtreeRequest::decode(&frame.payload)?),
    };
    Ok(response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rfo_proto::ops::UnlinkRequest;

    use super::*;

    #[test]
    fn dispatches_unlink_on_missing_path() {
        let req = UnlinkRequest { path: "/no/such/rfo-test-path".to_string() };
        let frame = Frame::new(Opcode::Unlink, req.encode());
        let resp = dispatch(&frame).unwrap();
        assert_eq!(resp.err_no, libc::ENOENT);
    }

    #[test]
    fn malformed_payload_is_a_protocol_error() {
        let frame = Frame::new(Opcode::Open, vec![0u8]);
        assert!(dispatch(&frame).is_err());
    }
}
