//! Fuzz target for the per-operation request/response decoders in `ops`.
//!
//! Feeds the same arbitrary byte string to every operation's `decode`, the
//! way the original `payload_decode` fuzzer tried one input against every
//! opcode's payload type. None of these may panic on malformed input; a
//! truncated or nonsensical buffer must come back as `Err`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rfo_proto::ops::{
    CloseRequest, CloseResponse, GetdirentriesRequest, GetdirentriesResponse, GetdirtreeRequest,
    LseekRequest, LseekResponse, OpenRequest, OpenResponse, ReadRequest, ReadResponse,
    StatRequest, StatResponse, UnlinkRequest, UnlinkResponse, WriteRequest, WriteResponse,
};

// A plausible `struct stat` size on a 64-bit Linux host; StatResponse::decode
// takes this as a caller-supplied parameter rather than encoding it, so the
// fuzz target picks a fixed stand-in.
const STAT_SIZE: usize = 144;

fuzz_target!(|data: &[u8]| {
    let _ = OpenRequest::decode(data);
    let _ = OpenResponse::decode(data);
    let _ = CloseRequest::decode(data);
    let _ = CloseResponse::decode(data);
    let _ = ReadRequest::decode(data);
    let _ = ReadResponse::decode(data);
    let _ = WriteRequest::decode(data);
    let _ = WriteResponse::decode(data);
    let _ = LseekRequest::decode(data);
    let _ = LseekResponse::decode(data);
    let _ = StatRequest::decode(data);
    let _ = StatResponse::decode(data, STAT_SIZE);
    let _ = UnlinkRequest::decode(data);
    let _ = UnlinkResponse::decode(data);
    let _ = GetdirentriesRequest::decode(data);
    let _ = GetdirentriesResponse::decode(data);
    let _ = GetdirtreeRequest::decode(data);
});
