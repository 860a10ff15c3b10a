//! Fuzz target for `Frame::decode`.
//!
//! Arbitrary bytes must never panic the decoder: a malformed opcode,
//! truncated length prefix, or truncated payload must all surface as an
//! `Err`, never a buffer over-read or an integer-overflow panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rfo_proto::Frame;

fuzz_target!(|data: &[u8]| {
    let _ = Frame::decode(data);
});
