//! Fuzz target for `Response::decode`.
//!
//! Unlike `Frame::decode`, a zero-length payload is valid here (it's how
//! `getdirtree` signals failure), so this target exists separately to make
//! sure that distinction doesn't introduce its own edge-case panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rfo_proto::Response;

fuzz_target!(|data: &[u8]| {
    let _ = Response::decode(data);
});
