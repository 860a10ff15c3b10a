//! Call-interposition library: replaces ten libc/course-specific file
//! operations with RPC stubs against the remote file server, transparently
//! to the linked program.
//!
//! Built as a `cdylib` so it can be loaded with `LD_PRELOAD`; the exported
//! symbols in [`intercept`] shadow the real libc entry points for any
//! process that preloads this library. State lives in [`session`] behind a
//! single process-wide mutex; [`originals`] resolves the real `close`/
//! `read`/`write` via `dlsym(RTLD_NEXT, ...)` for descriptors this process
//! opened itself rather than through the remote server.
//!
//! FFI is the entire point of this crate, so `unsafe_code` is allowed here
//! even though the workspace denies it by default.
#![allow(unsafe_code)]
#![deny(missing_docs)]

pub mod dirtree_abi;
pub mod errno;
pub mod intercept;
pub mod originals;
pub mod session;
