//! `errno` restoration.
//!
//! The intercepted functions must be indistinguishable from the real libc
//! entry points: on failure, `errno` has to carry whatever value the
//! *server's* syscall captured, not anything of our own making.

/// Sets the calling thread's `errno` to `value`.
///
/// # Safety
/// Dereferences the pointer `libc::__errno_location` returns, which is
/// always valid for the lifetime of the calling thread per glibc's ABI.
pub unsafe fn set_errno(value: i32) {
    *libc::__errno_location() = value;
}

/// `EBADF`, used by the `lseek`/`getdirentries` local-preflight
/// short-circuit when no remote descriptor is open.
pub const EBADF: i32 = libc::EBADF;
