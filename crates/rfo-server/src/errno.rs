//! Reads the calling thread's `errno`.
//!
//! Every handler in [`crate::handlers`] calls this in the same statement as
//! the real syscall's return, mirroring `server.c`'s `resp->err_no = errno;`
//! immediately after each `do_*` call -- nothing must run in between that
//! could clobber the value.

/// Reads the current value of `errno`.
///
/// # Safety
/// Dereferences the pointer `libc::__errno_location` returns, which is
/// always valid for the lifetime of the calling thread per glibc's ABI.
pub unsafe fn last_errno() -> i32 {
    *libc::__errno_location()
}
