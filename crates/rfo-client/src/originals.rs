//! Resolves the real libc `close`/`read`/`write` behind whatever this
//! library is `LD_PRELOAD`ed over, via `dlsym(RTLD_NEXT, ...)`.
//!
//! Resolved lazily on first use rather than from a process constructor: the
//! spec allows establishing client state "on first intercepted call (or at
//! process init)", and lazy resolution needs no extra constructor-registration
//! crate beyond what is already pulled in for the rest of this library.

use std::ffi::c_void;
use std::sync::OnceLock;

type CloseFn = unsafe extern "C" fn(libc::c_int) -> libc::c_int;
type ReadFn = unsafe extern "C" fn(libc::c_int, *mut c_void, libc::size_t) -> libc::ssize_t;
type WriteFn = unsafe extern "C" fn(libc::c_int, *const c_void, libc::size_t) -> libc::ssize_t;

struct Originals {
    close: CloseFn,
    read: ReadFn,
    write: WriteFn,
}

// SAFETY: the resolved function pointers refer to immutable code in libc;
// sharing them across threads is sound.
unsafe impl Sync for Originals {}

static ORIGINALS: OnceLock<Originals> = OnceLock::new();

/// # Safety
/// Calls into the real `close(2)` resolved via `dlsym`; `fd` must be a
/// descriptor this process actually owns.
pub unsafe fn orig_close(fd: libc::c_int) -> libc::c_int {
    (originals().close)(fd)
}

/// # Safety
/// Calls into the real `read(2)` resolved via `dlsym`; `buf` must be valid
/// for `count` bytes.
pub unsafe fn orig_read(fd: libc::c_int, buf: *mut c_void, count: libc::size_t) -> libc::ssize_t {
    (originals().read)(fd, buf, count)
}

/// # Safety
/// Calls into the real `write(2)` resolved via `dlsym`; `buf` must be valid
/// for `count` bytes.
pub unsafe fn orig_write(fd: libc::c_int, buf: *const c_void, count: libc::size_t) -> libc::ssize_t {
    (originals().write)(fd, buf, count)
}

fn originals() -> &'static Originals {
    ORIGINALS.get_or_init(|| {
        // SAFETY: each name is a nul-terminated static byte string, and the
        // resulting pointer (once checked non-null) is transmuted to a
        // function pointer of the matching libc signature.
        unsafe {
            let close_ptr = dlsym_next(b"close\0");
            let read_ptr = dlsym_next(b"read\0");
            let write_ptr = dlsym_next(b"write\0");
            if close_ptr.is_null() || read_ptr.is_null() || write_ptr.is_null() {
                tracing::error!(target: "rfo", "dlsym(RTLD_NEXT) could not resolve original libc symbols");
                std::process::exit(1);
            }
            Originals {
                close: std::mem::transmute::<*mut c_void, CloseFn>(close_ptr),
                read: std::mem::transmute::<*mut c_void, ReadFn>(read_ptr),
                write: std::mem::transmute::<*mut c_void, WriteFn>(write_ptr),
            }
        }
    })
}

unsafe fn dlsym_next(name: &[u8]) -> *mut c_void {
    libc::dlsym(libc::RTLD_NEXT, name.as_ptr().cast())
}
