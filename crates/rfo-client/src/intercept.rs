//! The intercepted libc entry points.
//!
//! Every function here replaces (via `LD_PRELOAD`) the named libc or
//! course-specific symbol. Each follows the same shape from §4.5: for
//! fd-taking operations, route to the real local syscall if the descriptor
//! is below the watermark; otherwise marshal, call the server, unmarshal,
//! and restore `errno` on failure.

use std::ffi::{c_char, c_void, CStr};
use std::os::raw::{c_int, c_uint};

use rfo_core::error::FatalError;
use rfo_proto::envelope::Frame;
use rfo_proto::opcode::Opcode;
use rfo_proto::ops::{
    CloseRequest, CloseResponse, GetdirentriesRequest, GetdirentriesResponse, GetdirtreeRequest,
    LseekRequest, LseekResponse, OpenRequest, OpenResponse, ReadRequest, ReadResponse,
    StatRequest, StatResponse, UnlinkRequest, UnlinkResponse, WriteRequest, WriteResponse,
};

use crate::dirtree_abi::{self, CDirTreeNode};
use crate::errno::{set_errno, EBADF};
use crate::originals::{orig_close, orig_read, orig_write};
use crate::session::session;

fn path_from_ptr(path: *const c_char) -> String {
    // SAFETY: callers of every intercepted function pass a nul-terminated
    // C string, per the libc contract for the function being replaced.
    unsafe { CStr::from_ptr(path) }.to_string_lossy().into_owned()
}

fn send_or_abort(frame: Frame) -> rfo_proto::envelope::Response {
    let mut guard = match session().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    match guard.send_request(&frame) {
        Ok(resp) => resp,
        Err(err) => rfo_core::error::abort_on_fatal("client", &err),
    }
}

/// Replaces `open(2)`.
///
/// `mode` is read unconditionally but is only meaningful -- and only
/// guaranteed to have been supplied by the caller -- when `O_CREAT` is set
/// in `flags`, matching the `va_arg` contract a true variadic `open` obeys.
/// A 64-bit System V callee reads a fixed third integer argument from the
/// same register a variadic caller would have placed it in, so this is
/// ABI-compatible with both two- and three-argument call sites.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn open(path: *const c_char, flags: c_int, mode: c_uint) -> c_int {
    let pathname = path_from_ptr(path);
    tracing::debug!(target: "rfo", %pathname, flags, "open");

    let req = OpenRequest { flags: flags as u32, mode: mode as u16, path: pathname };
    let resp = send_or_abort(Frame::new(Opcode::Open, req.encode()));
    let decoded = match OpenResponse::decode(&resp.data) {
        Ok(d) => d,
        Err(err) => rfo_core::error::abort_on_fatal("client", &FatalError::Protocol(err)),
    };

    if decoded.fd >= 0 {
        let mut guard = match session().lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.note_open_success(decoded.fd);
    } else {
        set_errno(resp.err_no);
    }
    decoded.fd
}

/// Replaces `close(2)`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn close(fd: c_int) -> c_int {
    let local = { session().lock().map(|g| g.is_local(fd)).unwrap_or(true) };
    if local {
        return orig_close(fd);
    }

    let req = CloseRequest { fd };
    let resp = send_or_abort(Frame::new(Opcode::Close, req.encode()));
    let decoded = match CloseResponse::decode(&resp.data) {
        Ok(d) => d,
        Err(err) => rfo_core::error::abort_on_fatal("client", &FatalError::Protocol(err)),
    };

    if decoded.rc == 0 {
        let mut guard = match session().lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.note_close_success();
    } else {
        set_errno(resp.err_no);
    }
    decoded.rc
}

/// Replaces `read(2)`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn read(fd: c_int, buf: *mut c_void, count: libc::size_t) -> libc::ssize_t {
    let local = { session().lock().map(|g| g.is_local(fd)).unwrap_or(true) };
    if local {
        return orig_read(fd, buf, count);
    }

    let req = ReadRequest { fd, count };
    let resp = send_or_abort(Frame::new(Opcode::Read, req.encode()));
    let decoded = match ReadResponse::decode(&resp.data) {
        Ok(d) => d,
        Err(err) => rfo_core::error::abort_on_fatal("client", &FatalError::Protocol(err)),
    };

    if decoded.n > 0 {
        // SAFETY: caller guaranteed `buf` valid for `count` bytes; the
        // server never returns more than `count` bytes read.
        std::ptr::copy_nonoverlapping(decoded.bytes.as_ptr(), buf.cast::<u8>(), decoded.bytes.len());
    } else if decoded.n < 0 {
        set_errno(resp.err_no);
    }
    decoded.n as libc::ssize_t
}

/// Replaces `write(2)`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn write(fd: c_int, buf: *const c_void, count: libc::size_t) -> libc::ssize_t {
    let local = { session().lock().map(|g| g.is_local(fd)).unwrap_or(true) };
    if local {
        return orig_write(fd, buf, count);
    }

    // SAFETY: caller guaranteed `buf` valid for `count` bytes.
    let bytes = std::slice::from_raw_parts(buf.cast::<u8>(), count).to_vec();
    let req = WriteRequest { fd, bytes };
    let resp = send_or_abort(Frame::new(Opcode::Write, req.encode()));
    let decoded = match WriteResponse::decode(&resp.data) {
        Ok(d) => d,
        Err(err) => rfo_core::error::abort_on_fatal("client", &FatalError::Protocol(err)),
    };

    if decoded.n < 0 {
        set_errno(resp.err_no);
    }
    decoded.n as libc::ssize_t
}

/// Replaces `lseek(2)`.
///
/// Short-circuits with `EBADF` and no network I/O when no remote
/// descriptor is currently open, per §4.5 step 5 -- this does not check
/// `fd` against the watermark the way `close`/`read`/`write` do.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lseek(fd: c_int, offset: libc::off_t, whence: c_int) -> libc::off_t {
    let has_remote = { session().lock().map(|g| g.has_remote_open()).unwrap_or(false) };
    if !has_remote {
        set_errno(EBADF);
        return -1;
    }

    let req = LseekRequest { fd, offset, whence };
    let resp = send_or_abort(Frame::new(Opcode::Lseek, req.encode()));
    let decoded = match LseekResponse::decode(&resp.data) {
        Ok(d) => d,
        Err(err) => rfo_core::error::abort_on_fatal("client", &FatalError::Protocol(err)),
    };
    if decoded.pos < 0 {
        set_errno(resp.err_no);
    }
    decoded.pos
}

/// Replaces the versioned `stat(2)` entry point (`__xstat`).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __xstat(ver: c_int, path: *const c_char, stat_buf: *mut libc::stat) -> c_int {
    let pathname = path_from_ptr(path);
    let req = StatRequest { ver, path: pathname };
    let resp = send_or_abort(Frame::new(Opcode::Stat, req.encode()));
    let decoded = match StatResponse::decode(&resp.data, size_of::<libc::stat>()) {
        Ok(d) => d,
        Err(err) => rfo_core::error::abort_on_fatal("client", &FatalError::Protocol(err)),
    };

    if decoded.rc >= 0 {
        // SAFETY: caller guaranteed `stat_buf` points at a writable
        // `struct stat`; `raw_stat` is exactly `size_of::<libc::stat>()`
        // bytes, captured host-native from the server's own `struct stat`.
        std::ptr::copy_nonoverlapping(decoded.raw_stat.as_ptr(), stat_buf.cast::<u8>(), decoded.raw_stat.len());
    } else {
        set_errno(resp.err_no);
    }
    decoded.rc
}

/// Replaces `unlink(2)`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn unlink(pathname: *const c_char) -> c_int {
    let path = path_from_ptr(pathname);
    let req = UnlinkRequest { path };
    let resp = send_or_abort(Frame::new(Opcode::Unlink, req.encode()));
    let decoded = match UnlinkResponse::decode(&resp.data) {
        Ok(d) => d,
        Err(err) => rfo_core::error::abort_on_fatal("client", &FatalError::Protocol(err)),
    };
    if decoded.rc < 0 {
        set_errno(resp.err_no);
    }
    decoded.rc
}

/// Replaces `getdirentries(2)`.
///
/// Short-circuits with `EBADF` and no network I/O when no remote
/// descriptor is currently open, exactly like `lseek`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn getdirentries(
    fd: c_int,
    buf: *mut c_char,
    nbytes: libc::size_t,
    basep: *mut libc::off_t,
) -> libc::ssize_t {
    let has_remote = { session().lock().map(|g| g.has_remote_open()).unwrap_or(false) };
    if !has_remote {
        set_errno(EBADF);
        return -1;
    }

    let req = GetdirentriesRequest { fd, basep: *basep, nbytes };
    let resp = send_or_abort(Frame::new(Opcode::Getdirentries, req.encode()));
    let decoded = match GetdirentriesResponse::decode(&resp.data) {
        Ok(d) => d,
        Err(err) => rfo_core::error::abort_on_fatal("client", &FatalError::Protocol(err)),
    };

    *basep = decoded.new_basep;
    if decoded.n > 0 {
        // SAFETY: caller guaranteed `buf` valid for `nbytes` bytes; the
        // server never returns more than that many bytes.
        std::ptr::copy_nonoverlapping(decoded.bytes.as_ptr(), buf.cast::<u8>(), decoded.bytes.len());
    } else if decoded.n < 0 {
        set_errno(resp.err_no);
    }
    decoded.n as libc::ssize_t
}

/// Replaces the course-specific `getdirtree` entry point.
///
/// On a zero-size response the server signals failure, but this still
/// returns a freshly allocated empty node rather than null -- a documented
/// anomaly (see the design notes) preserved rather than silently patched,
/// since callers written against the original never expect a null result.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn getdirtree(path: *const c_char) -> *mut CDirTreeNode {
    let pathname = path_from_ptr(path);
    let req = GetdirtreeRequest { path: pathname };
    let resp = send_or_abort(Frame::new(Opcode::Getdirtree, req.encode()));

    if resp.data.is_empty() {
        set_errno(resp.err_no);
        return dirtree_abi::build_tree(&rfo_proto::DirTreeNode::new(""));
    }

    match rfo_proto::DirTreeNode::decode(&resp.data) {
        Ok(tree) => dirtree_abi::build_tree(&tree),
        Err(err) => rfo_core::error::abort_on_fatal("client", &FatalError::Protocol(err)),
    }
}

/// Replaces `freedirtree`: entirely local, no server round-trip.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn freedirtree(dt: *mut CDirTreeNode) {
    dirtree_abi::free_tree(dt);
}
