//! Per-operation handlers.
//!
//! One function per opcode, each following `server.c`'s `do_*` shape
//! exactly: unpack an incoming descriptor if the operation takes one,
//! invoke the real syscall, capture `errno` in the same statement as the
//! call's return (nothing else may run in between), and marshal a
//! [`Response`] carrying that `errno` and the operation's return payload.

use std::ffi::CString;

use rfo_core::fd::{pack_fd, unpack_fd};
use rfo_proto::envelope::Response;
use rfo_proto::ops::{
    CloseRequest, CloseResponse, GetdirentriesRequest, GetdirentriesResponse, GetdirtreeRequest,
    LseekRequest, LseekResponse, OpenRequest, OpenResponse, ReadRequest, ReadResponse,
    StatRequest, StatResponse, UnlinkRequest, UnlinkResponse, WriteRequest, WriteResponse,
};

use crate::errno::last_errno;

fn path_to_cstring(path: &str) -> Result<CString, i32> {
    CString::new(path).map_err(|_| libc::EINVAL)
}

/// Handles `open(2)`.
///
/// `mode` is passed through unconditionally, matching the original: `open`
/// itself ignores a creation mode when `O_CREAT` is absent, so carrying the
/// field unconditionally is harmless.
#[must_use]
pub fn do_open(req: OpenRequest) -> Response {
    let path_c = match path_to_cstring(&req.path) {
        Ok(c) => c,
        Err(err_no) => return Response::new(err_no, OpenResponse { fd: -1 }.encode()),
    };
    // SAFETY: `path_c` is nul-terminated and lives for the duration of the call.
    let (fd, err_no) = unsafe {
        let fd = libc::open(path_c.as_ptr(), req.flags as libc::c_int, libc::mode_t::from(req.mode));
        (fd, last_errno())
    };
    Response::new(err_no, OpenResponse { fd: pack_fd(fd) }.encode())
}

/// Handles `close(2)`.
#[must_use]
pub fn do_close(req: CloseRequest) -> Response {
    let fd = unpack_fd(req.fd);
    // SAFETY: `fd` is either a descriptor this process opened via `do_open`
    // or one the client already validated against its watermark.
    let (rc, err_no) = unsafe {
        let rc = libc::close(fd);
        (rc, last_errno())
    };
    Response::new(err_no, CloseResponse { rc }.encode())
}

/// Handles `read(2)`.
///
/// The response buffer is sized from `req.count`, not a fixed constant, so
/// large reads are never truncated by an arbitrary buffer cap.
#[must_use]
pub fn do_read(req: ReadRequest) -> Response {
    let fd = unpack_fd(req.fd);
    let mut buf = vec![0u8; req.count];
    // SAFETY: `buf` is valid for `req.count` bytes; `read` never writes more.
    let (n, err_no) = unsafe {
        let n = libc::read(fd, buf.as_mut_ptr().cast(), req.count);
        (n, last_errno())
    };
    let bytes = if n > 0 { buf[..n as usize].to_vec() } else { Vec::new() };
    Response::new(err_no, ReadResponse { n: n as isize, bytes }.encode())
}

/// Handles `write(2)`.
///
/// The request buffer is sized from the caller's byte count (see
/// `rfo-proto`'s `WriteRequest`), which is what lets a single write exceed
/// a few kilobytes without a fixed-size wire buffer overflowing.
#[must_use]
pub fn do_write(req: WriteRequest) -> Response {
    let fd = unpack_fd(req.fd);
    // SAFETY: `req.bytes` is valid for its own length.
    let (n, err_no) = unsafe {
        let n = libc::write(fd, req.bytes.as_ptr().cast(), req.bytes.len());
        (n, last_errno())
    };
    Response::new(err_no, WriteResponse { n: n as isize }.encode())
}

/// Handles `lseek(2)`.
#[must_use]
pub fn do_lseek(req: LseekRequest) -> Response {
    let fd = unpack_fd(req.fd);
    // SAFETY: no pointers involved; `lseek` cannot fault here.
    let (pos, err_no) = unsafe {
        let pos = libc::lseek(fd, req.offset, req.whence);
        (pos, last_errno())
    };
    Response::new(err_no, LseekResponse { pos }.encode())
}

/// Handles the versioned `stat(2)` request.
///
/// Calls `libc::stat` rather than the internal `__xstat` the client
/// intercepts: on a modern glibc the two dispatch the same syscall, and
/// `__xstat` is not a symbol the `libc` crate exposes a binding for. `ver`
/// is carried on the wire for client-side ABI compatibility but otherwise
/// unused server-side.
#[must_use]
pub fn do_stat(req: StatRequest) -> Response {
    let path_c = match path_to_cstring(&req.path) {
        Ok(c) => c,
        Err(err_no) => return Response::new(err_no, StatResponse { rc: -1, raw_stat: Vec::new() }.encode()),
    };
    let mut stat_buf: libc::stat = unsafe { std::mem::zeroed() };
    // SAFETY: `path_c` is nul-terminated; `stat_buf` is a valid out-param.
    let (rc, err_no) = unsafe {
        let rc = libc::stat(path_c.as_ptr(), &raw mut stat_buf);
        (rc, last_errno())
    };
    let raw_stat = if rc >= 0 {
        // SAFETY: `stat_buf` is POD and fully initialized by a successful `stat(2)`.
        unsafe {
            std::slice::from_raw_parts((&raw const stat_buf).cast::<u8>(), size_of::<libc::stat>()).to_vec()
        }
    } else {
        Vec::new()
    };
    Response::new(err_no, StatResponse { rc, raw_stat }.encode())
}

/// Handles `unlink(2)`.
#[must_use]
pub fn do_unlink(req: UnlinkRequest) -> Response {
    let path_c = match path_to_cstring(&req.path) {
        Ok(c) => c,
        Err(err_no) => return Response::new(err_no, UnlinkResponse { rc: -1 }.encode()),
    };
    // SAFETY: `path_c` is nul-terminated.
    let (rc, err_no) = unsafe {
        let rc = libc::unlink(path_c.as_ptr());
        (rc, last_errno())
    };
    Response::new(err_no, UnlinkResponse { rc }.encode())
}

/// Handles `getdirentries(2)`.
#[must_use]
pub fn do_getdirentries(req: GetdirentriesRequest) -> Response {
    let fd = unpack_fd(req.fd);
    let mut buf = vec![0u8; req.nbytes];
    let mut basep: libc::off_t = req.basep;
    // SAFETY: `buf` is valid for `req.nbytes` bytes; `basep` is a valid out-param.
    let (n, err_no) = unsafe {
        let n = libc::getdirentries(fd, buf.as_mut_ptr().cast(), req.nbytes, &raw mut basep);
        (n, last_errno())
    };
    let bytes = if n > 0 { buf[..n as usize].to_vec() } else { Vec::new() };
    Response::new(err_no, GetdirentriesResponse { n: n as isize, new_basep: basep, bytes }.encode())
}

/// Handles `getdirtree`: walks the real file system rooted at the request
/// path and serializes the resulting subdirectory tree.
///
/// A zero-length `data` payload signals failure to the client, which then
/// restores `err_no` -- see the `getdirtree` anomaly noted in `rfo-client`.
#[must_use]
pub fn do_getdirtree(req: GetdirtreeRequest) -> Response {
    match crate::dirtree::walk(&req.path) {
        Ok(tree) => Response::new(0, tree.encode()),
        Err(err) => Response::new(err.raw_os_error().unwrap_or(libc::EIO), Vec::new()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn open_nonexistent_path_fails_with_enoent() {
        let req = OpenRequest { flags: libc::O_RDONLY as u32, mode: 0, path: "/no/such/rfo-test-path".to_string() };
        let resp = do_open(req);
        let decoded = OpenResponse::decode(&resp.data).unwrap();
        assert_eq!(decoded.fd, -1);
        assert_eq!(resp.err_no, libc::ENOENT);
    }

    #[test]
    fn open_write_read_close_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.txt");
        let path_str = path.to_string_lossy().into_owned();

        let open_req = OpenRequest {
            flags: (libc::O_CREAT | libc::O_WRONLY | libc::O_TRUNC) as u32,
            mode: 0o644,
            path: path_str.clone(),
        };
        let open_resp = do_open(open_req);
        let fd = OpenResponse::decode(&open_resp.data).unwrap().fd;
        assert!(fd >= rfo_core::fd::FD_OFFSET);

        let write_resp = do_write(WriteRequest { fd, bytes: b"hello".to_vec() });
        assert_eq!(WriteResponse::decode(&write_resp.data).unwrap().n, 5);

        let close_resp = do_close(CloseRequest { fd });
        assert_eq!(CloseResponse::decode(&close_resp.data).unwrap().rc, 0);

        let mut contents = String::new();
        std::fs::File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "hello");
    }

    #[test]
    fn unlink_missing_path_fails_with_enoent() {
        let resp = do_unlink(UnlinkRequest { path: "/no/such/rfo-test-path".to_string() });
        let decoded = UnlinkResponse::decode(&resp.data).unwrap();
        assert_eq!(decoded.rc, -1);
        assert_eq!(resp.err_no, libc::ENOENT);
    }

    #[test]
    fn stat_existing_path_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path_str = dir.path().to_string_lossy().into_owned();
        let resp = do_stat(StatRequest { ver: 1, path: path_str });
        let decoded = StatResponse::decode(&resp.data, size_of::<libc::stat>()).unwrap();
        assert_eq!(decoded.rc, 0);
        assert_eq!(decoded.raw_stat.len(), size_of::<libc::stat>());
    }

    #[test]
    fn lseek_on_bad_fd_reports_ebadf() {
        let resp = do_lseek(LseekRequest { fd: rfo_core::fd::pack_fd(999), offset: 0, whence: libc::SEEK_SET });
        let decoded = LseekResponse::decode(&resp.data).unwrap();
        assert_eq!(decoded.pos, -1);
        assert_eq!(resp.err_no, libc::EBADF);
    }
}
