//! Per-operation request/response marshalling.
//!
//! One pair of types per intercepted operation, each with an `encode`/
//! `decode` pair. Field order within each payload matches the original
//! `call_*_marshal`/`call_*_unmarshal` functions exactly — several operations
//! (notably `getdirentries`, whose `basep` precedes `nbytes`) do not marshal
//! fields in call-signature order.

use crate::codec::{
    read_bytes, read_i32, read_i64, read_u16, read_u32, read_usize, write_bytes, write_i32,
    write_i64, write_u16, write_u32, write_usize,
};
use crate::errors::Result;

/// `open(2)` request: flags, mode (only meaningful when `O_CREAT` is set),
/// and the target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    /// Raw `open(2)` flags.
    pub flags: u32,
    /// Creation mode; carried even when `O_CREAT` is absent, matching the
    /// original's unconditional marshalling of the field.
    pub mode: u16,
    /// Path to open.
    pub path: String,
}

impl OpenRequest {
    /// Encodes as `flags u32, mode u16, pathlen u32, path[pathlen]`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let off = write_u32(&mut buf, 0, self.flags);
        let off = write_u16(&mut buf, off, self.mode);
        let path_len = self.path.len() + 1;
        let off = write_u32(&mut buf, off, u32::try_from(path_len).unwrap_or(u32::MAX));
        let off = write_bytes(&mut buf, off, self.path.as_bytes());
        write_bytes(&mut buf, off, &[0u8]);
        buf
    }

    /// Decodes an [`OpenRequest`].
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (flags, off) = read_u32(data, 0)?;
        let (mode, off) = read_u16(data, off)?;
        let (path_len, off) = read_u32(data, off)?;
        let (raw, _) = read_bytes(data, off, path_len as usize)?;
        let path = cstr_to_string(raw);
        Ok(Self { flags, mode, path })
    }
}

/// `open(2)` response: the already FD_OFFSET-translated descriptor (or a
/// negative value on failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenResponse {
    /// Result descriptor, translated by FD_OFFSET on success.
    pub fd: i32,
}

impl OpenResponse {
    /// Encodes the response.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        write_i32(&mut buf, 0, self.fd);
        buf
    }

    /// Decodes the response.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (fd, _) = read_i32(data, 0)?;
        Ok(Self { fd })
    }
}

/// `close(2)` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseRequest {
    /// Descriptor to close (already translated if remote).
    pub fd: i32,
}

impl CloseRequest {
    /// Encodes the request.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        write_i32(&mut buf, 0, self.fd);
        buf
    }

    /// Decodes the request.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (fd, _) = read_i32(data, 0)?;
        Ok(Self { fd })
    }
}

/// `close(2)` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseResponse {
    /// Return code (0 on success, -1 on failure).
    pub rc: i32,
}

impl CloseResponse {
    /// Encodes the response.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        write_i32(&mut buf, 0, self.rc);
        buf
    }

    /// Decodes the response.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (rc, _) = read_i32(data, 0)?;
        Ok(Self { rc })
    }
}

/// `read(2)` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    /// Descriptor to read from.
    pub fd: i32,
    /// Bytes requested.
    pub count: usize,
}

impl ReadRequest {
    /// Encodes as `fd i32, count usize`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let off = write_i32(&mut buf, 0, self.fd);
        write_usize(&mut buf, off, self.count);
        buf
    }

    /// Decodes the request.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (fd, off) = read_i32(data, 0)?;
        let (count, _) = read_usize(data, off)?;
        Ok(Self { fd, count })
    }
}

/// `read(2)` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    /// Bytes read, or a negative `errno` signal.
    pub n: isize,
    /// Data read, present only when `n > 0`.
    pub bytes: Vec<u8>,
}

impl ReadResponse {
    /// Encodes as `n isize; if n>0 then bytes[n]`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let off = write_i64(&mut buf, 0, self.n as i64);
        if self.n > 0 {
            write_bytes(&mut buf, off, &self.bytes);
        }
        buf
    }

    /// Decodes the response.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (n, off) = read_i64(data, 0)?;
        let n = n as isize;
        let bytes = if n > 0 { read_bytes(data, off, n as usize)?.0.to_vec() } else { Vec::new() };
        Ok(Self { n, bytes })
    }
}

/// `write(2)` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    /// Descriptor to write to.
    pub fd: i32,
    /// Bytes to write.
    pub bytes: Vec<u8>,
}

impl WriteRequest {
    /// Encodes as `fd i32, count usize, bytes[count]`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let off = write_i32(&mut buf, 0, self.fd);
        let off = write_usize(&mut buf, off, self.bytes.len());
        write_bytes(&mut buf, off, &self.bytes);
        buf
    }

    /// Decodes the request.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (fd, off) = read_i32(data, 0)?;
        let (count, off) = read_usize(data, off)?;
        let (bytes, _) = read_bytes(data, off, count)?;
        Ok(Self { fd, bytes: bytes.to_vec() })
    }
}

/// `write(2)` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResponse {
    /// Bytes written, or a negative `errno` signal.
    pub n: isize,
}

impl WriteResponse {
    /// Encodes the response.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        write_i64(&mut buf, 0, self.n as i64);
        buf
    }

    /// Decodes the response.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (n, _) = read_i64(data, 0)?;
        Ok(Self { n: n as isize })
    }
}

/// `lseek(2)` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LseekRequest {
    /// Descriptor to seek.
    pub fd: i32,
    /// Seek offset.
    pub offset: i64,
    /// `SEEK_SET`/`SEEK_CUR`/`SEEK_END`.
    pub whence: i32,
}

impl LseekRequest {
    /// Encodes as `fd i32, offset i64, whence i32`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let off = write_i32(&mut buf, 0, self.fd);
        let off = write_i64(&mut buf, off, self.offset);
        write_i32(&mut buf, off, self.whence);
        buf
    }

    /// Decodes the request.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (fd, off) = read_i32(data, 0)?;
        let (offset, off) = read_i64(data, off)?;
        let (whence, _) = read_i32(data, off)?;
        Ok(Self { fd, offset, whence })
    }
}

/// `lseek(2)` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LseekResponse {
    /// Resulting file position, or -1 on failure.
    pub pos: i64,
}

impl LseekResponse {
    /// Encodes the response.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        write_i64(&mut buf, 0, self.pos);
        buf
    }

    /// Decodes the response.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (pos, _) = read_i64(data, 0)?;
        Ok(Self { pos })
    }
}

/// Versioned `stat(2)` request (the `__xstat` form).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRequest {
    /// `glibc` stat-interface version tag.
    pub ver: i32,
    /// Path to stat.
    pub path: String,
}

impl StatRequest {
    /// Encodes as `ver i32, pathlen usize, path[pathlen]`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let off = write_i32(&mut buf, 0, self.ver);
        let path_len = self.path.len() + 1;
        let off = write_usize(&mut buf, off, path_len);
        let off = write_bytes(&mut buf, off, self.path.as_bytes());
        write_bytes(&mut buf, off, &[0u8]);
        buf
    }

    /// Decodes the request.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (ver, off) = read_i32(data, 0)?;
        let (path_len, off) = read_usize(data, off)?;
        let (raw, _) = read_bytes(data, off, path_len)?;
        Ok(Self { ver, path: cstr_to_string(raw) })
    }
}

/// `stat(2)` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatResponse {
    /// Return code (0 on success, -1 on failure).
    pub rc: i32,
    /// Raw `struct stat` bytes, present only when `rc >= 0`.
    ///
    /// Transmitted opaque and host-native, matching the original's direct
    /// `memcpy` of the platform struct: this protocol targets peers that
    /// share an architecture and therefore a `struct stat` layout.
    pub raw_stat: Vec<u8>,
}

impl StatResponse {
    /// Encodes as `rc i32; if rc>=0 then stat-struct`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let off = write_i32(&mut buf, 0, self.rc);
        if self.rc >= 0 {
            write_bytes(&mut buf, off, &self.raw_stat);
        }
        buf
    }

    /// Decodes the response. `stat_size` is the host's `size_of::<libc::stat>()`,
    /// supplied by the caller since it is not itself on the wire.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8], stat_size: usize) -> Result<Self> {
        let (rc, off) = read_i32(data, 0)?;
        let raw_stat = if rc >= 0 { read_bytes(data, off, stat_size)?.0.to_vec() } else { Vec::new() };
        Ok(Self { rc, raw_stat })
    }
}

/// `unlink(2)` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlinkRequest {
    /// Path to remove.
    pub path: String,
}

impl UnlinkRequest {
    /// Encodes as `pathlen u32, path[pathlen]`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let path_len = self.path.len() + 1;
        let off = write_u32(&mut buf, 0, u32::try_from(path_len).unwrap_or(u32::MAX));
        let off = write_bytes(&mut buf, off, self.path.as_bytes());
        write_bytes(&mut buf, off, &[0u8]);
        buf
    }

    /// Decodes the request.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (path_len, off) = read_u32(data, 0)?;
        let (raw, _) = read_bytes(data, off, path_len as usize)?;
        Ok(Self { path: cstr_to_string(raw) })
    }
}

/// `unlink(2)` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlinkResponse {
    /// Return code (0 on success, -1 on failure).
    pub rc: i32,
}

impl UnlinkResponse {
    /// Encodes the response.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        write_i32(&mut buf, 0, self.rc);
        buf
    }

    /// Decodes the response.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (rc, _) = read_i32(data, 0)?;
        Ok(Self { rc })
    }
}

/// `getdirentries(2)` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetdirentriesRequest {
    /// Descriptor of the open directory.
    pub fd: i32,
    /// Current seek cookie (`basep` in the manual page).
    pub basep: i64,
    /// Buffer capacity requested.
    pub nbytes: usize,
}

impl GetdirentriesRequest {
    /// Encodes as `fd i32, basep i64, nbytes usize` (note: `basep` precedes
    /// `nbytes`, matching `call_getdirentries_marshal`, not the signature
    /// order `(fd, buf, nbytes, basep)`).
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let off = write_i32(&mut buf, 0, self.fd);
        let off = write_i64(&mut buf, off, self.basep);
        write_usize(&mut buf, off, self.nbytes);
        buf
    }

    /// Decodes the request.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (fd, off) = read_i32(data, 0)?;
        let (basep, off) = read_i64(data, off)?;
        let (nbytes, _) = read_usize(data, off)?;
        Ok(Self { fd, basep, nbytes })
    }
}

/// `getdirentries(2)` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetdirentriesResponse {
    /// Bytes returned, or a negative `errno` signal.
    pub n: isize,
    /// Updated seek cookie, always present.
    pub new_basep: i64,
    /// Directory-entry bytes, present only when `n > 0`.
    pub bytes: Vec<u8>,
}

impl GetdirentriesResponse {
    /// Encodes as `n isize, new_basep i64; if n>0 then bytes[n]`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let off = write_i64(&mut buf, 0, self.n as i64);
        let off = write_i64(&mut buf, off, self.new_basep);
        if self.n > 0 {
            write_bytes(&mut buf, off, &self.bytes);
        }
        buf
    }

    /// Decodes the response.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (n, off) = read_i64(data, 0)?;
        let n = n as isize;
        let (new_basep, off) = read_i64(data, off)?;
        let bytes = if n > 0 { read_bytes(data, off, n as usize)?.0.to_vec() } else { Vec::new() };
        Ok(Self { n, new_basep, bytes })
    }
}

/// `getdirtree` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetdirtreeRequest {
    /// Root path to walk.
    pub path: String,
}

impl GetdirtreeRequest {
    /// Encodes as `pathlen u32, path[pathlen]`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let path_len = self.path.len() + 1;
        let off = write_u32(&mut buf, 0, u32::try_from(path_len).unwrap_or(u32::MAX));
        let off = write_bytes(&mut buf, off, self.path.as_bytes());
        write_bytes(&mut buf, off, &[0u8]);
        buf
    }

    /// Decodes the request.
    ///
    /// # Errors
    /// Propagates [`crate::errors::ProtocolError`] on truncation.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (path_len, off) = read_u32(data, 0)?;
        let (raw, _) = read_bytes(data, off, path_len as usize)?;
        Ok(Self { path: cstr_to_string(raw) })
    }
}

fn cstr_to_string(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw.strip_suffix(&[0u8]).unwrap_or(raw)).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn open_request_round_trip() {
        let req = OpenRequest { flags: 0o1101, mode: 0o644, path: "/tmp/x".to_string() };
        let decoded = OpenRequest::decode(&req.encode()).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn read_response_round_trip_with_data() {
        let resp = ReadResponse { n: 5, bytes: vec![1, 2, 3, 4, 5] };
        let decoded = ReadResponse::decode(&resp.encode()).unwrap();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn read_response_round_trip_on_error() {
        let resp = ReadResponse { n: -1, bytes: Vec::new() };
        let decoded = ReadResponse::decode(&resp.encode()).unwrap();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn getdirentries_request_field_order() {
        let req = GetdirentriesRequest { fd: 7, basep: 42, nbytes: 512 };
        let encoded = req.encode();
        // fd (4 bytes) then basep (8 bytes) then nbytes -- not nbytes-then-basep.
        let (basep, _) = read_i64(&encoded, 4).unwrap();
        assert_eq!(basep, 42);
        let decoded = GetdirentriesRequest::decode(&encoded).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn getdirentries_response_carries_basep_even_on_failure() {
        let resp = GetdirentriesResponse { n: -1, new_basep: 99, bytes: Vec::new() };
        let decoded = GetdirentriesResponse::decode(&resp.encode()).unwrap();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn stat_response_round_trip() {
        let resp = StatResponse { rc: 0, raw_stat: vec![0xAB; 144] };
        let decoded = StatResponse::decode(&resp.encode(), 144).unwrap();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn stat_response_failure_carries_no_struct() {
        let resp = StatResponse { rc: -1, raw_stat: Vec::new() };
        let decoded = StatResponse::decode(&resp.encode(), 144).unwrap();
        assert_eq!(decoded, resp);
    }
}
