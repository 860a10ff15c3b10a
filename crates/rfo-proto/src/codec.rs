//! Offset-based primitive codec.
//!
//! Mirrors `serde.c`'s `mem_write_*`/`mem_read_*` family: every write takes a
//! destination buffer and an offset and returns the offset just past what it
//! wrote; every read takes a source slice and an offset and returns the
//! decoded value alongside the offset just past what it consumed. Chaining
//! calls by threading the returned offset through the next call is the
//! intended usage, exactly as the C call sites chain `off = mem_write_*(...)`.
//!
//! Integers are encoded host-native (`to_ne_bytes`/`from_ne_bytes`): per §4.2
//! and §9, this system assumes client and server share an architecture and
//! does not attempt cross-architecture interop.

use crate::errors::{ProtocolError, Result};

/// Grows `buf` with zero bytes if needed so that `buf.len() >= end`.
fn ensure_len(buf: &mut Vec<u8>, end: usize) {
    if buf.len() < end {
        buf.resize(end, 0);
    }
}

/// Writes a little-endian-free, host-native `u32` at `off`.
pub fn write_u32(buf: &mut Vec<u8>, off: usize, val: u32) -> usize {
    write_bytes(buf, off, &val.to_ne_bytes())
}

/// Writes a host-native `u16` at `off`.
pub fn write_u16(buf: &mut Vec<u8>, off: usize, val: u16) -> usize {
    write_bytes(buf, off, &val.to_ne_bytes())
}

/// Writes a host-native `i32` at `off`.
pub fn write_i32(buf: &mut Vec<u8>, off: usize, val: i32) -> usize {
    write_bytes(buf, off, &val.to_ne_bytes())
}

/// Writes a host-native `i64` at `off`.
pub fn write_i64(buf: &mut Vec<u8>, off: usize, val: i64) -> usize {
    write_bytes(buf, off, &val.to_ne_bytes())
}

/// Writes a host-native, machine-word-sized `usize` at `off`.
///
/// Used for the fields the original marshals as `size_t` (byte counts,
/// `off_t`-adjacent values): their wire width is whatever `usize` is on the
/// host, which is the same host-native assumption the rest of the codec
/// makes.
pub fn write_usize(buf: &mut Vec<u8>, off: usize, val: usize) -> usize {
    write_bytes(buf, off, &val.to_ne_bytes())
}

/// Writes a raw byte range at `off`.
pub fn write_bytes(buf: &mut Vec<u8>, off: usize, data: &[u8]) -> usize {
    let end = off + data.len();
    ensure_len(buf, end);
    buf[off..end].copy_from_slice(data);
    end
}

/// Writes a nul-terminated string: a `u32` length prefix (including the
/// terminator) followed by the bytes and the terminator itself.
pub fn write_cstring(buf: &mut Vec<u8>, off: usize, s: &str) -> usize {
    let len = s.len() + 1;
    let off = write_u32(buf, off, u32::try_from(len).unwrap_or(u32::MAX));
    let off = write_bytes(buf, off, s.as_bytes());
    write_bytes(buf, off, &[0u8])
}

/// Reads a host-native `u32` from `off`.
pub fn read_u32(data: &[u8], off: usize) -> Result<(u32, usize)> {
    let (bytes, off) = read_fixed::<4>(data, off)?;
    Ok((u32::from_ne_bytes(bytes), off))
}

/// Reads a host-native `u16` from `off`.
pub fn read_u16(data: &[u8], off: usize) -> Result<(u16, usize)> {
    let (bytes, off) = read_fixed::<2>(data, off)?;
    Ok((u16::from_ne_bytes(bytes), off))
}

/// Reads a host-native `i32` from `off`.
pub fn read_i32(data: &[u8], off: usize) -> Result<(i32, usize)> {
    let (bytes, off) = read_fixed::<4>(data, off)?;
    Ok((i32::from_ne_bytes(bytes), off))
}

/// Reads a host-native `i64` from `off`.
pub fn read_i64(data: &[u8], off: usize) -> Result<(i64, usize)> {
    let (bytes, off) = read_fixed::<8>(data, off)?;
    Ok((i64::from_ne_bytes(bytes), off))
}

/// Reads a host-native, machine-word-sized `usize` from `off`.
pub fn read_usize(data: &[u8], off: usize) -> Result<(usize, usize)> {
    let (bytes, off) = read_fixed::<{ size_of::<usize>() }>(data, off)?;
    Ok((usize::from_ne_bytes(bytes), off))
}

/// Reads `len` raw bytes from `off`.
pub fn read_bytes(data: &[u8], off: usize, len: usize) -> Result<(&[u8], usize)> {
    let end = off
        .checked_add(len)
        .ok_or(ProtocolError::Truncated { expected: len, actual: data.len().saturating_sub(off) })?;
    data.get(off..end)
        .map(|slice| (slice, end))
        .ok_or(ProtocolError::Truncated { expected: len, actual: data.len().saturating_sub(off) })
}

/// Reads a length-prefixed, nul-terminated string written by
/// [`write_cstring`].
pub fn read_cstring(data: &[u8], off: usize) -> Result<(String, usize)> {
    let (len, off) = read_u32(data, off)?;
    let len = len as usize;
    let (raw, off) = read_bytes(data, off, len)?;
    let without_nul = raw
        .strip_suffix(&[0u8])
        .ok_or_else(|| ProtocolError::MalformedString("missing nul terminator".to_string()))?;
    let s = std::str::from_utf8(without_nul)
        .map_err(|e| ProtocolError::MalformedString(e.to_string()))?
        .to_string();
    Ok((s, off))
}

fn read_fixed<const N: usize>(data: &[u8], off: usize) -> Result<([u8; N], usize)> {
    let (slice, next) = read_bytes(data, off, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    Ok((out, next))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn write_then_read_u32() {
        let mut buf = Vec::new();
        let off = write_u32(&mut buf, 0, 0xDEAD_BEEF);
        assert_eq!(off, 4);
        let (val, next) = read_u32(&buf, 0).unwrap();
        assert_eq!(val, 0xDEAD_BEEF);
        assert_eq!(next, 4);
    }

    #[test]
    fn chained_writes_advance_offset() {
        let mut buf = Vec::new();
        let off = write_u32(&mut buf, 0, 7);
        let off = write_u16(&mut buf, off, 0o644);
        let off = write_bytes(&mut buf, off, b"hello");
        assert_eq!(off, 4 + 2 + 5);
        assert_eq!(buf.len(), off);
    }

    #[test]
    fn cstring_round_trip() {
        let mut buf = Vec::new();
        write_cstring(&mut buf, 0, "/tmp/t.txt");
        let (s, off) = read_cstring(&buf, 0).unwrap();
        assert_eq!(s, "/tmp/t.txt");
        assert_eq!(off, buf.len());
    }

    #[test]
    fn read_past_end_is_truncated() {
        let buf = vec![1, 2, 3];
        assert!(matches!(read_u32(&buf, 0), Err(ProtocolError::Truncated { .. })));
    }

    proptest! {
        #[test]
        fn u32_round_trip(val in any::<u32>()) {
            let mut buf = Vec::new();
            write_u32(&mut buf, 0, val);
            let (decoded, _) = read_u32(&buf, 0).unwrap();
            prop_assert_eq!(decoded, val);
        }

        #[test]
        fn i64_round_trip(val in any::<i64>()) {
            let mut buf = Vec::new();
            write_i64(&mut buf, 0, val);
            let (decoded, _) = read_i64(&buf, 0).unwrap();
            prop_assert_eq!(decoded, val);
        }

        #[test]
        fn bytes_round_trip(data in prop::collection::vec(any::<u8>(), 0..256)) {
            let mut buf = Vec::new();
            write_bytes(&mut buf, 0, &data);
            let (decoded, _) = read_bytes(&buf, 0, data.len()).unwrap();
            prop_assert_eq!(decoded, &data[..]);
        }

        #[test]
        fn cstring_round_trip_prop(s in "[a-zA-Z0-9/_.]{0,64}") {
            let mut buf = Vec::new();
            write_cstring(&mut buf, 0, &s);
            let (decoded, _) = read_cstring(&buf, 0).unwrap();
            prop_assert_eq!(decoded, s);
        }
    }
}
