//! Bounds-checked reading and growable writing of little-endian bytes.
//!
//! Every codec function takes one of these by `&mut`, so nested calls share a single
//! offset without any state outside the call.
//!
//! # Example
//!
//! ```
//! use beve::buffer::{ByteCursor, ByteWriter};
//!
//! let mut out = ByteWriter::new();
//! out.write_u16(0xbeef);
//! out.write_u8(7);
//! let bytes = out.finish();
//! assert_eq!(bytes, vec![0xef, 0xbe, 7]);
//!
//! let mut cursor = ByteCursor::new(&bytes);
//! assert_eq!(cursor.read_u16().unwrap(), 0xbeef);
//! assert_eq!(cursor.read_u8().unwrap(), 7);
//! assert!(cursor.read_u8().is_err());
//! ```

use crate::errors::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Sequential reader over an immutable byte buffer.
#[derive(Clone, Copy, Debug)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

macro_rules! read_le {
    ($name:ident, $typ:ty, $width:expr, $read:path) => {
        #[doc = concat!("Read a little-endian `", stringify!($typ), "`.")]
        #[inline]
        pub fn $name(&mut self) -> Result<$typ> {
            let bs = self.read_slice($width)?;
            Ok($read(bs))
        }
    };
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor positioned at the start of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self { ByteCursor { buffer, offset: 0 } }

    /// Current read offset.
    pub fn offset(&self) -> usize { self.offset }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize { self.buffer.len() - self.offset }

    /// Indicates whether every byte has been consumed.
    pub fn is_empty(&self) -> bool { self.remaining() == 0 }

    fn truncated(&self, needed: usize) -> Error {
        Error::TruncatedInput {
            offset: self.offset,
            needed,
            remaining: self.remaining(),
        }
    }

    /// Returns the next byte without consuming it.
    #[inline]
    pub fn peek_u8(&self) -> Result<u8> {
        match self.buffer.get(self.offset) {
            Some(b) => Ok(*b),
            None => Err(self.truncated(1)),
        }
    }

    /// Reads `len` bytes, failing without moving if fewer remain.
    #[inline]
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.truncated(len));
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.buffer[start..self.offset])
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_u8()?;
        self.offset += 1;
        Ok(byte)
    }

    /// Reads a single signed byte.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> { Ok(self.read_u8()? as i8) }

    read_le!(read_u16, u16, 2, LittleEndian::read_u16);
    read_le!(read_u32, u32, 4, LittleEndian::read_u32);
    read_le!(read_u64, u64, 8, LittleEndian::read_u64);
    read_le!(read_u128, u128, 16, LittleEndian::read_u128);
    read_le!(read_i16, i16, 2, LittleEndian::read_i16);
    read_le!(read_i32, i32, 4, LittleEndian::read_i32);
    read_le!(read_i64, i64, 8, LittleEndian::read_i64);
    read_le!(read_i128, i128, 16, LittleEndian::read_i128);
    read_le!(read_f32, f32, 4, LittleEndian::read_f32);
    read_le!(read_f64, f64, 8, LittleEndian::read_f64);

    /// Reads an unsigned little-endian integer of `width` bytes (at most 16).
    #[inline]
    pub fn read_uint(&mut self, width: usize) -> Result<u128> {
        debug_assert!(width >= 1 && width <= 16);
        let bs = self.read_slice(width)?;
        Ok(LittleEndian::read_uint128(bs, width))
    }
}

/// Append-only output buffer.
///
/// The backing storage doubles whenever a write would overflow it; [`ByteWriter::finish`]
/// hands back exactly the bytes written.
#[derive(Clone, Debug, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
    offset: usize,
}

macro_rules! write_le {
    ($name:ident, $typ:ty, $width:expr, $write:path) => {
        #[doc = concat!("Write a little-endian `", stringify!($typ), "`.")]
        #[inline]
        pub fn $name(&mut self, v: $typ) {
            self.ensure_capacity($width);
            $write(&mut self.buffer[self.offset..self.offset + $width], v);
            self.offset += $width;
        }
    };
}

impl ByteWriter {
    /// Creates an empty writer.
    pub fn new() -> Self { ByteWriter::default() }

    /// Creates a writer whose buffer starts with room for `cap` bytes.
    pub fn with_capacity(cap: usize) -> Self {
        ByteWriter {
            buffer: vec![0; cap],
            offset: 0,
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize { self.offset }

    /// Indicates whether nothing has been written.
    pub fn is_empty(&self) -> bool { self.offset == 0 }

    /// Size of the backing buffer, including unwritten space.
    pub fn capacity(&self) -> usize { self.buffer.len() }

    /// The written prefix.
    pub fn as_slice(&self) -> &[u8] { &self.buffer[..self.offset] }

    /// Makes sure `n` more bytes fit, doubling the buffer if they don't.
    #[inline]
    pub fn ensure_capacity(&mut self, n: usize) {
        let needed = self.offset + n;
        if needed > self.buffer.len() {
            let grown = std::cmp::max(self.buffer.len() * 2, needed);
            self.buffer.resize(grown, 0);
        }
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, v: u8) {
        self.ensure_capacity(1);
        self.buffer[self.offset] = v;
        self.offset += 1;
    }

    /// Writes a single signed byte.
    #[inline]
    pub fn write_i8(&mut self, v: i8) { self.write_u8(v as u8) }

    /// Writes raw bytes.
    #[inline]
    pub fn write_slice(&mut self, slice: &[u8]) {
        self.ensure_capacity(slice.len());
        self.buffer[self.offset..self.offset + slice.len()].copy_from_slice(slice);
        self.offset += slice.len();
    }

    write_le!(write_u16, u16, 2, LittleEndian::write_u16);
    write_le!(write_u32, u32, 4, LittleEndian::write_u32);
    write_le!(write_u64, u64, 8, LittleEndian::write_u64);
    write_le!(write_u128, u128, 16, LittleEndian::write_u128);
    write_le!(write_i16, i16, 2, LittleEndian::write_i16);
    write_le!(write_i32, i32, 4, LittleEndian::write_i32);
    write_le!(write_i64, i64, 8, LittleEndian::write_i64);
    write_le!(write_i128, i128, 16, LittleEndian::write_i128);
    write_le!(write_f32, f32, 4, LittleEndian::write_f32);
    write_le!(write_f64, f64, 8, LittleEndian::write_f64);

    /// Consumes the writer, returning the written bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.buffer.truncate(self.offset);
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_underrun() {
        let data = [1u8, 2, 3];
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_u16().unwrap(), 0x0201);
        match c.read_u32() {
            Err(Error::TruncatedInput {
                offset,
                needed,
                remaining,
            }) => {
                assert_eq!((offset, needed, remaining), (2, 4, 1));
            }
            other => panic!("expected truncation, got {:?}", other),
        }
        // a failed read doesn't move the cursor
        assert_eq!(c.offset(), 2);
        assert_eq!(c.read_u8().unwrap(), 3);
        assert!(c.is_empty());
        assert!(c.peek_u8().is_err());
    }

    #[test]
    fn cursor_uint() {
        let data = [0xff, 0x01, 0x00];
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_uint(3).unwrap(), 0x01ff);
    }

    #[test]
    fn writer_doubles() {
        let mut w = ByteWriter::with_capacity(2);
        w.write_u8(1);
        w.write_u8(2);
        assert_eq!(w.capacity(), 2);
        w.write_u8(3);
        assert_eq!(w.capacity(), 4);
        w.write_u64(0);
        assert_eq!(w.capacity(), 11);
        assert_eq!(w.finish().len(), 11);
    }

    #[test]
    fn writer_little_endian() {
        let mut w = ByteWriter::new();
        w.write_i16(-2);
        w.write_f32(1.0);
        assert_eq!(w.finish(), vec![0xfe, 0xff, 0, 0, 0x80, 0x3f]);
    }
}
