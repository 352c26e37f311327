//! SIZE: the variable-width length prefix used for strings, containers and counts.
//!
//! The low two bits of the first byte select the total width (1, 2, 4 or 8 bytes) and
//! the value sits in the remaining bits of the little-endian whole.
//!
//! # Example
//!
//! ```
//! use beve::{buffer::ByteCursor, encoding::var_size};
//!
//! let bs = var_size::encode(64).unwrap();
//! assert_eq!(bs.as_slice(), &[0x01, 0x01]);
//!
//! let mut cursor = ByteCursor::new(&bs);
//! assert_eq!(var_size::read(&mut cursor).unwrap(), 64);
//! ```

use super::ser::Serializer;
use crate::{
    buffer::ByteCursor,
    errors::{Error, Result},
};
use smallvec::SmallVec;

/// Largest encodable SIZE, `2^62 - 1`.
pub const MAX: u64 = (1 << 62) - 1;

#[inline]
fn tag_for(n: u64) -> u8 {
    if n < 1 << 6 {
        0
    } else if n < 1 << 14 {
        1
    } else if n < 1 << 30 {
        2
    } else {
        3
    }
}

/// Encodes `n`, which the caller guarantees is at most [`MAX`].
#[inline]
pub(crate) fn encode_unchecked(n: u64) -> SmallVec<[u8; 8]> {
    debug_assert!(n <= MAX, "SIZE {} out of range", n);
    let tag = tag_for(n);
    let whole = (n << 2) | tag as u64;
    SmallVec::from_slice(&whole.to_le_bytes()[..1 << tag])
}

/// Encodes a SIZE.
///
/// # Errors
///
/// Returns [`Error::SizeOutOfRange`] for values above [`MAX`].
pub fn encode(n: u64) -> Result<SmallVec<[u8; 8]>> {
    if n > MAX {
        return Err(Error::SizeOutOfRange { value: n });
    }
    Ok(encode_unchecked(n))
}

/// Writes a SIZE, which the caller guarantees is at most [`MAX`].
#[inline]
pub fn write<S: Serializer>(n: u64, out: &mut S) { out.put_slice(&encode_unchecked(n)) }

/// Reads a SIZE.
pub fn read(cursor: &mut ByteCursor) -> Result<u64> {
    let tag = cursor.peek_u8()? & 0b11;
    let whole = cursor.read_uint(1 << tag)?;
    Ok((whole >> 2) as u64)
}

/// Reads a SIZE that counts items of at least `min_bytes` bytes each, rejecting counts
/// the rest of the buffer can't possibly hold.
pub(crate) fn read_count(cursor: &mut ByteCursor, min_bytes: usize) -> Result<usize> {
    let offset = cursor.offset();
    let n = read(cursor)?;
    let needed = n.saturating_mul(min_bytes as u64);
    if needed > cursor.remaining() as u64 {
        return Err(Error::TruncatedInput {
            offset: cursor.offset(),
            needed: std::cmp::min(needed, usize::max_value() as u64) as usize,
            remaining: cursor.remaining(),
        });
    }
    if n > usize::max_value() as u64 {
        return Err(Error::unsupported(offset, "SIZE doesn't fit in memory"));
    }
    Ok(n as usize)
}
