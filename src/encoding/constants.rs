//! Header bit layouts.
//!
//! The low three bits of every header are the major type. What the upper five bits mean
//! depends on it:
//!
//! | Major type    | Bits 3–4           | Bits 5–7                         |
//! | ---           | ---                | ---                              |
//! | null/bool     | bool flag, value   | unused (zero)                    |
//! | number        | kind               | byte count index                 |
//! | object        | key kind           | key byte count index             |
//! | typed array   | kind, 3 = bool/str | byte count index, or bit 5 = str |
//! | extension     | extension ID       | extension ID                     |
//!
//! Extension IDs:
//!
//! | ID      | Extension          |
//! | ---     | ---                |
//! | `0`     | delimiter          |
//! | `1`     | variant            |
//! | `2`     | matrix             |
//! | `3`     | complex            |
//! | `4..8`  | reserved           |
//! | `8`     | typed object array |
//! | `9`     | timestamp          |
//! | `10`    | duration           |
//! | `11`    | UUID               |
//! | `12..`  | unassigned         |

/// Major type bits, 0x07
pub const MASK_MAJOR: u8 = 0b0000_0111;
/// Kind bits of numbers, object keys and typed arrays, 0x18
pub const MASK_KIND: u8 = 0b0001_1000;
/// Byte count index bits, 0xe0
pub const MASK_WIDTH: u8 = 0b1110_0000;
pub const KIND_SHIFT: u8 = 3;
pub const WIDTH_SHIFT: u8 = 5;

pub const TYPE_NULL_BOOL: u8 = 0;
pub const TYPE_NUMBER: u8 = 1;
pub const TYPE_STRING: u8 = 2;
pub const TYPE_OBJECT: u8 = 3;
pub const TYPE_TYPED_ARRAY: u8 = 4;
pub const TYPE_GENERIC_ARRAY: u8 = 5;
pub const TYPE_EXTENSION: u8 = 6;

/// Null header, 0x00
pub const NULL: u8 = 0b0000_0000;
/// Set on every boolean header, 0x08
pub const BOOL_FLAG: u8 = 0b0000_1000;
/// Value bit of a boolean header, 0x10
pub const BOOL_VALUE: u8 = 0b0001_0000;
/// `false`, 0x08
pub const FALSE: u8 = BOOL_FLAG;
/// `true`, 0x18
pub const TRUE: u8 = BOOL_FLAG | BOOL_VALUE;

/// Typed array kind for booleans and strings.
pub const KIND_BOOL_OR_STRING: u8 = 3;
/// With [`KIND_BOOL_OR_STRING`], selects strings over booleans, 0x20
pub const STRING_ARRAY_BIT: u8 = 0b0010_0000;
/// With [`KIND_BOOL_OR_STRING`], must be clear, 0xc0
pub const MASK_BOOL_OR_STRING_RESERVED: u8 = 0b1100_0000;

/// Object key kind for string keys.
pub const KEY_STRING: u8 = 0;

pub const EXT_SHIFT: u8 = 3;
pub const EXT_DELIMITER: u8 = 0;
pub const EXT_VARIANT: u8 = 1;
pub const EXT_MATRIX: u8 = 2;
pub const EXT_COMPLEX: u8 = 3;
pub const EXT_TYPED_OBJECT_ARRAY: u8 = 8;
pub const EXT_TIMESTAMP: u8 = 9;
pub const EXT_DURATION: u8 = 10;
pub const EXT_UUID: u8 = 11;

/// Header of a delimiter, 0x06
pub const DELIMITER: u8 = TYPE_EXTENSION;

/// Complex header: set for an array of complex numbers
pub const COMPLEX_ARRAY_BIT: u8 = 0b0000_0001;
/// Complex header: kind bits, 0x06
pub const MASK_COMPLEX_KIND: u8 = 0b0000_0110;
/// Complex header: byte count index bits, 0x38
pub const MASK_COMPLEX_WIDTH: u8 = 0b0011_1000;
/// Complex header: must be clear, 0xc0
pub const MASK_COMPLEX_RESERVED: u8 = 0b1100_0000;

/// Timestamp flags: an offset follows the nanoseconds
pub const TIMESTAMP_HAS_TZ: u8 = 0b0000_0001;

/// Upper bound on nanoseconds, exclusive.
pub const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Header of a number, object or typed array from its major type, kind bits and byte
/// count index.
///
/// # Example
///
/// ```
/// use beve::encoding::constants::*;
///
/// // unsigned, 4 bytes
/// assert_eq!(header(TYPE_NUMBER, 2, 2), 0b010_10_001);
/// ```
#[inline]
pub fn header(major: u8, kind: u8, index: u8) -> u8 {
    major | (kind << KIND_SHIFT) | (index << WIDTH_SHIFT)
}

/// Header of an extension.
#[inline]
pub fn ext_header(id: u8) -> u8 { TYPE_EXTENSION | (id << EXT_SHIFT) }
