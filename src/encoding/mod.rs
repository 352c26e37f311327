//! # BEVE binary encoder and decoder
//!
//! Encode and decode functions for BEVE.
//!
//! # Example
//!
//! ```
//! use beve::prelude::*;
//!
//! // a struct that will store some data
//! #[derive(BeveRep, PartialEq, Debug, Clone)]
//! struct SomeData {
//!     x: usize,
//!     y: i32,
//! }
//!
//! // here it is storing some data
//! let some_data = SomeData { x: 1, y: 2 };
//!
//! // and we've encoded it
//! let enc_full = encode_full(&some_data.to_beve());
//!
//! // let's encode it a different way too
//! let out = &mut Vec::new();
//! encode(&some_data.to_beve(), out);
//!
//! // but they are equivalent
//! assert_eq!(*out, enc_full);
//!
//! // Note: decoding returns a `Result`
//! let dec: Value = decode_full(&enc_full).unwrap(); // did the decoding succeed?
//! let dec_full: SomeData = dec.into_rep().unwrap(); // did the conversion succeed?
//!
//! // success!
//! assert_eq!(dec_full, some_data);
//! ```

use crate::{
    buffer::ByteCursor,
    config::{DecodeConfig, EncodeConfig},
    errors::{Error, Result},
    Value,
};
use tracing::trace;

pub mod constants;
pub mod var_size;
pub mod ser;
pub use ser::*;
pub mod de;
pub use de::{read_value, Decoder, Records};
mod ext;

use constants::DELIMITER;

/// Encode a value into its binary representation, storing output in `out`.
///
/// Generic arrays are promoted to typed arrays where possible, as with
/// [`EncodeConfig::default`].
///
/// # Arguments
///
/// * `t` - The value to be encoded.
/// * `out` - The [`Serializer`] where the encoder output will be stored.
///
/// # Example
///
/// ```
/// use beve::prelude::*;
///
/// // output buffer
/// let out = &mut Vec::new();
///
/// // encode value
/// encode(&Value::Null, out);
/// assert_eq!(*out, vec![0]);
/// ```
pub fn encode<T: Ser, S: Serializer>(t: T, out: &mut S) { t.ser(out, &EncodeConfig::default()) }

/// Encodes a value into a vector of bytes.
///
/// # Example
///
/// ```
/// use beve::prelude::*;
///
/// let enc: Vec<u8> = encode_full(&Value::from(true));
/// assert_eq!(enc, vec![0x18]);
/// ```
pub fn encode_full<T: Ser>(t: T) -> Vec<u8> { encode_with(t, &EncodeConfig::default()) }

/// Encodes a value into a vector of bytes with the given settings.
///
/// # Example
///
/// ```
/// use beve::prelude::*;
///
/// let v = Value::from(vec![1u8, 2, 3]);
/// let generic = encode_with(&v, &EncodeConfig::new().typed_arrays(false));
/// // generic array of three one byte numbers
/// assert_eq!(generic.len(), 2 + 3 * 2);
/// ```
pub fn encode_with<T: Ser>(t: T, cfg: &EncodeConfig) -> Vec<u8> {
    let mut out = Vec::new();
    t.ser(&mut out, cfg);
    out
}

/// Encodes each record followed by a delimiter, for reading back with [`Records`].
pub fn encode_records(records: &[Value]) -> Vec<u8> {
    let cfg = EncodeConfig::default();
    let mut out = Vec::new();
    for r in records {
        r.ser(&mut out, &cfg);
        out.put_u8(DELIMITER);
    }
    out
}

/// Decodes exactly one value, leaving the cursor just past it.
///
/// # Example
///
/// ```
/// use beve::{buffer::ByteCursor, prelude::*};
///
/// // two values back to back
/// let bs = [0x18, 0x00];
/// let cursor = &mut ByteCursor::new(&bs);
///
/// assert_eq!(decode(cursor).unwrap(), Value::from(true));
/// assert_eq!(decode(cursor).unwrap(), Value::Null);
/// assert!(decode(cursor).is_err());
/// ```
pub fn decode(cursor: &mut ByteCursor) -> Result<Value> {
    read_value(cursor, &DecodeConfig::default())
}

/// Decodes a bytestring holding exactly one value, returns an error if decoding fails or
/// if bytes are left over.
///
/// # Arguments
///
/// * `bs` - The bytestring to be decoded.
///
/// # Example
///
/// ```
/// use beve::prelude::*;
///
/// // encoded value
/// let bs = encode_full(&Value::from("hi"));
///
/// // decode value
/// let dec: Result<Value, Error> = decode_full(&bs);
/// assert_eq!(dec.unwrap(), Value::from("hi"));
/// ```
pub fn decode_full(bs: &[u8]) -> Result<Value> { decode_with(bs, &DecodeConfig::default()) }

/// Like [`decode_full`], with the given settings.
pub fn decode_with(bs: &[u8], cfg: &DecodeConfig) -> Result<Value> {
    trace!(len = bs.len(), max_depth = cfg.max_depth, "decoding value");
    let mut cursor = ByteCursor::new(bs);
    let v = read_value(&mut cursor, cfg)?;
    if !cursor.is_empty() {
        return Err(Error::unsupported(
            cursor.offset(),
            format!("{} trailing bytes", cursor.remaining()),
        ));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::{constants::*, *};
    use crate::{extension::Extension, typed::NumericArray, Object};
    use bytes::Bytes;
    use half::f16;

    #[test]
    fn constants() {
        assert_eq!(encode_full(&Value::Null), vec![NULL]);
        assert_eq!(encode_full(&Value::from(true)), vec![TRUE]);
        assert_eq!(encode_full(&Value::from(false)), vec![FALSE]);
    }

    #[test]
    fn unsigned_one_byte() {
        let out = encode_full(&Value::from(200u8));

        // tag
        assert_eq!(out[0], 0b000_10_001);
        assert_eq!(out[1..], [200]);
    }

    #[test]
    fn signed_four_bytes() {
        let out = encode_full(&Value::from(-257i32));

        // tag
        assert_eq!(out[0], 0b010_01_001);
        assert_eq!(out[1..], [0xff, 0xfe, 0xff, 0xff]);
    }

    #[test]
    fn sixteen_byte_integers() {
        let out = encode_full(&Value::from(u128::max_value()));

        assert_eq!(out[0], 0b100_10_001);
        assert_eq!(out[1..], [0xff; 16]);
        assert_eq!(decode_full(&out).unwrap(), Value::from(u128::max_value()));
    }

    #[test]
    fn half_float() {
        let out = encode_full(&Value::from(f16::from_f32(1.0)));

        // tag
        assert_eq!(out[0], 0b001_00_001);
        // bytes
        assert_eq!(out[1..3], [0, 0b00_1111_00]);

        let out = encode_full(&Value::from(f16::from_f32(-0.0)));
        assert_eq!(out[1..3], [0, 0b1_000_0000]);
    }

    #[test]
    fn single_floats() {
        let out = encode_full(&Value::from(-1f32));

        // tag
        assert_eq!(out[0], 0b010_00_001);
        // bytes
        assert_eq!(out[1..5], [0, 0, 0b1000_0000, 0b1011_1111]);
    }

    #[test]
    fn double_floats() {
        let out = encode_full(&Value::from(1f64));

        // tag
        assert_eq!(out[0], 0b011_00_001);
        // bytes
        assert_eq!(out[1..9], [0, 0, 0, 0, 0, 0, 0b1111_0000, 0b0011_1111]);
    }

    #[test]
    fn small_string() {
        let out = encode_full(&Value::from("w"));

        // tag
        assert_eq!(out[0], TYPE_STRING);
        // length
        assert_eq!(out[1], 1 << 2);
        // characters
        assert_eq!(out[2], b'w');
    }

    #[test]
    fn large_string() {
        let s = "w".repeat(140);
        let out = encode_full(&Value::from(s.as_str()));

        // tag
        assert_eq!(out[0], TYPE_STRING);
        // (140 << 2) | 1, two bytes
        assert_eq!(out[1..3], [0x31, 0x02]);
        // bytes
        assert_eq!(out[3..].to_vec(), vec![b'w'; 140]);
    }

    #[test]
    fn bool_arrays() {
        let out = encode_full(&Value::from(vec![true, false, true]));
        assert_eq!(out, vec![0b000_11_100, 3 << 2, 0b101]);

        let out = encode_full(&Value::from(vec![true; 9]));
        assert_eq!(out, vec![0b000_11_100, 9 << 2, 0xff, 0x01]);
    }

    #[test]
    fn string_arrays() {
        let out = encode_full(&Value::from(vec!["a", "bc"]));
        assert_eq!(out[0], 0b001_11_100);
        assert_eq!(out[1..], [2 << 2, 1 << 2, b'a', 2 << 2, b'b', b'c']);
    }

    #[test]
    fn binary() {
        let b = Value::Binary(Bytes::from_static(b"ab"));
        let out = encode_full(&b);
        assert_eq!(out, vec![0b000_10_100, 2 << 2, b'a', b'b']);
        assert_eq!(decode_full(&out).unwrap(), b);
    }

    #[test]
    fn numeric_arrays() {
        let v = Value::from(NumericArray::from(vec![1.5f32, -2.0]));
        let out = encode_full(&v);

        // float, 4 bytes
        assert_eq!(out[0], 0b010_00_100);
        assert_eq!(out[1], 2 << 2);
        assert_eq!(out.len(), 2 + 8);
        assert_eq!(decode_full(&out).unwrap(), v);
    }

    #[test]
    fn small_map() {
        let mut o = Object::new();
        o.insert("a", "b");
        let out = encode_full(&Value::from(o));

        // tag, string keys
        assert_eq!(out[0], 0b000_00_011);
        assert_eq!(out[1], 1 << 2);
        // bare key
        assert_eq!(out[2..4], [1 << 2, b'a']);
        // headered value
        assert_eq!(out[4..], [TYPE_STRING, 1 << 2, b'b']);
    }

    #[test]
    fn truncation() {
        let mut o = Object::new();
        o.insert("pi", 3.25);
        o.insert("xs", vec![1u32, 2, 3]);
        let out = encode_full(&Value::from(o));

        for end in 0..out.len() {
            match decode_full(&out[..end]) {
                Err(Error::TruncatedInput { .. }) => (),
                other => panic!("{}: {:?}", end, other),
            }
        }
        assert!(decode_full(&out).is_ok());
    }

    #[test]
    fn trailing_bytes() {
        match decode_full(&[NULL, NULL]) {
            Err(Error::UnsupportedEncoding { offset: 1, .. }) => (),
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn reserved_extensions() {
        assert!(decode_full(&[ext_header(5)]).is_err());
        assert!(decode_full(&[ext_header(12)]).is_err());
    }

    #[test]
    fn records() {
        let rs = vec![Value::from(1u8), Value::Null, Value::from("x")];
        let bs = encode_records(&rs);
        assert_eq!(bs[..3], [0b000_10_001, 1, DELIMITER]);

        let back: Result<Vec<Value>> = Records::new(&bs).collect();
        assert_eq!(back.unwrap(), rs);

        // the last delimiter is optional
        let back: Result<Vec<Value>> = Records::new(&bs[..bs.len() - 1]).collect();
        assert_eq!(back.unwrap(), rs);

        // stops after an error
        let mut rs = Records::new(&[NULL, DELIMITER, 0x07, NULL]);
        assert_eq!(rs.next().unwrap().unwrap(), Value::Null);
        assert!(rs.next().unwrap().is_err());
        assert!(rs.next().is_none());
    }

    #[test]
    fn typed_object_promotion() {
        let rows: Vec<Value> = (0..2u8)
            .map(|i| {
                let mut o = Object::new();
                o.insert("i", i);
                Value::from(o)
            })
            .collect();
        let v = Value::from(rows);
        let out = encode_with(&v, &EncodeConfig::new().typed_object_arrays(true));
        assert_eq!(out[0], ext_header(EXT_TYPED_OBJECT_ARRAY));

        let back = decode_full(&out).unwrap();
        match &back {
            Value::Extension(Extension::TypedObjectArray(_)) => (),
            other => panic!("{:?}", other),
        }
        assert_eq!(back, v);
    }
}
