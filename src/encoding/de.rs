use super::{constants::*, var_size};
use crate::{
    buffer::ByteCursor,
    config::DecodeConfig,
    errors::{Error, Result},
    number::{NumKind, Number, Width},
    typed::{NumericArray, TypedArray},
    vecmap::VecMap,
    Array, Object, Value,
};
use bytes::Bytes;

/// Reads values out of a [`ByteCursor`], tracking how deeply containers nest.
#[derive(Debug)]
pub struct Decoder<'a, 'b> {
    pub(super) cursor: &'b mut ByteCursor<'a>,
    pub(super) config: &'b DecodeConfig,
    depth: usize,
}

/// Splits a header into its kind bits and byte count index.
#[inline]
fn kind_and_index(h: u8) -> (u8, u8) {
    ((h & MASK_KIND) >> KIND_SHIFT, (h & MASK_WIDTH) >> WIDTH_SHIFT)
}

#[inline]
pub(super) fn width_at(index: u8, offset: usize) -> Result<Width> {
    Width::from_index(index).ok_or_else(|| {
        Error::unsupported(offset, format!("byte count index {} has no width", index))
    })
}

#[inline]
pub(super) fn num_kind_at(bits: u8, offset: usize) -> Result<NumKind> {
    NumKind::from_bits(bits)
        .ok_or_else(|| Error::unsupported(offset, format!("numeric kind {} is reserved", bits)))
}

impl<'a, 'b> Decoder<'a, 'b> {
    /// A decoder positioned wherever `cursor` is.
    pub fn new(cursor: &'b mut ByteCursor<'a>, config: &'b DecodeConfig) -> Self {
        Decoder {
            cursor,
            config,
            depth: 0,
        }
    }

    /// Runs `f` one container level deeper.
    pub(super) fn nested<T, F>(&mut self, offset: usize, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.depth >= self.config.max_depth {
            return Err(Error::unsupported(
                offset,
                format!("containers nest deeper than {}", self.config.max_depth),
            ));
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    /// Reads one value, header included.
    pub fn read_value(&mut self) -> Result<Value> {
        let offset = self.cursor.offset();
        let h = self.cursor.read_u8()?;
        match h & MASK_MAJOR {
            TYPE_NULL_BOOL => match h {
                NULL => Ok(Value::Null),
                TRUE => Ok(Value::Bool(true)),
                FALSE => Ok(Value::Bool(false)),
                _ => Err(Error::unsupported(
                    offset,
                    format!("{:#010b} is neither null nor a boolean", h),
                )),
            },
            TYPE_NUMBER => {
                let (kind, index) = kind_and_index(h);
                let kind = num_kind_at(kind, offset)?;
                let width = width_at(index, offset)?;
                Ok(Value::Number(Number::read_le(kind, width, self.cursor)?))
            }
            TYPE_STRING => Ok(Value::Text(self.read_bare_str()?)),
            TYPE_OBJECT => self.nested(offset, |d| d.read_object(h, offset)),
            TYPE_TYPED_ARRAY => self.read_typed(h, offset),
            TYPE_GENERIC_ARRAY => self.nested(offset, |d| {
                let len = var_size::read_count(d.cursor, 1)?;
                let mut vs = Vec::with_capacity(len);
                for _ in 0..len {
                    vs.push(d.read_value()?);
                }
                Ok(Value::Array(Array::Generic(vs)))
            }),
            TYPE_EXTENSION => Ok(Value::Extension(self.read_extension(h >> EXT_SHIFT, offset)?)),
            _ => Err(Error::unsupported(offset, "major type 7 is reserved")),
        }
    }

    /// Reads `SIZE | bytes` as UTF-8.
    pub(super) fn read_bare_str(&mut self) -> Result<String> {
        let len = var_size::read_count(self.cursor, 1)?;
        let offset = self.cursor.offset();
        let bs = self.cursor.read_slice(len)?;
        match std::str::from_utf8(bs) {
            Ok(s) => Ok(s.to_owned()),
            Err(e) => Err(Error::unsupported(
                offset + e.valid_up_to(),
                "string is not valid UTF-8",
            )),
        }
    }

    fn read_object(&mut self, h: u8, offset: usize) -> Result<Value> {
        let (kind, index) = kind_and_index(h);
        if kind == KEY_STRING {
            if index != 0 {
                return Err(Error::unsupported(offset, "string keys take no byte count"));
            }
            // SIZE of the key plus the value's header
            let len = var_size::read_count(self.cursor, 2)?;
            let mut m = VecMap::with_capacity(len);
            for _ in 0..len {
                let k = self.read_bare_str()?;
                let v = self.read_value()?;
                m.insert(k, v);
            }
            return Ok(Value::Object(Object::Text(m)));
        }

        let width = width_at(index, offset)?;
        let len = var_size::read_count(self.cursor, width.bytes() + 1)?;
        match num_kind_at(kind, offset)? {
            NumKind::Signed => {
                let shift = 128 - 8 * width.bytes() as u32;
                let mut m = VecMap::with_capacity(len);
                for _ in 0..len {
                    let bits = self.cursor.read_uint(width.bytes())?;
                    let k = ((bits << shift) as i128) >> shift;
                    let v = self.read_value()?;
                    m.insert(k, v);
                }
                Ok(Value::Object(Object::Signed(m)))
            }
            NumKind::Unsigned => {
                let mut m = VecMap::with_capacity(len);
                for _ in 0..len {
                    let k = self.cursor.read_uint(width.bytes())?;
                    let v = self.read_value()?;
                    m.insert(k, v);
                }
                Ok(Value::Object(Object::Unsigned(m)))
            }
            NumKind::Float => Err(Error::unsupported(offset, "object keys can't be floats")),
        }
    }

    /// Reads the bare payload of a numeric typed array with the given header.
    fn read_numeric_payload(&mut self, kind: NumKind, width: Width) -> Result<NumericArray> {
        let len = var_size::read(self.cursor)?;
        let bytes = len
            .checked_mul(width.bytes() as u64)
            .filter(|n| *n <= self.cursor.remaining() as u64)
            .ok_or_else(|| Error::TruncatedInput {
                offset: self.cursor.offset(),
                needed: std::cmp::min(
                    len.saturating_mul(width.bytes() as u64),
                    usize::max_value() as u64,
                ) as usize,
                remaining: self.cursor.remaining(),
            })?;
        let data = self.cursor.read_slice(bytes as usize)?;
        NumericArray::from_raw(kind, width, Bytes::copy_from_slice(data))
    }

    /// Reads a headered numeric typed array, as matrices carry them.
    pub(super) fn read_numeric_array(&mut self) -> Result<NumericArray> {
        let offset = self.cursor.offset();
        let h = self.cursor.read_u8()?;
        if h & MASK_MAJOR != TYPE_TYPED_ARRAY {
            return Err(Error::unsupported(offset, "expected a numeric typed array"));
        }
        let (kind, index) = kind_and_index(h);
        let kind = num_kind_at(kind, offset)?;
        let width = width_at(index, offset)?;
        self.read_numeric_payload(kind, width)
    }

    fn read_typed(&mut self, h: u8, offset: usize) -> Result<Value> {
        let (kind, index) = kind_and_index(h);
        if kind != KIND_BOOL_OR_STRING {
            let kind = num_kind_at(kind, offset)?;
            let width = width_at(index, offset)?;
            let arr = self.read_numeric_payload(kind, width)?;
            return Ok(match (kind, width) {
                (NumKind::Unsigned, Width::W1) => Value::Binary(arr.data().clone()),
                _ => Value::Array(Array::Typed(TypedArray::Numeric(arr))),
            });
        }

        if h & MASK_BOOL_OR_STRING_RESERVED != 0 {
            return Err(Error::unsupported(
                offset,
                format!("{:#010b} is neither a boolean nor a string array", h),
            ));
        }

        if h & STRING_ARRAY_BIT != 0 {
            let len = var_size::read_count(self.cursor, 1)?;
            let mut ss = Vec::with_capacity(len);
            for _ in 0..len {
                ss.push(self.read_bare_str()?);
            }
            Ok(Value::Array(Array::Typed(TypedArray::Text(ss))))
        } else {
            let len = var_size::read(self.cursor)?;
            let packed = self.cursor.offset();
            let nbytes = len / 8 + (len % 8 != 0) as u64;
            if nbytes > self.cursor.remaining() as u64 {
                return Err(Error::TruncatedInput {
                    offset: packed,
                    needed: std::cmp::min(nbytes, usize::max_value() as u64) as usize,
                    remaining: self.cursor.remaining(),
                });
            }
            let bs = self.cursor.read_slice(nbytes as usize)?;
            let len = len as usize;
            if len % 8 != 0 && bs[bs.len() - 1] >> (len % 8) != 0 {
                return Err(Error::unsupported(
                    packed + bs.len() - 1,
                    "unused bits of a boolean array must be zero",
                ));
            }
            let bools = (0..len).map(|i| bs[i / 8] & (1 << (i % 8)) != 0).collect();
            Ok(Value::Array(Array::Typed(TypedArray::Bool(bools))))
        }
    }
}

/// Reads one value from `cursor` with the given settings.
pub fn read_value(cursor: &mut ByteCursor, config: &DecodeConfig) -> Result<Value> {
    Decoder::new(cursor, config).read_value()
}

/// An iterator over the records of a delimited stream, as written by
/// [`encode_records`](super::encode_records).
///
/// Each item is one record. A delimiter after a record is consumed; the last record may
/// omit it. Iteration stops after the first error.
///
/// # Example
///
/// ```
/// use beve::{encoding::{encode_records, Records}, Value};
///
/// let bs = encode_records(&[Value::from(1), Value::from("two")]);
/// let records: Vec<Value> = Records::new(&bs).collect::<Result<_, _>>().unwrap();
/// assert_eq!(records, vec![Value::from(1), Value::from("two")]);
/// ```
#[derive(Debug)]
pub struct Records<'a> {
    cursor: ByteCursor<'a>,
    config: DecodeConfig,
    failed: bool,
}

impl<'a> Records<'a> {
    /// Records in `bytes`, with default settings.
    pub fn new(bytes: &'a [u8]) -> Self { Records::with_config(bytes, DecodeConfig::default()) }

    /// Records in `bytes`.
    pub fn with_config(bytes: &'a [u8], config: DecodeConfig) -> Self {
        Records {
            cursor: ByteCursor::new(bytes),
            config,
            failed: false,
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Result<Value>> {
        if self.failed || self.cursor.is_empty() {
            return None;
        }
        match read_value(&mut self.cursor, &self.config) {
            Ok(v) => {
                if let Ok(DELIMITER) = self.cursor.peek_u8() {
                    self.cursor.read_u8().ok();
                }
                Some(Ok(v))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(bs: &[u8]) -> Result<Value> { read_value(&mut ByteCursor::new(bs), &DecodeConfig::default()) }

    #[test]
    fn null_and_bools() {
        assert_eq!(read(&[0x00]).unwrap(), Value::Null);
        assert_eq!(read(&[0x08]).unwrap(), Value::Bool(false));
        assert_eq!(read(&[0x18]).unwrap(), Value::Bool(true));
        // value bit without the bool flag
        assert!(read(&[0x10]).is_err());
        assert!(read(&[0x20]).is_err());
    }

    #[test]
    fn reserved_numbers() {
        // kind 3
        assert!(read(&[0b000_11_001, 0]).is_err());
        // 32 byte width
        match read(&[0b101_00_001]) {
            Err(Error::UnsupportedEncoding { offset: 0, .. }) => (),
            other => panic!("{:?}", other),
        }
        assert!(read(&[0x07]).is_err());
    }

    #[test]
    fn signed_object_keys_sign_extend() {
        // signed 1-byte keys, one member: -1 => null
        let v = read(&[0b000_01_011, 1 << 2, 0xff, 0x00]).unwrap();
        match v {
            Value::Object(Object::Signed(m)) => assert_eq!(m.as_slice(), &[(-1, Value::Null)]),
            other => panic!("{:?}", other),
        }
        // string keys carry no width
        assert!(read(&[0b000_00_011, 0]).is_ok());
        match read(&[0b100_00_011, 0]) {
            Err(Error::UnsupportedEncoding { offset: 0, .. }) => (),
            other => panic!("{:?}", other),
        }
        // key kind 3
        assert!(read(&[0b000_11_011, 0]).is_err());
    }

    #[test]
    fn invalid_utf8() {
        match read(&[0x02, 2 << 2, 0xc3, 0x28]) {
            Err(Error::UnsupportedEncoding { offset: 2, .. }) => (),
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn bool_trailing_bits() {
        let h = header(TYPE_TYPED_ARRAY, KIND_BOOL_OR_STRING, 0);
        assert!(read(&[h, 3 << 2, 0b0000_0101]).is_ok());
        assert!(read(&[h, 3 << 2, 0b0000_1101]).is_err());
        // bits 6-7 set
        assert!(read(&[h | 0b0100_0000, 0]).is_err());
    }

    #[test]
    fn depth_limit() {
        // [[[]]]
        let bs = [0x05, 1 << 2, 0x05, 1 << 2, 0x05, 0];
        let mut cursor = ByteCursor::new(&bs);
        assert!(read_value(&mut cursor, &DecodeConfig::default().max_depth(3)).is_ok());
        let mut cursor = ByteCursor::new(&bs);
        match read_value(&mut cursor, &DecodeConfig::default().max_depth(2)) {
            Err(Error::UnsupportedEncoding { offset: 4, .. }) => (),
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn huge_counts_fail_cleanly() {
        // a generic array claiming 2^62 - 1 elements
        let bs = [0x05, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        match read(&bs) {
            Err(Error::TruncatedInput { .. }) => (),
            other => panic!("{:?}", other),
        }
        // a u64 typed array claiming 2^62 - 1 elements
        let mut bs = bs;
        bs[0] = header(TYPE_TYPED_ARRAY, 2, 3);
        assert!(read(&bs).is_err());
    }
}
