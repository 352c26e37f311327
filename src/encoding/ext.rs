//! The extension sub-protocol: everything behind major type 6.

use super::{
    constants::*,
    de::{num_kind_at, width_at, Decoder},
    ser::{Serializer, SerializerExt},
    var_size,
};
use crate::{
    config::EncodeConfig,
    errors::{Error, Result},
    extension::*,
    number::{NumKind, Number},
    typed::NumericArray,
};
use bytes::Bytes;
use tracing::warn;

/// Header byte of a complex number or complex array.
#[inline]
fn complex_header(kind: NumKind, index: u8, array: bool) -> u8 {
    (kind.bits() << 1) | (index << 3) | if array { COMPLEX_ARRAY_BIT } else { 0 }
}

/// Writes an extension, header included.
pub(crate) fn put_extension<S: Serializer>(out: &mut S, e: &Extension, cfg: &EncodeConfig) {
    match e {
        Extension::Delimiter => out.put_u8(DELIMITER),
        Extension::Variant(v) => {
            out.put_u8(ext_header(EXT_VARIANT));
            var_size::write(v.tag(), out);
            out.put_value(v.value(), cfg);
        }
        Extension::Matrix(m) => {
            out.put_u8(ext_header(EXT_MATRIX));
            out.put_u8(m.layout().byte());
            out.put_numeric(m.extents_array());
            out.put_numeric(m.data());
        }
        Extension::Complex(c) => {
            out.put_u8(ext_header(EXT_COMPLEX));
            match &c.0 {
                ComplexParts::One(re, im) => {
                    out.put_u8(complex_header(re.kind(), re.width().index(), false));
                    out.put_slice(&re.to_le_bytes());
                    out.put_slice(&im.to_le_bytes());
                }
                ComplexParts::Many(parts) => {
                    out.put_u8(complex_header(parts.kind(), parts.width().index(), true));
                    out.put_size(c.len());
                    out.put_slice(parts.data());
                }
            }
        }
        Extension::TypedObjectArray(toa) => {
            out.put_u8(ext_header(EXT_TYPED_OBJECT_ARRAY));
            out.put_size(toa.fields().len());
            for f in toa.fields() {
                out.put_bare_str(f);
            }
            out.put_size(toa.len());
            for row in toa.rows() {
                for v in row {
                    out.put_value(v, cfg);
                }
            }
        }
        Extension::Timestamp(t) => {
            out.put_u8(ext_header(EXT_TIMESTAMP));
            let flags = if t.tz_offset_minutes().is_some() {
                TIMESTAMP_HAS_TZ
            } else {
                0
            };
            out.put_u8(flags);
            out.put_slice(&t.seconds().to_le_bytes());
            out.put_slice(&t.nanos().to_le_bytes());
            if let Some(tz) = t.tz_offset_minutes() {
                out.put_slice(&tz.to_le_bytes());
            }
        }
        Extension::Duration(d) => {
            out.put_u8(ext_header(EXT_DURATION));
            out.put_slice(&d.seconds().to_le_bytes());
            out.put_slice(&d.nanos().to_le_bytes());
        }
        Extension::Uuid(u) => {
            out.put_u8(ext_header(EXT_UUID));
            out.put_u8(u.version());
            out.put_slice(u.as_bytes());
        }
    }
}

/// Moves a constructor's error to the offset of the extension header.
fn at(offset: usize, e: Error) -> Error {
    match e {
        Error::UnsupportedEncoding { reason, .. } => Error::UnsupportedEncoding { offset, reason },
        other => other,
    }
}

impl<'a, 'b> Decoder<'a, 'b> {
    /// Reads the payload of the extension with ID `id`, whose header sits at `offset`.
    pub(super) fn read_extension(&mut self, id: u8, offset: usize) -> Result<Extension> {
        match id {
            EXT_DELIMITER => Ok(Extension::Delimiter),
            EXT_VARIANT => self.nested(offset, |d| {
                let tag = var_size::read(d.cursor)?;
                let value = d.read_value()?;
                Ok(Extension::Variant(Variant::new(tag, value)?))
            }),
            EXT_MATRIX => {
                let layout_at = self.cursor.offset();
                let b = self.cursor.read_u8()?;
                let layout = Layout::from_byte(b).ok_or_else(|| {
                    Error::unsupported(layout_at, format!("matrix layout {} is reserved", b))
                })?;
                let extents = self.read_numeric_array()?;
                let data = self.read_numeric_array()?;
                let m = Matrix::from_parts(layout, extents, data).map_err(|e| at(offset, e))?;
                Ok(Extension::Matrix(m))
            }
            EXT_COMPLEX => self.read_complex().map(Extension::Complex),
            4..=7 => Err(Error::unsupported(
                offset,
                format!("extension {} is reserved", id),
            )),
            EXT_TYPED_OBJECT_ARRAY => self
                .nested(offset, |d| d.read_typed_objects())
                .map(Extension::TypedObjectArray),
            EXT_TIMESTAMP => {
                let flags_at = self.cursor.offset();
                let flags = self.cursor.read_u8()?;
                if flags & !TIMESTAMP_HAS_TZ != 0 {
                    return Err(Error::unsupported(
                        flags_at,
                        format!("timestamp flags {:#010b} has reserved bits set", flags),
                    ));
                }
                let (seconds, nanos) = self.read_seconds_nanos()?;
                let tz = if flags & TIMESTAMP_HAS_TZ != 0 {
                    Some(self.cursor.read_i16()?)
                } else {
                    None
                };
                Ok(Extension::Timestamp(Timestamp::from_parts(seconds, nanos, tz)))
            }
            EXT_DURATION => {
                let (seconds, nanos) = self.read_seconds_nanos()?;
                Ok(Extension::Duration(Duration::new(seconds, nanos as i64)))
            }
            EXT_UUID => {
                let version = self.cursor.read_u8()?;
                let mut bytes = [0u8; 16];
                bytes.copy_from_slice(self.cursor.read_slice(16)?);
                let u = Uuid::with_version(version, bytes);
                if !u.is_consistent() {
                    if self.config.strict_uuid {
                        return Err(Error::InconsistentUuid {
                            declared: version,
                            embedded: u.embedded_version(),
                        });
                    }
                    warn!(
                        offset,
                        declared = version,
                        embedded = u.embedded_version(),
                        "uuid version byte disagrees with its bytes"
                    );
                }
                Ok(Extension::Uuid(u))
            }
            _ => Err(Error::unsupported(
                offset,
                format!("extension {} is unassigned", id),
            )),
        }
    }

    /// Reads an `i64` of seconds and a `u32` of nanoseconds, checking the nanoseconds.
    fn read_seconds_nanos(&mut self) -> Result<(i64, u32)> {
        let seconds = self.cursor.read_i64()?;
        let nanos_at = self.cursor.offset();
        let nanos = self.cursor.read_u32()?;
        if nanos >= NANOS_PER_SEC {
            return Err(Error::unsupported(
                nanos_at,
                format!("{} nanoseconds is a second or more", nanos),
            ));
        }
        Ok((seconds, nanos))
    }

    fn read_complex(&mut self) -> Result<Complex> {
        let offset = self.cursor.offset();
        let h = self.cursor.read_u8()?;
        if h & MASK_COMPLEX_RESERVED != 0 {
            return Err(Error::unsupported(
                offset,
                format!("complex header {:#010b} has reserved bits set", h),
            ));
        }
        let kind = num_kind_at((h & MASK_COMPLEX_KIND) >> 1, offset)?;
        let width = width_at((h & MASK_COMPLEX_WIDTH) >> 3, offset)?;
        if h & COMPLEX_ARRAY_BIT == 0 {
            let re = Number::read_le(kind, width, self.cursor)?;
            let im = Number::read_le(kind, width, self.cursor)?;
            return Ok(Complex(ComplexParts::One(re, im)));
        }

        let len = var_size::read(self.cursor)?;
        let bytes = len
            .checked_mul(2 * width.bytes() as u64)
            .filter(|n| *n <= self.cursor.remaining() as u64)
            .ok_or_else(|| Error::TruncatedInput {
                offset: self.cursor.offset(),
                needed: std::cmp::min(
                    len.saturating_mul(2 * width.bytes() as u64),
                    usize::max_value() as u64,
                ) as usize,
                remaining: self.cursor.remaining(),
            })?;
        let data = self.cursor.read_slice(bytes as usize)?;
        let parts = NumericArray::from_raw(kind, width, Bytes::copy_from_slice(data))?;
        Ok(Complex(ComplexParts::Many(parts)))
    }

    fn read_typed_objects(&mut self) -> Result<TypedObjectArray> {
        let n_fields = var_size::read_count(self.cursor, 1)?;
        let mut fields = Vec::with_capacity(n_fields);
        for _ in 0..n_fields {
            let field_at = self.cursor.offset();
            let f = self.read_bare_str()?;
            if fields.contains(&f) {
                return Err(Error::unsupported(
                    field_at,
                    format!("field `{}` appears twice in an object array", f),
                ));
            }
            fields.push(f);
        }
        let rows_at = self.cursor.offset();
        let n_rows = var_size::read_count(self.cursor, n_fields)?;
        if n_fields == 0 && n_rows > 0 {
            return Err(Error::unsupported(
                rows_at,
                format!("{} rows of an object array without fields", n_rows),
            ));
        }
        let mut rows = Vec::with_capacity(n_rows);
        for _ in 0..n_rows {
            let mut row = Vec::with_capacity(n_fields);
            for _ in 0..n_fields {
                row.push(self.read_value()?);
            }
            rows.push(row);
        }
        Ok(TypedObjectArray::from_parts(fields, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        buffer::ByteCursor, config::DecodeConfig, encoding::read_value, Object, Value,
    };

    fn put(e: Extension) -> Vec<u8> {
        let mut out = Vec::new();
        put_extension(&mut out, &e, &EncodeConfig::default());
        out
    }

    fn get(bs: &[u8], cfg: &DecodeConfig) -> Result<Value> {
        read_value(&mut ByteCursor::new(bs), cfg)
    }

    fn roundtrip(e: Extension) -> Extension {
        match get(&put(e), &DecodeConfig::default()) {
            Ok(Value::Extension(e)) => e,
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn uuid() {
        let u: Uuid = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        let bs = put(Extension::Uuid(u));
        assert_eq!(bs[0], 0x5e);
        assert_eq!(bs[1], 4);
        assert_eq!(&bs[2..], u.as_bytes());
        assert_eq!(roundtrip(Extension::Uuid(u)), Extension::Uuid(u));
    }

    #[test]
    fn inconsistent_uuid() {
        let mut bytes = [0u8; 16];
        bytes[6] = 0x40;
        let bs = put(Extension::Uuid(Uuid::with_version(7, bytes)));

        match get(&bs, &DecodeConfig::default()) {
            Ok(Value::Extension(Extension::Uuid(u))) => assert!(!u.is_consistent()),
            other => panic!("{:?}", other),
        }
        match get(&bs, &DecodeConfig::default().strict_uuid(true)) {
            Err(Error::InconsistentUuid {
                declared: 7,
                embedded: 4,
            }) => (),
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn unassigned_uuid_version() {
        // version nibble and declared version agree, but 6 isn't a known version
        let mut bytes = [0u8; 16];
        bytes[6] = 0x60;
        let bs = put(Extension::Uuid(Uuid::with_version(6, bytes)));

        assert!(get(&bs, &DecodeConfig::default()).is_ok());
        match get(&bs, &DecodeConfig::default().strict_uuid(true)) {
            Err(Error::InconsistentUuid {
                declared: 6,
                embedded: 6,
            }) => (),
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn timestamps() {
        let t = Timestamp::new(1_697_550_000, 123_456_789);
        let bs = put(Extension::Timestamp(t));
        assert_eq!(bs.len(), 1 + 1 + 8 + 4);
        assert_eq!(bs[1], 0);
        assert_eq!(roundtrip(Extension::Timestamp(t)), Extension::Timestamp(t));

        let t = t.with_offset(-300);
        let bs = put(Extension::Timestamp(t));
        assert_eq!(bs.len(), 1 + 1 + 8 + 4 + 2);
        assert_eq!(bs[1], TIMESTAMP_HAS_TZ);
        assert_eq!(&bs[14..], &(-300i16).to_le_bytes());
        match roundtrip(Extension::Timestamp(t)) {
            Extension::Timestamp(back) => {
                assert_eq!(back.seconds(), 1_697_550_000);
                assert_eq!(back.nanos(), 123_456_789);
                assert_eq!(back.tz_offset_minutes(), Some(-300));
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn bad_nanos_and_flags() {
        let mut bs = put(Extension::Duration(Duration::new(1, 0)));
        bs[9..13].copy_from_slice(&NANOS_PER_SEC.to_le_bytes());
        match get(&bs, &DecodeConfig::default()) {
            Err(Error::UnsupportedEncoding { offset: 9, .. }) => (),
            other => panic!("{:?}", other),
        }

        let mut bs = put(Extension::Timestamp(Timestamp::new(0, 0)));
        bs[1] = 0b10;
        assert!(get(&bs, &DecodeConfig::default()).is_err());
    }

    #[test]
    fn matrix() {
        let data = NumericArray::from((1..=9).collect::<Vec<u16>>());
        let m = Matrix::new(Layout::RowMajor, &[3, 3], data).unwrap();
        let bs = put(Extension::Matrix(m.clone()));
        assert_eq!(bs[0], ext_header(EXT_MATRIX));
        assert_eq!(bs[1], 0);
        // extents: unsigned 8 byte typed array of two
        assert_eq!(bs[2], header(TYPE_TYPED_ARRAY, 2, 3));
        assert_eq!(bs[3], 2 << 2);
        match roundtrip(Extension::Matrix(m.clone())) {
            Extension::Matrix(back) => {
                assert_eq!(back, m);
                assert_eq!(back.get(&[2, 0]), Some(Number::from(7u16)));
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn matrix_shape_mismatch() {
        let mut out = vec![ext_header(EXT_MATRIX), 1];
        out.put_numeric(&NumericArray::from(vec![2u8, 2]));
        out.put_numeric(&NumericArray::from(vec![1.0f32, 2.0, 3.0]));
        match get(&out, &DecodeConfig::default()) {
            Err(Error::UnsupportedEncoding { offset: 0, .. }) => (),
            other => panic!("{:?}", other),
        }

        let mut out = vec![ext_header(EXT_MATRIX), 2];
        out.put_numeric(&NumericArray::from(vec![1u8]));
        out.put_numeric(&NumericArray::from(vec![1u8]));
        assert!(get(&out, &DecodeConfig::default()).is_err());
    }

    #[test]
    fn complex() {
        let one = Complex::new(1.5f64, -2.0f64).unwrap();
        let bs = put(Extension::Complex(one.clone()));
        // double, 8 bytes
        assert_eq!(bs[1], 0b000_011_00_0);
        assert_eq!(bs.len(), 2 + 16);
        assert_eq!(roundtrip(Extension::Complex(one.clone())), Extension::Complex(one));

        let many = Complex::from_pairs(&[(1i16, 2), (3, 4)]);
        let bs = put(Extension::Complex(many.clone()));
        assert_eq!(bs[1], 0b000_001_01_1);
        assert_eq!(bs[2], 2 << 2);
        assert_eq!(bs.len(), 3 + 8);
        assert_eq!(roundtrip(Extension::Complex(many.clone())), Extension::Complex(many));

        // parts of different types can't be built, so the encoder never sees them
        assert!(Complex::new(Number::from(1u8), Number::from(2.5f64)).is_err());
        assert!(Complex::from_interleaved(NumericArray::from(vec![1i32, 2, 3])).is_err());
        let even = Complex::from_interleaved(NumericArray::from(vec![1i32, 2, 3, 4])).unwrap();
        assert_eq!(roundtrip(Extension::Complex(even.clone())), Extension::Complex(even));

        // reserved bits
        let mut bs = put(Extension::Complex(Complex::new(1u8, 2u8).unwrap()));
        bs[1] |= 0x80;
        assert!(get(&bs, &DecodeConfig::default()).is_err());
    }

    #[test]
    fn typed_objects() {
        let rows: Vec<Value> = (0..3)
            .map(|i| {
                let mut o = Object::new();
                o.insert("id", i);
                o.insert("name", format!("row {}", i));
                Value::from(o)
            })
            .collect();
        let toa = TypedObjectArray::from_rows(&rows).unwrap();
        let bs = put(Extension::TypedObjectArray(toa.clone()));
        assert_eq!(bs[0], 0x46);
        assert_eq!(bs[1], 2 << 2);
        match roundtrip(Extension::TypedObjectArray(toa)) {
            Extension::TypedObjectArray(back) => assert_eq!(back.into_objects(), rows),
            other => panic!("{:?}", other),
        }

        // rows but no fields
        let bs = [ext_header(EXT_TYPED_OBJECT_ARRAY), 0, 2 << 2];
        match get(&bs, &DecodeConfig::default()) {
            Err(Error::UnsupportedEncoding { offset: 2, .. }) => (),
            other => panic!("{:?}", other),
        }
        let bs = [ext_header(EXT_TYPED_OBJECT_ARRAY), 0, 0];
        assert!(get(&bs, &DecodeConfig::default()).is_ok());
    }

    #[test]
    fn repeated_fields() {
        // fields ["a", "a"], one row [null, true]
        let bs = [
            ext_header(EXT_TYPED_OBJECT_ARRAY),
            2 << 2,
            1 << 2,
            b'a',
            1 << 2,
            b'a',
            1 << 2,
            NULL,
            TRUE,
        ];
        match get(&bs, &DecodeConfig::default()) {
            Err(Error::UnsupportedEncoding { offset: 4, .. }) => (),
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn variants_and_delimiters() {
        let v = Extension::variant(3, "circle").unwrap();
        let bs = put(v.clone());
        assert_eq!(bs[..2], [0x0e, 3 << 2]);
        assert_eq!(roundtrip(v.clone()), v);

        // the largest tag takes an eight byte SIZE
        let v = Extension::variant(var_size::MAX, Value::Null).unwrap();
        let bs = put(v.clone());
        assert_eq!(bs.len(), 1 + 8 + 1);
        assert_eq!(roundtrip(v.clone()), v);
        assert_eq!(put(Extension::Delimiter), vec![0x06]);
    }

    #[test]
    fn reserved_ids() {
        for id in (4..8).chain(12..32) {
            match get(&[ext_header(id)], &DecodeConfig::default()) {
                Err(Error::UnsupportedEncoding { offset: 0, .. }) => (),
                other => panic!("{}: {:?}", id, other),
            }
        }
    }
}
