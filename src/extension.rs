//! Values carried by the extension sub-protocol.

use crate::{
    encoding::var_size,
    errors::{Error, Result},
    number::{NumKind, Number},
    typed::{Element, NumericArray},
    util::checked_product,
    vecmap::VecMap,
    Object, Value,
};
use std::{
    convert::TryFrom,
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// An extension value; the header's upper five bits select which one.
#[derive(Clone, Debug, PartialEq)]
pub enum Extension {
    /// A record boundary in a stream; carries nothing.
    Delimiter,
    Variant(Variant),
    Matrix(Matrix),
    Complex(Complex),
    TypedObjectArray(TypedObjectArray),
    Timestamp(Timestamp),
    Duration(Duration),
    Uuid(Uuid),
}

impl Extension {
    /// Builds a variant extension; see [`Variant::new`].
    pub fn variant<V: Into<Value>>(tag: u64, value: V) -> Result<Extension> {
        Variant::new(tag, value).map(Extension::Variant)
    }
}

/// A member of a discriminated union. The tag indexes a type list agreed on outside
/// the format, and goes on the wire as a SIZE.
///
/// # Example
///
/// ```
/// use beve::{extension::Variant, Value};
///
/// let v = Variant::new(3, "circle").unwrap();
/// assert_eq!(v.tag(), 3);
/// assert_eq!(v.value(), &Value::from("circle"));
///
/// assert!(Variant::new(1 << 62, Value::Null).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    tag: u64,
    value: Box<Value>,
}

impl Variant {
    /// Builds a variant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOutOfRange`] if `tag` is above [`var_size::MAX`].
    pub fn new<V: Into<Value>>(tag: u64, value: V) -> Result<Variant> {
        if tag > var_size::MAX {
            return Err(Error::SizeOutOfRange { value: tag });
        }
        Ok(Variant {
            tag,
            value: Box::new(value.into()),
        })
    }

    /// Builds a variant from a 32-bit index, which always fits.
    pub fn with_index<V: Into<Value>>(index: u32, value: V) -> Variant {
        Variant {
            tag: index as u64,
            value: Box::new(value.into()),
        }
    }

    /// The tag.
    pub fn tag(&self) -> u64 { self.tag }

    /// The payload.
    pub fn value(&self) -> &Value { &self.value }

    /// Consumes the variant, returning its tag and payload.
    pub fn into_parts(self) -> (u64, Value) { (self.tag, *self.value) }
}

/// Storage order of a matrix's data.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Layout {
    RowMajor,
    ColMajor,
}

impl Layout {
    /// The layout byte.
    pub fn byte(self) -> u8 {
        match self {
            Layout::RowMajor => 0,
            Layout::ColMajor => 1,
        }
    }

    /// Reads a layout byte.
    pub fn from_byte(b: u8) -> Option<Layout> {
        match b {
            0 => Some(Layout::RowMajor),
            1 => Some(Layout::ColMajor),
            _ => None,
        }
    }
}

/// A dense matrix (or higher-rank tensor): extents plus a flat numeric array.
///
/// # Example
///
/// ```
/// use beve::{extension::{Layout, Matrix}, number::Number, typed::NumericArray};
///
/// let m = Matrix::new(Layout::RowMajor, &[2, 3], NumericArray::from(vec![1i32, 2, 3, 4, 5, 6]))
///     .unwrap();
/// assert_eq!(m.get(&[1, 0]), Some(Number::from(4i32)));
///
/// // the data has to fill the extents exactly
/// assert!(Matrix::new(Layout::RowMajor, &[2, 2], NumericArray::from(vec![1i32])).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    layout: Layout,
    extents: NumericArray,
    data: NumericArray,
}

impl Matrix {
    /// Builds a matrix, checking that the data fills the extents.
    pub fn new(layout: Layout, extents: &[u64], data: NumericArray) -> Result<Matrix> {
        let extents = NumericArray::from_slice(extents);
        Matrix::from_parts(layout, extents, data).map_err(|e| match e {
            Error::UnsupportedEncoding { reason, .. } => Error::InvalidValueForTypedArray(reason),
            other => other,
        })
    }

    /// Shared by the constructor and the decoder, which report a mismatch differently.
    pub(crate) fn from_parts(
        layout: Layout,
        extents: NumericArray,
        data: NumericArray,
    ) -> Result<Matrix> {
        let dims = match extents.to_u64_vec() {
            Some(d) if extents.kind() == NumKind::Unsigned => d,
            _ => return Err(Error::unsupported(0, "matrix extents must be unsigned integers")),
        };
        match checked_product(&dims) {
            Some(n) if n == data.len() as u64 => Ok(Matrix {
                layout,
                extents,
                data,
            }),
            _ => Err(Error::unsupported(
                0,
                format!(
                    "matrix extents {:?} don't match {} data elements",
                    dims,
                    data.len()
                ),
            )),
        }
    }

    /// Storage order.
    pub fn layout(&self) -> Layout { self.layout }

    /// The extents as stored.
    pub fn extents_array(&self) -> &NumericArray { &self.extents }

    /// The extents.
    pub fn extents(&self) -> Vec<u64> { self.extents.to_u64_vec().unwrap_or_default() }

    /// The flat data.
    pub fn data(&self) -> &NumericArray { &self.data }

    /// The element at a multi-dimensional index, honouring the layout.
    pub fn get(&self, index: &[usize]) -> Option<Number> {
        let extents = self.extents();
        if index.len() != extents.len() {
            return None;
        }
        let mut flat = 0usize;
        let mut stride = 1usize;
        let mut step = |i: usize, e: u64| -> Option<()> {
            if i as u64 >= e {
                return None;
            }
            flat += i * stride;
            stride *= e as usize;
            Some(())
        };
        match self.layout {
            // last index varies fastest
            Layout::RowMajor => {
                for (i, e) in index.iter().zip(extents.iter()).rev() {
                    step(*i, *e)?;
                }
            }
            Layout::ColMajor => {
                for (i, e) in index.iter().zip(extents.iter()) {
                    step(*i, *e)?;
                }
            }
        }
        self.data.get(flat)
    }
}

/// A complex number, or an array of them. Both parts always share one kind and width.
#[derive(Clone, Debug, PartialEq)]
pub struct Complex(pub(crate) ComplexParts);

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ComplexParts {
    /// Real and imaginary parts.
    One(Number, Number),
    /// Interleaved `re, im` pairs; always an even number of parts.
    Many(NumericArray),
}

impl Complex {
    /// Builds a single complex number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValueForTypedArray`] if the parts differ in kind or width.
    pub fn new<N: Into<Number>>(re: N, im: N) -> Result<Complex> {
        let (re, im) = (re.into(), im.into());
        if re.kind() != im.kind() || re.width() != im.width() {
            return Err(Error::InvalidValueForTypedArray(
                "both parts of a complex number need the same type".into(),
            ));
        }
        Ok(Complex(ComplexParts::One(re, im)))
    }

    /// Builds an array of complex numbers from `(re, im)` pairs.
    pub fn from_pairs<T: Element>(pairs: &[(T, T)]) -> Complex {
        let flat: Vec<T> = pairs.iter().flat_map(|(re, im)| vec![*re, *im]).collect();
        Complex(ComplexParts::Many(NumericArray::from_slice(&flat)))
    }

    /// Builds an array of complex numbers from interleaved parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValueForTypedArray`] if there is an odd number of parts.
    pub fn from_interleaved(parts: NumericArray) -> Result<Complex> {
        if parts.len() % 2 != 0 {
            return Err(Error::InvalidValueForTypedArray(
                "complex arrays need an even number of parts".into(),
            ));
        }
        Ok(Complex(ComplexParts::Many(parts)))
    }

    /// Number of complex values.
    pub fn len(&self) -> usize {
        match &self.0 {
            ComplexParts::One(..) => 1,
            ComplexParts::Many(parts) => parts.len() / 2,
        }
    }

    /// Indicates whether this is an empty complex array.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// The `i`th complex value.
    pub fn get(&self, i: usize) -> Option<(Number, Number)> {
        match &self.0 {
            ComplexParts::One(re, im) if i == 0 => Some((*re, *im)),
            ComplexParts::One(..) => None,
            ComplexParts::Many(parts) => Some((parts.get(2 * i)?, parts.get(2 * i + 1)?)),
        }
    }

    /// Indicates whether this is an array, even one of length one.
    pub fn is_array(&self) -> bool {
        match self.0 {
            ComplexParts::One(..) => false,
            ComplexParts::Many(_) => true,
        }
    }
}

/// An array of objects that all share one set of string keys, stored once.
///
/// # Example
///
/// ```
/// use beve::{extension::TypedObjectArray, Object, Value};
///
/// let mut a = Object::new();
/// a.insert("y", 1);
/// a.insert("x", 2);
/// let mut b = Object::new();
/// b.insert("x", 3);
/// b.insert("y", 4);
///
/// let toa = TypedObjectArray::from_rows(&[Value::from(a), Value::from(b)]).unwrap();
/// assert_eq!(toa.fields(), &["x".to_string(), "y".to_string()]);
/// assert_eq!(toa.rows()[0], vec![Value::from(2), Value::from(1)]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TypedObjectArray {
    fields: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TypedObjectArray {
    /// Builds the schema-compressed form of an array of objects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaMismatch`] unless there is at least one element, every
    /// element is a string-keyed object with at least one key, and all of them have the
    /// same sorted key set.
    pub fn from_rows(rows: &[Value]) -> Result<TypedObjectArray> {
        let mismatch = |row: usize, expected: &[String], found: Vec<String>| Error::SchemaMismatch {
            row,
            expected: expected.to_vec(),
            found,
        };

        let mut fields: Option<Vec<String>> = None;
        let mut out = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let map = match row {
                Value::Object(Object::Text(m)) => m,
                _ => {
                    return Err(mismatch(
                        i,
                        fields.as_ref().map_or(&[][..], |f| f.as_slice()),
                        vec![],
                    ))
                }
            };
            let keys = map.sorted_keys();
            let fields = fields.get_or_insert_with(|| keys.clone());
            if keys.is_empty() || *fields != keys || keys.windows(2).any(|w| w[0] == w[1]) {
                return Err(mismatch(i, &fields[..], keys));
            }
            out.push(
                fields
                    .iter()
                    .map(|f| map.get(f.as_str()).cloned().unwrap_or(Value::Null))
                    .collect(),
            );
        }

        match fields {
            Some(fields) => Ok(TypedObjectArray { fields, rows: out }),
            None => Err(mismatch(0, &[], vec![])),
        }
    }

    /// Assembles the extension from its stored parts.
    pub(crate) fn from_parts(fields: Vec<String>, rows: Vec<Vec<Value>>) -> TypedObjectArray {
        debug_assert!(rows.iter().all(|r| r.len() == fields.len()));
        TypedObjectArray { fields, rows }
    }

    /// The shared field names.
    pub fn fields(&self) -> &[String] { &self.fields }

    /// Each row's values, in field order.
    pub fn rows(&self) -> &[Vec<Value>] { &self.rows }

    /// Number of objects.
    pub fn len(&self) -> usize { self.rows.len() }

    /// Indicates whether there are no rows.
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Rebuilds the row at `i` as an object.
    pub fn object(&self, i: usize) -> Option<Object> {
        let row = self.rows.get(i)?;
        Some(Object::Text(VecMap::from_pairs_unchecked(
            self.fields.iter().cloned().zip(row.iter().cloned()).collect(),
        )))
    }

    /// Rebuilds one object per row.
    pub fn into_objects(self) -> Vec<Value> {
        let fields = self.fields;
        self.rows
            .into_iter()
            .map(|row| {
                Value::Object(Object::Text(VecMap::from_pairs_unchecked(
                    fields.iter().cloned().zip(row).collect(),
                )))
            })
            .collect()
    }
}

/// A point in time: seconds and nanoseconds since the Unix epoch, with an optional UTC
/// offset in minutes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Timestamp {
    seconds: i64,
    nanos: u32,
    tz_offset_minutes: Option<i16>,
}

/// Folds any whole seconds in `nanos` into `seconds` so that nanos ends up in
/// `[0, 999_999_999]`.
fn normalize(seconds: i64, nanos: i64) -> (i64, u32) {
    let carry = nanos.div_euclid(NANOS_PER_SEC);
    (
        seconds.saturating_add(carry),
        nanos.rem_euclid(NANOS_PER_SEC) as u32,
    )
}

impl Timestamp {
    /// A UTC timestamp. Out of range nanoseconds are carried into the seconds.
    ///
    /// # Example
    ///
    /// ```
    /// use beve::extension::Timestamp;
    ///
    /// let t = Timestamp::new(10, -1);
    /// assert_eq!((t.seconds(), t.nanos()), (9, 999_999_999));
    /// ```
    pub fn new(seconds: i64, nanos: i64) -> Timestamp {
        let (seconds, nanos) = normalize(seconds, nanos);
        Timestamp {
            seconds,
            nanos,
            tz_offset_minutes: None,
        }
    }

    /// The same instant with a UTC offset attached.
    pub fn with_offset(self, minutes: i16) -> Timestamp {
        Timestamp {
            tz_offset_minutes: Some(minutes),
            ..self
        }
    }

    /// Assembles a timestamp from already-validated wire fields.
    pub(crate) fn from_parts(seconds: i64, nanos: u32, tz: Option<i16>) -> Timestamp {
        debug_assert!(nanos < NANOS_PER_SEC as u32);
        Timestamp {
            seconds,
            nanos,
            tz_offset_minutes: tz,
        }
    }

    /// Seconds since the epoch.
    pub fn seconds(&self) -> i64 { self.seconds }

    /// Sub-second nanoseconds.
    pub fn nanos(&self) -> u32 { self.nanos }

    /// UTC offset in minutes, if one was recorded.
    pub fn tz_offset_minutes(&self) -> Option<i16> { self.tz_offset_minutes }

    /// Converts to a [`SystemTime`], dropping the offset.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        let d = std::time::Duration::new(self.seconds.unsigned_abs(), 0);
        let whole = if self.seconds >= 0 {
            UNIX_EPOCH.checked_add(d)?
        } else {
            UNIX_EPOCH.checked_sub(d)?
        };
        whole.checked_add(std::time::Duration::from_nanos(self.nanos as u64))
    }
}

impl From<SystemTime> for Timestamp {
    fn from(t: SystemTime) -> Timestamp {
        match t.duration_since(UNIX_EPOCH) {
            Ok(d) => Timestamp::new(d.as_secs() as i64, d.subsec_nanos() as i64),
            Err(e) => {
                let d = e.duration();
                Timestamp::new(-(d.as_secs() as i64), -(d.subsec_nanos() as i64))
            }
        }
    }
}

/// A signed span of time.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Duration {
    seconds: i64,
    nanos: u32,
}

impl Duration {
    /// Builds a duration. Out of range nanoseconds are carried into the seconds, so
    /// `Duration::new(0, -1)` is one nanosecond short of zero.
    pub fn new(seconds: i64, nanos: i64) -> Duration {
        let (seconds, nanos) = normalize(seconds, nanos);
        Duration { seconds, nanos }
    }

    /// Whole seconds, rounded towards negative infinity.
    pub fn seconds(&self) -> i64 { self.seconds }

    /// Nanoseconds on top of [`Duration::seconds`].
    pub fn nanos(&self) -> u32 { self.nanos }

    /// Indicates whether the span is negative.
    pub fn is_negative(&self) -> bool { self.seconds < 0 }
}

impl From<std::time::Duration> for Duration {
    fn from(d: std::time::Duration) -> Duration {
        Duration::new(d.as_secs() as i64, d.subsec_nanos() as i64)
    }
}

impl TryFrom<Duration> for std::time::Duration {
    type Error = Error;

    fn try_from(d: Duration) -> Result<std::time::Duration> {
        if d.is_negative() {
            return Err(Error::Conversion(
                "a negative duration has no std::time::Duration".into(),
            ));
        }
        Ok(std::time::Duration::new(d.seconds as u64, d.nanos))
    }
}

/// A UUID: a version byte followed by the 16 raw bytes.
///
/// The version byte is meant to repeat the version nibble embedded in byte 6. Decoding
/// keeps a UUID whose two disagree; [`Uuid::is_consistent`] tells them apart.
///
/// # Example
///
/// ```
/// use beve::extension::Uuid;
///
/// let u: Uuid = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
/// assert_eq!(u.version(), 4);
/// assert!(u.is_consistent());
/// assert_eq!(u.to_string(), "550e8400-e29b-41d4-a716-446655440000");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Uuid {
    version: u8,
    bytes: [u8; 16],
}

impl Uuid {
    /// Wraps raw bytes, taking the version from the embedded nibble.
    pub fn from_bytes(bytes: [u8; 16]) -> Uuid {
        Uuid {
            version: bytes[6] >> 4,
            bytes,
        }
    }

    /// Wraps raw bytes with an explicit version byte, consistent or not.
    pub fn with_version(version: u8, bytes: [u8; 16]) -> Uuid { Uuid { version, bytes } }

    /// The version byte.
    pub fn version(&self) -> u8 { self.version }

    /// The version nibble inside byte 6.
    pub fn embedded_version(&self) -> u8 { self.bytes[6] >> 4 }

    /// Indicates whether the version byte is one of 1 to 5 and agrees with the embedded
    /// version.
    pub fn is_consistent(&self) -> bool {
        (1..=5).contains(&self.version) && self.version == self.embedded_version()
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] { &self.bytes }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, b) in self.bytes.iter().enumerate() {
            if i == 4 || i == 6 || i == 8 || i == 10 {
                write!(f, "-")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Uuid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Uuid> {
        let hex: Vec<u8> = s.bytes().filter(|b| *b != b'-').collect();
        if hex.len() != 32 {
            return Err(Error::Conversion(format!("`{}` is not a uuid", s)));
        }
        let mut bytes = [0u8; 16];
        for (i, pair) in hex.chunks(2).enumerate() {
            let digits = std::str::from_utf8(pair)
                .map_err(|_| Error::Conversion(format!("`{}` is not a uuid", s)))?;
            bytes[i] = u8::from_str_radix(digits, 16)
                .map_err(|_| Error::Conversion(format!("`{}` is not a uuid", s)))?;
        }
        Ok(Uuid::from_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_indexing() {
        let data = NumericArray::from(vec![1u8, 2, 3, 4, 5, 6]);
        let col = Matrix::new(Layout::ColMajor, &[2, 3], data).unwrap();
        // column-major: [[1, 3, 5], [2, 4, 6]]
        assert_eq!(col.get(&[0, 1]), Some(Number::from(3u8)));
        assert_eq!(col.get(&[1, 2]), Some(Number::from(6u8)));
        assert_eq!(col.get(&[2, 0]), None);
        assert_eq!(col.get(&[0]), None);
        assert_eq!(col.extents(), vec![2, 3]);
    }

    #[test]
    fn complex_parts_must_agree() {
        assert!(Complex::new(1.0f32, 2.0f32).is_ok());
        assert!(Complex::new(Number::from(1.0f32), Number::from(2.0f64)).is_err());

        let many = Complex::from_pairs(&[(1.0f64, -1.0), (2.0, -2.0)]);
        assert_eq!(many.len(), 2);
        assert_eq!(many.get(1), Some((Number::from(2.0), Number::from(-2.0))));
        assert_eq!(many.get(2), None);
        assert!(Complex::from_interleaved(NumericArray::from(vec![1.0f32])).is_err());
    }

    #[test]
    fn schema_mismatch() {
        let mut a = Object::new();
        a.insert("x", 1);
        let mut b = Object::new();
        b.insert("x", 1);
        b.insert("y", 2);
        match TypedObjectArray::from_rows(&[Value::from(a.clone()), Value::from(b)]) {
            Err(Error::SchemaMismatch {
                row,
                expected,
                found,
            }) => {
                assert_eq!(row, 1);
                assert_eq!(expected, vec!["x".to_string()]);
                assert_eq!(found, vec!["x".to_string(), "y".to_string()]);
            }
            other => panic!("{:?}", other),
        }
        assert!(TypedObjectArray::from_rows(&[]).is_err());
        assert!(TypedObjectArray::from_rows(&[Value::from(a), Value::from(1)]).is_err());
    }

    #[test]
    fn time_normalization() {
        let d = Duration::new(0, -1);
        assert_eq!((d.seconds(), d.nanos()), (-1, 999_999_999));
        assert!(d.is_negative());
        assert!(std::time::Duration::try_from(d).is_err());

        let d = Duration::from(std::time::Duration::new(5, 7));
        assert_eq!(std::time::Duration::try_from(d).unwrap(), std::time::Duration::new(5, 7));

        let t = Timestamp::new(1_697_550_000, 2_123_456_789).with_offset(-300);
        assert_eq!(t.seconds(), 1_697_550_002);
        assert_eq!(t.nanos(), 123_456_789);
        assert_eq!(t.tz_offset_minutes(), Some(-300));

        let now = SystemTime::now();
        assert_eq!(Timestamp::from(now).to_system_time(), Some(now));
    }

    #[test]
    fn uuid_versions() {
        let mut bytes = [0u8; 16];
        bytes[6] = 0x41;
        let u = Uuid::with_version(1, bytes);
        assert!(!u.is_consistent());
        assert_eq!(u.embedded_version(), 4);
        assert!("not-a-uuid".parse::<Uuid>().is_err());

        // versions outside 1 to 5 never count as consistent
        bytes[6] = 0x61;
        assert!(!Uuid::from_bytes(bytes).is_consistent());
        assert!(!Uuid::from_bytes([0; 16]).is_consistent());
        bytes[6] = 0x51;
        assert!(Uuid::from_bytes(bytes).is_consistent());
    }

    #[test]
    fn variant_tags_fit_a_size() {
        assert_eq!(Variant::new(var_size::MAX, Value::Null).unwrap().tag(), var_size::MAX);
        match Variant::new(1 << 62, Value::Null) {
            Err(Error::SizeOutOfRange { value }) => assert_eq!(value, 1 << 62),
            other => panic!("{:?}", other),
        }
        assert!(Extension::variant(u64::max_value(), true).is_err());
        assert_eq!(Variant::with_index(u32::max_value(), true).tag(), u32::max_value() as u64);
    }
}
