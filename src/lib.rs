//! # BEVE
//!
//! BEVE (Binary Efficient Versatile Encoding) is a tagged, little-endian binary format
//! for JSON-like data, with first-class support for typed numeric arrays, matrices,
//! complex numbers, timestamps and other common scientific payloads.
//!
//! # Usage
//!
//! The trait [`BeveRep`] is used to specify how data is converted into a [`Value`].
//!
//! This trait can usually be auto-derived, and then it's ready for serialization.
//!
//! For example:
//!
//! ```
//! use beve::prelude::*;
//!
//! #[derive(Clone, Debug, BeveRep, PartialEq)]
//! /// Shapes, for the sake of an example.
//! enum Shape {
//!     Empty,
//!     Circle(f64),
//!     Rect { w: u32, h: u32 },
//! }
//!
//! let shape = Shape::Rect { w: 3, h: 4 };
//!
//! // encode
//! let encoded = encode_full(&shape.to_beve());
//!
//! // and decode again
//! let decoded = Shape::from_beve(decode_full(&encoded).unwrap()).unwrap();
//!
//! assert_eq!(shape, decoded);
//! ```
//!
//! # An overview of BEVE types
//!
//! ## Numbers
//!
//! Every number carries its kind (float, signed, unsigned) and its width (1, 2, 4, 8 or
//! 16 bytes) and decodes back to exactly that. See [`Number`], [`Inum`] and [`Float`].
//!
//! ```
//! use beve::prelude::*;
//!
//! let small = Value::from(23u8);
//! let wide = Value::from(-99999999999999999999i128);
//! let half = Value::from(f16::from_f32(1.0));
//!
//! // equality is by value, not representation
//! assert_eq!(Value::from(1u8), Value::from(1.0f64));
//! ```
//!
//! ## Strings and binary
//!
//! [`Value::Text`] holds UTF-8. [`Value::Binary`] holds opaque bytes and goes on the
//! wire as a typed array of `u8`.
//!
//! ## Objects
//!
//! Objects map keys to values. All keys of one object are strings, or all are integers.
//!
//! ```
//! use beve::prelude::*;
//!
//! let mut obj = Object::new();
//! obj.insert("pi", 3.14);
//! obj.insert("e", 2.72);
//! assert_eq!(obj.get("e"), Some(&Value::from(2.72)));
//! ```
//!
//! ## Arrays
//!
//! A generic array holds any values. A typed array ([`TypedArray`]) holds numbers of one
//! kind and width, booleans, or strings, behind a single header. The encoder writes
//! generic arrays in the typed form whenever their elements allow it.
//!
//! ```
//! use beve::prelude::*;
//!
//! let generic = Value::from(vec![1u16, 2, 3]);
//! let typed = Value::from(NumericArray::from(vec![1u16, 2, 3]));
//!
//! assert_eq!(encode_full(&generic), encode_full(&typed));
//! assert_eq!(generic, typed);
//! ```
//!
//! ## Extensions
//!
//! See [`Extension`]: variants (tagged unions), matrices, complex numbers, arrays of
//! same-shaped objects, timestamps, durations and UUIDs.
//!
//! # Wire format
//!
//! ## Headers
//!
//! Every value starts with a one-byte *header*. The low three bits are the *major type*:
//!
//! | Bits  | Major type       |
//! | ---   | ---              |
//! | `000` | null and boolean |
//! | `001` | number           |
//! | `010` | string           |
//! | `011` | object           |
//! | `100` | typed array      |
//! | `101` | generic array    |
//! | `110` | extension        |
//! | `111` | reserved         |
//!
//! ## Null and booleans
//!
//! `0x00` is null. A boolean sets bit 3, and bit 4 holds its value.
//!
//! ## Numbers
//!
//! | xxx                   | xx                                 | 001  |
//! | ---                   | ---                                | ---  |
//! | Byte count index      | Float (0), signed (1), unsigned (2) | Type |
//!
//! The byte count is `1 << index`, so indices 0 to 4 give 1 to 16 bytes. The payload
//! follows in little-endian order.
//!
//! ## SIZE
//!
//! Lengths and counts are written as a SIZE: the low two bits of the first byte say
//! whether the SIZE takes 1, 2, 4 or 8 bytes, and the value is the little-endian whole
//! shifted right by two. SIZEs go up to `2^62 - 1`.
//!
//! ## Strings
//!
//! Header, SIZE (the byte count), then the UTF-8 bytes.
//!
//! ## Objects
//!
//! | xxx                   | xx                                      | 011  |
//! | ---                   | ---                                     | ---  |
//! | Key byte count index  | String (0), signed (1), unsigned (2) keys | Type |
//!
//! Then a SIZE counting the members, and each member as a key without a header followed
//! by a value with one. String keys are `SIZE | bytes`.
//!
//! ## Typed arrays
//!
//! Numeric typed arrays use the same kind and width bits as numbers. Kind 3 marks a
//! boolean (bit 5 clear) or string (bit 5 set) array. Then a SIZE counting the elements,
//! and the elements without headers. Booleans pack eight to a byte, least significant
//! bit first.
//!
//! ## Generic arrays
//!
//! Header, SIZE, then each element with its own header.
//!
//! ## Extensions
//!
//! The upper five bits of the header select the extension; see
//! [`encoding::constants`].

#![warn(
//    missing_docs,
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_debug_implementations,
    macro_use_extern_crate,
    trivial_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::len_without_is_empty)]

extern crate self as beve;

/// Procedural macros for autoderiving [`BeveRep`].
pub extern crate beve_macro;

#[macro_use]
pub mod errors;
#[macro_use]
pub mod util;

pub mod buffer;
pub mod config;
pub mod encoding;
pub mod extension;
pub mod float;
pub mod inum;
#[cfg(feature = "json")]
pub mod json;
pub mod number;
pub mod prelude;
pub mod rep;
pub mod typed;
pub mod vecmap;

use crate::{
    errors::Result,
    extension::{
        Complex, Duration, Extension, Matrix, Timestamp, TypedObjectArray, Uuid, Variant,
    },
    float::Float,
    inum::Inum,
    number::Number,
    rep::BeveRep,
    typed::{NumericArray, TypedArray},
    vecmap::VecMap,
};
use bytes::Bytes;
use half::f16;
use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

#[derive(Clone, Debug)]
/// [`Value`] and its variants.
///
/// Equality is semantic rather than structural: numbers compare by value, and arrays
/// compare element by element whatever their representation. A [`Value::Binary`], a
/// typed `u8` array and a generic array of the same small numbers are all equal.
///
/// # Example
///
/// ```
/// use beve::prelude::*;
///
/// let b = Value::Bool(true);
///
/// let val = match b {
///     Value::Bool(b) => b,
///     _ => panic!(),
/// };
///
/// assert!(val);
/// ```
pub enum Value {
    /// Null. Corresponds to [`None`].
    Null,
    /// Boolean.
    Bool(bool),
    /// A number of any kind and width.
    ///
    /// # Example
    ///
    /// ```
    /// use beve::prelude::*;
    ///
    /// let n = Value::Number(Number::from(7u16));
    /// assert_eq!(n.to_number().unwrap().width(), beve::number::Width::W2);
    /// ```
    Number(Number),
    /// UTF-8 string.
    Text(String),
    /// Opaque bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use beve::prelude::*;
    ///
    /// let blob = Value::Binary(Bytes::from_static(b"\x00\x01"));
    /// ```
    Binary(Bytes),
    /// Object.
    Object(Object),
    /// Array, generic or typed.
    Array(Array),
    /// Extension.
    Extension(Extension),
}

use Value::*;

impl Value {
    /// Indicates whether a value is [`Null`].
    ///
    /// # Example
    ///
    /// ```
    /// use beve::Value::Null;
    ///
    /// assert!(Null.is_null());
    /// ```
    pub fn is_null(&self) -> bool {
        match self {
            Null => true,
            _ => false,
        }
    }

    /// Tries to convert a value to a [`bool`].
    /// This will return an [`Error`] if the value is not a [`Value::Bool`].
    pub fn to_bool(&self) -> Result<bool> {
        match self {
            Bool(b) => Ok(*b),
            _ => bail_conversion!("value is not a `Bool`"),
        }
    }

    /// Tries to get the [`Number`] inside a value.
    pub fn to_number(&self) -> Result<&Number> {
        match self {
            Number(n) => Ok(n),
            _ => bail_conversion!("value is not a `Number`"),
        }
    }

    /// Tries to get the string inside a value.
    ///
    /// # Example
    ///
    /// ```
    /// use beve::Value;
    ///
    /// assert_eq!(Value::from("hi").to_str().unwrap(), "hi");
    /// assert!(Value::from(1).to_str().is_err());
    /// ```
    pub fn to_str(&self) -> Result<&str> {
        match self {
            Text(s) => Ok(s),
            _ => bail_conversion!("value is not `Text`"),
        }
    }

    /// Tries to get the bytes inside a [`Value::Binary`].
    pub fn to_bytes(&self) -> Result<&Bytes> {
        match self {
            Binary(b) => Ok(b),
            _ => bail_conversion!("value is not `Binary`"),
        }
    }

    /// Tries to get the object inside a value.
    pub fn to_object(&self) -> Result<&Object> {
        match self {
            Object(o) => Ok(o),
            _ => bail_conversion!("value is not an `Object`"),
        }
    }

    /// Consumes a value, returning the object inside it.
    pub fn into_object(self) -> Result<Object> {
        match self {
            Object(o) => Ok(o),
            _ => bail_conversion!("value is not an `Object`"),
        }
    }

    /// Tries to get the extension inside a value.
    pub fn to_extension(&self) -> Result<&Extension> {
        match self {
            Extension(e) => Ok(e),
            _ => bail_conversion!("value is not an `Extension`"),
        }
    }

    /// The elements of anything array-like: generic and typed arrays, binary blobs
    /// (as `u8` numbers) and typed object arrays (as objects).
    ///
    /// # Example
    ///
    /// ```
    /// use beve::prelude::*;
    ///
    /// let blob = Value::Binary(Bytes::from_static(&[1, 2]));
    /// assert_eq!(blob.elements().unwrap().as_ref(), &[Value::from(1u8), Value::from(2u8)]);
    /// assert!(Value::Null.elements().is_none());
    /// ```
    pub fn elements(&self) -> Option<Cow<[Value]>> {
        match self {
            Array(a) => Some(a.values()),
            Binary(b) => Some(Cow::Owned(b.iter().map(|x| Value::from(*x)).collect())),
            Extension(self::Extension::TypedObjectArray(t)) => {
                Some(Cow::Owned(t.clone().into_objects()))
            }
            _ => None,
        }
    }

    /// Consumes a value, converting anything array-like into a vector of values.
    /// This will return an [`Error`] otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use beve::prelude::*;
    ///
    /// let ks = Value::from(vec![1, 2, 3]);
    /// assert_eq!(ks.into_vec().unwrap().len(), 3);
    /// ```
    pub fn into_vec(self) -> Result<Vec<Value>> {
        match self {
            Array(a) => Ok(a.into_values()),
            Extension(self::Extension::TypedObjectArray(t)) => Ok(t.into_objects()),
            other => match other.elements() {
                Some(els) => Ok(els.into_owned()),
                None => bail_conversion!("value is not an array"),
            },
        }
    }

    /// Consumes a value, converting it to a value of type `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use beve::prelude::*;
    ///
    /// let num: u8 = Value::from(1u8).into_rep().unwrap();
    /// assert_eq!(num, 1);
    /// ```
    pub fn into_rep<T: BeveRep>(self) -> Result<T> { T::from_beve(self) }

    /// Name of the variant, for error messages.
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Null => "null",
            Bool(_) => "bool",
            Number(_) => "number",
            Text(_) => "text",
            Binary(_) => "binary",
            Object(_) => "object",
            Array(_) => "array",
            Extension(_) => "extension",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Number(a), Number(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Binary(a), Binary(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            (Array(self::Array::Typed(a)), Array(self::Array::Typed(b))) if a == b => true,
            (
                Extension(self::Extension::TypedObjectArray(a)),
                Extension(self::Extension::TypedObjectArray(b)),
            ) if a == b => true,
            (Extension(a), Extension(b)) if !is_sequence(a) || !is_sequence(b) => a == b,
            _ => match (self.elements(), other.elements()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

fn is_sequence(e: &Extension) -> bool {
    match e {
        Extension::TypedObjectArray(_) => true,
        _ => false,
    }
}

/// An array of values.
#[derive(Clone, Debug, PartialEq)]
pub enum Array {
    /// Each element carries its own header.
    Generic(Vec<Value>),
    /// All elements share one header.
    Typed(TypedArray),
}

impl Array {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Array::Generic(v) => v.len(),
            Array::Typed(t) => t.len(),
        }
    }

    /// Indicates whether there are no elements.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// The element at `i`.
    pub fn element(&self, i: usize) -> Option<Cow<Value>> {
        match self {
            Array::Generic(v) => v.get(i).map(Cow::Borrowed),
            Array::Typed(t) => t.get(i).map(Cow::Owned),
        }
    }

    /// The elements as values.
    pub fn values(&self) -> Cow<[Value]> {
        match self {
            Array::Generic(v) => Cow::Borrowed(v),
            Array::Typed(t) => Cow::Owned(t.to_values()),
        }
    }

    /// Consumes the array, returning its elements as values.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Array::Generic(v) => v,
            Array::Typed(t) => t.to_values(),
        }
    }
}

/// An object. All keys of one object share a type.
#[derive(Clone, Debug)]
pub enum Object {
    Text(VecMap<String, Value>),
    Signed(VecMap<i128, Value>),
    Unsigned(VecMap<u128, Value>),
}

impl Default for Object {
    fn default() -> Self { Object::new() }
}

impl Object {
    /// Creates an empty string-keyed object.
    pub fn new() -> Object { Object::Text(VecMap::new()) }

    /// Number of members.
    pub fn len(&self) -> usize {
        match self {
            Object::Text(m) => m.len(),
            Object::Signed(m) => m.len(),
            Object::Unsigned(m) => m.len(),
        }
    }

    /// Indicates whether there are no members.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Inserts a string-keyed member, returning the previous value for that key.
    ///
    /// An integer-keyed object is first rewritten with decimal string keys, the form
    /// JSON gives them.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        if let Object::Text(m) = self {
            return m.insert(key.into(), value.into());
        }
        let mut m = std::mem::take(self).into_text_keys();
        let old = m.insert(key.into(), value.into());
        *self = Object::Text(m);
        old
    }

    /// Looks up a string key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Object::Text(m) => m.get(key),
            _ => None,
        }
    }

    /// Looks up an integer key, in either signedness.
    pub fn get_int(&self, key: i128) -> Option<&Value> {
        match self {
            Object::Signed(m) => m.get(&key),
            Object::Unsigned(m) if key >= 0 => m.get(&(key as u128)),
            _ => None,
        }
    }

    /// The values in member order.
    pub fn values(&self) -> Vec<&Value> {
        match self {
            Object::Text(m) => m.values().collect(),
            Object::Signed(m) => m.values().collect(),
            Object::Unsigned(m) => m.values().collect(),
        }
    }

    /// Consumes the object, rendering integer keys in decimal.
    pub fn into_text_keys(self) -> VecMap<String, Value> {
        match self {
            Object::Text(m) => m,
            Object::Signed(m) => m.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            Object::Unsigned(m) => m.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

/// Same keys, equal values; member order doesn't matter.
fn same_members<K1, K2, F>(a: &VecMap<K1, Value>, b: &VecMap<K2, Value>, key_eq: F) -> bool
where
    F: Fn(&K1, &K2) -> bool,
{
    if a.len() != b.len() {
        return false;
    }
    // objects usually come back in the order they were written
    if a.iter().zip(b.iter()).all(|((k1, _), (k2, _))| key_eq(k1, k2)) {
        return a.iter().zip(b.iter()).all(|((_, v1), (_, v2))| v1 == v2);
    }
    a.iter()
        .all(|(k1, v1)| b.iter().any(|(k2, v2)| key_eq(k1, k2) && v1 == v2))
}

fn int_keys_eq(i: &i128, u: &u128) -> bool { *i >= 0 && *i as u128 == *u }

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        use crate::Object::*;
        match (self, other) {
            (Text(a), Text(b)) => same_members(a, b, |x, y| x == y),
            (Signed(a), Signed(b)) => same_members(a, b, |x, y| x == y),
            (Unsigned(a), Unsigned(b)) => same_members(a, b, |x, y| x == y),
            (Signed(a), Unsigned(b)) => same_members(a, b, int_keys_eq),
            (Unsigned(a), Signed(b)) => same_members(a, b, |u, i| int_keys_eq(i, u)),
            _ => false,
        }
    }
}

impl<V: Into<Value>> From<VecMap<String, V>> for Object {
    fn from(m: VecMap<String, V>) -> Object { Object::Text(m.map_values(V::into)) }
}

impl<V: Into<Value>> From<VecMap<i128, V>> for Object {
    fn from(m: VecMap<i128, V>) -> Object { Object::Signed(m.map_values(V::into)) }
}

impl<V: Into<Value>> From<VecMap<u128, V>> for Object {
    fn from(m: VecMap<u128, V>) -> Object { Object::Unsigned(m.map_values(V::into)) }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Object {
    fn from(m: BTreeMap<String, V>) -> Object { Object::from(VecMap::from(m)) }
}

impl<V: Into<Value>, S: BuildHasher> From<HashMap<String, V, S>> for Object {
    fn from(m: HashMap<String, V, S>) -> Object { Object::from(VecMap::from(m)) }
}

fn fmt_bytes(bytes: &Bytes) -> String {
    let mut out = String::from("b\"");
    for b in bytes.iter() {
        out.push_str(&format!("{:02x}", b));
    }
    out.push('"');
    out
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        fn join<I: Iterator<Item = String>>(open: char, items: I, close: char) -> String {
            let mut out = open.to_string();
            for (i, s) in items.enumerate() {
                if i != 0 {
                    out.push_str(", ");
                }
                out.push_str(&s);
            }
            out.push(close);
            out
        }

        fn fmt_helper(v: &Value) -> String {
            match v {
                Null => "null".to_owned(),
                Bool(b) => b.to_string(),
                Number(n) => n.to_string(),
                Text(s) => format!("{:?}", s),
                Binary(b) => fmt_bytes(b),
                Object(o) => match o {
                    self::Object::Text(m) => {
                        join('{', m.iter().map(|(k, v)| format!("{:?}: {}", k, fmt_helper(v))), '}')
                    }
                    self::Object::Signed(m) => {
                        join('{', m.iter().map(|(k, v)| format!("{}: {}", k, fmt_helper(v))), '}')
                    }
                    self::Object::Unsigned(m) => {
                        join('{', m.iter().map(|(k, v)| format!("{}: {}", k, fmt_helper(v))), '}')
                    }
                },
                Array(a) => join('[', a.values().iter().map(fmt_helper), ']'),
                Extension(e) => match e {
                    self::Extension::Delimiter => "<delimiter>".to_owned(),
                    self::Extension::Variant(v) => format!("#{}({})", v.tag(), fmt_helper(v.value())),
                    self::Extension::Matrix(m) => format!(
                        "matrix{:?}{}",
                        m.extents(),
                        join('[', m.data().iter().map(|n| n.to_string()), ']')
                    ),
                    self::Extension::Complex(c) => join(
                        '[',
                        (0..c.len())
                            .filter_map(|i| c.get(i))
                            .map(|(re, im)| format!("{}{:+}i", re, im.to_f64().unwrap_or(0.0))),
                        ']',
                    ),
                    self::Extension::TypedObjectArray(t) => join(
                        '[',
                        (0..t.len())
                            .filter_map(|i| t.object(i))
                            .map(|o| fmt_helper(&Object(o))),
                        ']',
                    ),
                    self::Extension::Timestamp(t) => match t.tz_offset_minutes() {
                        Some(tz) => format!("@{}.{:09}{:+}m", t.seconds(), t.nanos(), tz),
                        None => format!("@{}.{:09}", t.seconds(), t.nanos()),
                    },
                    self::Extension::Duration(d) => format!("{}.{:09}s", d.seconds(), d.nanos()),
                    self::Extension::Uuid(u) => format!("uuid:{}", u),
                },
            }
        }

        write!(f, "{}", fmt_helper(self))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value { Text(s.to_string()) }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Value { Array(self::Array::Generic(v.into_iter().map(T::into).collect())) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(o: Option<T>) -> Value { o.map_or(Null, T::into) }
}

from_fn!(Value, bool, Bool);
from_fn!(Value, Number, Number);
from_fn!(Value, String, Text);
from_fn!(Value, Bytes, Binary);
from_fn!(Value, Object, Object);
from_fn!(Value, Array, Array);
from_fn!(Value, Extension, Extension);
from_fn!(Value, TypedArray, |t| Array(self::Array::Typed(t)));
from_fn!(Value, Timestamp, |t| Extension(self::Extension::Timestamp(t)));
from_fn!(Value, Duration, |d| Extension(self::Extension::Duration(d)));
from_fn!(Value, Uuid, |u| Extension(self::Extension::Uuid(u)));
from_fn!(Value, Matrix, |m| Extension(self::Extension::Matrix(m)));
from_fn!(Value, Complex, |c| Extension(self::Extension::Complex(c)));
from_fn!(Value, Variant, |v| Extension(self::Extension::Variant(v)));
from_fn!(Value, TypedObjectArray, |t| Extension(
    self::Extension::TypedObjectArray(t)
));

// Numbers
compose_from!(Value, Number, Inum, Float, f16, f32, f64);
compose_from!(Value, Number, i8, i16, i32, i64, i128, isize);
compose_from!(Value, Number, u8, u16, u32, u64, u128, usize);
compose_from!(Value, TypedArray, NumericArray);
