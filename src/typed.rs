//! Typed arrays: homogeneous runs of numbers, booleans or strings that share one header.

use crate::{
    errors::{Error, Result},
    number::{NumKind, Number, Width},
    Value,
};
use bytes::{Bytes, BytesMut};
use half::f16;

/// A native element type that can back a [`NumericArray`].
pub trait Element: Copy {
    /// Numeric kind of the element.
    const KIND: NumKind;
    /// Byte width of the element.
    const WIDTH: Width;
    /// Appends the little-endian bytes of `self`.
    fn put_le(self, out: &mut BytesMut);
    /// Reads an element from exactly `Self::WIDTH` little-endian bytes.
    fn from_le(bs: &[u8]) -> Self;
}

macro_rules! element {
    ($($t:ty => $kind:ident, $width:ident);* $(;)*) => {
        $(
            impl Element for $t {
                const KIND: NumKind = NumKind::$kind;
                const WIDTH: Width = Width::$width;

                #[inline]
                fn put_le(self, out: &mut BytesMut) { out.extend_from_slice(&self.to_le_bytes()) }

                #[inline]
                fn from_le(bs: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    buf.copy_from_slice(bs);
                    <$t>::from_le_bytes(buf)
                }
            }
        )*
    };
}

element! {
    i8 => Signed, W1;
    i16 => Signed, W2;
    i32 => Signed, W4;
    i64 => Signed, W8;
    i128 => Signed, W16;
    u8 => Unsigned, W1;
    u16 => Unsigned, W2;
    u32 => Unsigned, W4;
    u64 => Unsigned, W8;
    u128 => Unsigned, W16;
    f32 => Float, W4;
    f64 => Float, W8;
}

impl Element for f16 {
    const KIND: NumKind = NumKind::Float;
    const WIDTH: Width = Width::W2;

    fn put_le(self, out: &mut BytesMut) { out.extend_from_slice(&self.to_bits().to_le_bytes()) }

    fn from_le(bs: &[u8]) -> Self { f16::from_bits(u16::from_le_bytes([bs[0], bs[1]])) }
}

/// A packed run of numbers of one kind and width.
///
/// Elements are kept exactly as they appear on the wire: `len() * width` little-endian
/// bytes.
///
/// # Example
///
/// ```
/// use beve::{number::Number, typed::NumericArray};
///
/// let arr = NumericArray::from(vec![1.5f32, -2.0]);
/// assert_eq!(arr.len(), 2);
/// assert_eq!(arr.get(1), Some(Number::from(-2.0f32)));
/// assert_eq!(arr.to_vec::<f32>(), Some(vec![1.5, -2.0]));
/// assert_eq!(arr.to_vec::<f64>(), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct NumericArray {
    kind: NumKind,
    width: Width,
    data: Bytes,
}

impl NumericArray {
    /// Wraps packed little-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValueForTypedArray`] if `data` is not a whole number of
    /// elements.
    pub fn from_raw(kind: NumKind, width: Width, data: Bytes) -> Result<NumericArray> {
        if data.len() % width.bytes() != 0 {
            return Err(Error::InvalidValueForTypedArray(format!(
                "{} bytes is not a multiple of the element width {}",
                data.len(),
                width.bytes()
            )));
        }
        Ok(NumericArray { kind, width, data })
    }

    /// Packs a slice of native numbers.
    pub fn from_slice<T: Element>(elems: &[T]) -> NumericArray {
        let mut data = BytesMut::with_capacity(elems.len() * T::WIDTH.bytes());
        for e in elems {
            e.put_le(&mut data);
        }
        NumericArray {
            kind: T::KIND,
            width: T::WIDTH,
            data: data.freeze(),
        }
    }

    /// Packs numbers that all share one kind and width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValueForTypedArray`] when `nums` is empty or mixes
    /// representations.
    pub fn from_numbers(nums: &[Number]) -> Result<NumericArray> {
        let first = match nums.first() {
            Some(n) => n,
            None => {
                return Err(Error::InvalidValueForTypedArray(
                    "an empty array has no element type".into(),
                ))
            }
        };
        NumericArray::with_type(first.kind(), first.width(), nums)
    }

    /// Packs numbers into the given kind and width; every number must already have it.
    pub(crate) fn with_type(kind: NumKind, width: Width, nums: &[Number]) -> Result<NumericArray> {
        let mut data = BytesMut::with_capacity(nums.len() * width.bytes());
        for (i, n) in nums.iter().enumerate() {
            if n.kind() != kind || n.width() != width {
                return Err(Error::InvalidValueForTypedArray(format!(
                    "element {} is {:?}/{} bytes, expected {:?}/{} bytes",
                    i,
                    n.kind(),
                    n.width().bytes(),
                    kind,
                    width.bytes()
                )));
            }
            data.extend_from_slice(&n.to_le_bytes());
        }
        Ok(NumericArray {
            kind,
            width,
            data: data.freeze(),
        })
    }

    /// Packs integers of any widths into the narrowest common integer type: signed if
    /// any element is negative, unsigned otherwise. Fails if an element isn't an
    /// integer or no single type holds them all.
    pub(crate) fn unify_integers(nums: &[Number]) -> Result<NumericArray> {
        let mut min: i128 = 0;
        let mut max: u128 = 0;
        for n in nums {
            let i = match n.as_inum() {
                Some(i) => i,
                None => {
                    return Err(Error::InvalidValueForTypedArray(
                        "floats and integers can't share a typed array".into(),
                    ))
                }
            };
            let (neg, abs) = i.sign_magnitude();
            if neg {
                min = std::cmp::min(min, i.to_i128().unwrap_or_default());
            } else {
                max = std::cmp::max(max, abs);
            }
        }

        let (kind, width) = if min < 0 {
            if max > i128::max_value() as u128 {
                return Err(Error::InvalidValueForTypedArray(
                    "no 128-bit integer holds both elements".into(),
                ));
            }
            let w = std::cmp::max(Width::for_signed(min), Width::for_signed(max as i128));
            (NumKind::Signed, w)
        } else {
            (NumKind::Unsigned, Width::for_unsigned(max))
        };

        let mut data = BytesMut::with_capacity(nums.len() * width.bytes());
        for n in nums {
            let bits = n.to_i128().map_or_else(|| n.to_u128().unwrap_or_default(), |i| i as u128);
            data.extend_from_slice(&bits.to_le_bytes()[..width.bytes()]);
        }
        Ok(NumericArray {
            kind,
            width,
            data: data.freeze(),
        })
    }

    /// Widens floats with native counterparts (half, single, double) to the widest one
    /// present. Opaque widths only combine with themselves.
    pub(crate) fn unify_floats(nums: &[Number]) -> Result<NumericArray> {
        let widest = nums.iter().map(Number::width).max().unwrap_or(Width::W8);
        if nums.iter().any(|n| n.kind() != NumKind::Float) {
            return Err(Error::InvalidValueForTypedArray(
                "floats and integers can't share a typed array".into(),
            ));
        }
        match widest {
            Width::W2 | Width::W4 | Width::W8 => {
                let mut widened = Vec::with_capacity(nums.len());
                for n in nums {
                    let f = n.to_f64().ok_or_else(|| {
                        Error::InvalidValueForTypedArray(
                            "opaque float widths can't be widened".into(),
                        )
                    })?;
                    widened.push(match widest {
                        Width::W2 => Number::from(f16::from_f64(f)),
                        Width::W4 => Number::from(f as f32),
                        _ => Number::from(f),
                    });
                }
                NumericArray::with_type(NumKind::Float, widest, &widened)
            }
            _ => NumericArray::with_type(NumKind::Float, widest, nums),
        }
    }

    /// Numeric kind of the elements.
    pub fn kind(&self) -> NumKind { self.kind }

    /// Byte width of the elements.
    pub fn width(&self) -> Width { self.width }

    /// Number of elements.
    pub fn len(&self) -> usize { self.data.len() / self.width.bytes() }

    /// Indicates whether there are no elements.
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// The packed little-endian bytes.
    pub fn data(&self) -> &Bytes { &self.data }

    /// The element at `i`.
    pub fn get(&self, i: usize) -> Option<Number> {
        let w = self.width.bytes();
        let bs = self.data.get(i * w..(i + 1) * w)?;
        Some(Number::from_le_bytes(self.kind, self.width, bs))
    }

    /// Iterates over the elements.
    pub fn iter(&self) -> impl Iterator<Item = Number> + '_ {
        let (kind, width) = (self.kind, self.width);
        self.data
            .chunks_exact(width.bytes())
            .map(move |bs| Number::from_le_bytes(kind, width, bs))
    }

    /// Unpacks into native values, if `T` is exactly the element type.
    pub fn to_vec<T: Element>(&self) -> Option<Vec<T>> {
        if T::KIND != self.kind || T::WIDTH != self.width {
            return None;
        }
        Some(self.data.chunks_exact(self.width.bytes()).map(T::from_le).collect())
    }

    /// Unpacks every element as an `f64`, if they all have a native representation.
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> { self.iter().map(|n| n.to_f64()).collect() }

    /// Unpacks every element as a `u64`, if they are all non-negative integers that fit.
    pub fn to_u64_vec(&self) -> Option<Vec<u64>> {
        self.iter()
            .map(|n| n.as_inum().and_then(|i| i.to_u128()).and_then(|u| u64_from(u)))
            .collect()
    }
}

fn u64_from(u: u128) -> Option<u64> {
    if u <= u64::max_value() as u128 {
        Some(u as u64)
    } else {
        None
    }
}

impl<T: Element> From<Vec<T>> for NumericArray {
    fn from(v: Vec<T>) -> NumericArray { NumericArray::from_slice(&v) }
}

impl<T: Element> From<&[T]> for NumericArray {
    fn from(v: &[T]) -> NumericArray { NumericArray::from_slice(v) }
}

/// A homogeneous array encoded with a single header and bare elements.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedArray {
    Numeric(NumericArray),
    /// Bit-packed on the wire, LSB first.
    Bool(Vec<bool>),
    /// Each element is a bare `SIZE | bytes` string.
    Text(Vec<String>),
}

impl TypedArray {
    /// Builds a typed array from values that share one element type.
    ///
    /// Booleans and strings group as themselves. Numbers group when they are all
    /// integers (packed into the narrowest common integer type) or all floats (widened
    /// to the widest native float present).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValueForTypedArray`] for an empty slice, mixed element
    /// types, or elements that aren't scalars.
    ///
    /// # Example
    ///
    /// ```
    /// use beve::{typed::TypedArray, Value};
    ///
    /// let typed = TypedArray::from_values(&[Value::from(1u8), Value::from(-300)]).unwrap();
    /// match typed {
    ///     TypedArray::Numeric(n) => assert_eq!(n.to_vec::<i16>(), Some(vec![1, -300])),
    ///     _ => panic!(),
    /// }
    ///
    /// assert!(TypedArray::from_values(&[Value::from(true), Value::from("x")]).is_err());
    /// assert!(TypedArray::from_values(&[]).is_err());
    /// ```
    pub fn from_values(values: &[Value]) -> Result<TypedArray> {
        let first = match values.first() {
            Some(v) => v,
            None => {
                return Err(Error::InvalidValueForTypedArray(
                    "an empty array has no element type".into(),
                ))
            }
        };
        let mismatch = |i: usize| {
            Error::InvalidValueForTypedArray(format!(
                "element {} doesn't match the type of element 0",
                i
            ))
        };

        match first {
            Value::Bool(_) => values
                .iter()
                .enumerate()
                .map(|(i, v)| match v {
                    Value::Bool(b) => Ok(*b),
                    _ => Err(mismatch(i)),
                })
                .collect::<Result<Vec<bool>>>()
                .map(TypedArray::Bool),
            Value::Text(_) => values
                .iter()
                .enumerate()
                .map(|(i, v)| match v {
                    Value::Text(s) => Ok(s.clone()),
                    _ => Err(mismatch(i)),
                })
                .collect::<Result<Vec<String>>>()
                .map(TypedArray::Text),
            Value::Number(_) => {
                let nums = values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| match v {
                        Value::Number(n) => Ok(*n),
                        _ => Err(mismatch(i)),
                    })
                    .collect::<Result<Vec<Number>>>()?;
                NumericArray::from_numbers(&nums)
                    .or_else(|_| NumericArray::unify_integers(&nums))
                    .or_else(|_| NumericArray::unify_floats(&nums))
                    .map(TypedArray::Numeric)
            }
            _ => Err(Error::InvalidValueForTypedArray(
                "only numbers, booleans and strings can be typed".into(),
            )),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            TypedArray::Numeric(n) => n.len(),
            TypedArray::Bool(b) => b.len(),
            TypedArray::Text(s) => s.len(),
        }
    }

    /// Indicates whether there are no elements.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// The element at `i` as a standalone value.
    pub fn get(&self, i: usize) -> Option<Value> {
        match self {
            TypedArray::Numeric(n) => n.get(i).map(Value::Number),
            TypedArray::Bool(b) => b.get(i).map(|b| Value::Bool(*b)),
            TypedArray::Text(s) => s.get(i).map(|s| Value::Text(s.clone())),
        }
    }

    /// Expands into standalone values.
    pub fn to_values(&self) -> Vec<Value> { (0..self.len()).filter_map(|i| self.get(i)).collect() }
}

impl From<NumericArray> for TypedArray {
    fn from(n: NumericArray) -> TypedArray { TypedArray::Numeric(n) }
}

impl From<Vec<bool>> for TypedArray {
    fn from(b: Vec<bool>) -> TypedArray { TypedArray::Bool(b) }
}

impl From<Vec<String>> for TypedArray {
    fn from(s: Vec<String>) -> TypedArray { TypedArray::Text(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inum::Inum;

    #[test]
    fn unify_mixed_widths() {
        let nums = vec![Number::from(1u8), Number::from(70_000u32), Number::from(2i64)];
        let arr = NumericArray::unify_integers(&nums).unwrap();
        assert_eq!(arr.kind(), NumKind::Unsigned);
        assert_eq!(arr.width(), Width::W4);
        assert_eq!(arr.to_vec::<u32>(), Some(vec![1, 70_000, 2]));

        let nums = vec![Number::from(-1i8), Number::from(200u8)];
        let arr = NumericArray::unify_integers(&nums).unwrap();
        assert_eq!(arr.kind(), NumKind::Signed);
        assert_eq!(arr.width(), Width::W2);
        assert_eq!(arr.to_vec::<i16>(), Some(vec![-1, 200]));

        let nums = vec![Number::from(-1i8), Number::from(u128::max_value())];
        assert!(NumericArray::unify_integers(&nums).is_err());
    }

    #[test]
    fn unify_floats() {
        let nums = vec![Number::from(1.5f32), Number::from(0.25f64)];
        let arr = NumericArray::unify_floats(&nums).unwrap();
        assert_eq!(arr.width(), Width::W8);
        assert_eq!(arr.to_vec::<f64>(), Some(vec![1.5, 0.25]));
    }

    #[test]
    fn strict_numbers() {
        let nums = vec![Number::from(1u8), Number::from(1.0f64)];
        assert!(NumericArray::from_numbers(&nums).is_err());
        let err = TypedArray::from_values(&[Value::from(1u8), Value::from(0.5f64)]);
        match err {
            Err(Error::InvalidValueForTypedArray(_)) => (),
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn raw_length_checked() {
        assert!(NumericArray::from_raw(NumKind::Unsigned, Width::W4, Bytes::from_static(&[0; 6]))
            .is_err());
        let arr =
            NumericArray::from_raw(NumKind::Signed, Width::W2, Bytes::from_static(&[0xff; 4]))
                .unwrap();
        assert_eq!(arr.iter().collect::<Vec<_>>(), vec![Number::from(-1i16); 2]);
        assert_eq!(arr.get(0).and_then(|n| n.as_inum()), Some(Inum::I16(-1)));
        assert_eq!(arr.get(2), None);
    }
}
