//! Numbers as BEVE sees them: a kind (float, signed, unsigned) and a byte width.

use crate::{
    buffer::{ByteCursor, ByteWriter},
    errors::Result,
    float::Float,
    inum::Inum,
};
use byteorder::{ByteOrder, LittleEndian};
use half::f16;
use num_traits::ToPrimitive;
use smallvec::SmallVec;

/// The numeric kind stored in bits 3–4 of a number or typed-array header.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NumKind {
    Float,
    Signed,
    Unsigned,
}

impl NumKind {
    /// The two header bits for this kind.
    pub fn bits(self) -> u8 {
        match self {
            NumKind::Float => 0,
            NumKind::Signed => 1,
            NumKind::Unsigned => 2,
        }
    }

    /// Reads a kind from its two header bits; `3` is not a numeric kind.
    pub fn from_bits(bits: u8) -> Option<NumKind> {
        match bits {
            0 => Some(NumKind::Float),
            1 => Some(NumKind::Signed),
            2 => Some(NumKind::Unsigned),
            _ => None,
        }
    }
}

/// Byte width of a number. The header stores it as an index: `1 << index` bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Width {
    W1,
    W2,
    W4,
    W8,
    W16,
}

impl Width {
    /// Every width, narrowest first.
    pub const ALL: [Width; 5] = [Width::W1, Width::W2, Width::W4, Width::W8, Width::W16];

    /// Number of bytes.
    pub fn bytes(self) -> usize { 1 << self.index() }

    /// The 3-bit byte-count index.
    pub fn index(self) -> u8 {
        match self {
            Width::W1 => 0,
            Width::W2 => 1,
            Width::W4 => 2,
            Width::W8 => 3,
            Width::W16 => 4,
        }
    }

    /// Reads a width from its byte-count index. Indices above 4 (32 bytes and up) have
    /// no representation.
    pub fn from_index(index: u8) -> Option<Width> { Width::ALL.get(index as usize).copied() }

    /// The width with exactly `bytes` bytes.
    pub fn from_bytes(bytes: usize) -> Option<Width> {
        Width::ALL.iter().copied().find(|w| w.bytes() == bytes)
    }

    /// Narrowest width whose signed range holds `i`.
    pub fn for_signed(i: i128) -> Width {
        if i >= i8::min_value() as i128 && i <= i8::max_value() as i128 {
            Width::W1
        } else if i >= i16::min_value() as i128 && i <= i16::max_value() as i128 {
            Width::W2
        } else if i >= i32::min_value() as i128 && i <= i32::max_value() as i128 {
            Width::W4
        } else if i >= i64::min_value() as i128 && i <= i64::max_value() as i128 {
            Width::W8
        } else {
            Width::W16
        }
    }

    /// Narrowest width whose unsigned range holds `u`.
    pub fn for_unsigned(u: u128) -> Width {
        let bits = 128 - u.leading_zeros() as usize;
        Width::ALL
            .iter()
            .copied()
            .find(|w| w.bytes() * 8 >= bits)
            .unwrap_or(Width::W16)
    }
}

/// A single number.
///
/// Equality is by value: `U8(1)`, `I64(1)` and `1.0f32` are all equal, while `-0.0` is
/// kept distinct from `0`. All NaNs compare equal to each other.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Float(Float),
    Int(Inum),
}

/// The value of a number with its representation stripped off.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Magnitude {
    /// Sign and absolute value.
    Int(bool, u128),
    /// Canonical `f64` bits of a non-integral (or negative zero, or non-finite) float.
    Float(u64),
    /// Floats without a native counterpart only equal themselves.
    Opaque(Width, u128),
}

const TWO_POW_128: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

impl Number {
    /// Picks the representation an encoder should use for a native double.
    ///
    /// Non-finite values and non-integral values stay 8-byte floats. Integral values
    /// become the narrowest unsigned (non-negative) or signed (negative) integer of at
    /// most 64 bits; anything larger stays a float. `-0.0` stays a float so its sign
    /// survives.
    ///
    /// # Example
    ///
    /// ```
    /// use beve::{inum::Inum, number::Number, float::Float};
    ///
    /// match Number::from_f64(300.0) {
    ///     Number::Int(Inum::U16(300)) => (),
    ///     other => panic!("{:?}", other),
    /// }
    /// match Number::from_f64(-0.5) {
    ///     Number::Float(Float::Double(_)) => (),
    ///     other => panic!("{:?}", other),
    /// }
    /// ```
    pub fn from_f64(f: f64) -> Number {
        if !f.is_finite() || f.fract() != 0.0 || (f == 0.0 && f.is_sign_negative()) {
            return Number::Float(Float::from(f));
        }
        if f < 0.0 {
            match f.to_i64() {
                Some(i) => Number::Int(Inum::shrink_signed(i as i128)),
                None => Number::Float(Float::from(f)),
            }
        } else {
            match f.to_u64() {
                Some(u) => Number::Int(Inum::shrink_unsigned(u as u128)),
                None => Number::Float(Float::from(f)),
            }
        }
    }

    /// The narrowest integer holding `i`.
    pub fn from_i128(i: i128) -> Number { Number::Int(Inum::shrink(i)) }

    /// The narrowest unsigned integer holding `u`.
    pub fn from_u128(u: u128) -> Number { Number::Int(Inum::shrink_unsigned(u)) }

    /// Numeric kind.
    pub fn kind(&self) -> NumKind {
        match self {
            Number::Float(_) => NumKind::Float,
            Number::Int(i) if i.is_signed() => NumKind::Signed,
            Number::Int(_) => NumKind::Unsigned,
        }
    }

    /// Byte width.
    pub fn width(&self) -> Width {
        match self {
            Number::Float(f) => f.width(),
            Number::Int(i) => i.width(),
        }
    }

    /// Indicates whether this is an integer of either signedness.
    pub fn is_integer(&self) -> bool {
        match self {
            Number::Int(_) => true,
            _ => false,
        }
    }

    /// The integer, if this is one.
    pub fn as_inum(&self) -> Option<Inum> {
        match self {
            Number::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float, if this is one.
    pub fn as_float(&self) -> Option<Float> {
        match self {
            Number::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The value as an `f64`; integers are rounded to the nearest double.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Number::Float(f) => f.to_f64(),
            Number::Int(i) => match i.to_i128() {
                Some(v) => Some(v as f64),
                None => i.to_u128().map(|u| u as f64),
            },
        }
    }

    /// The value as an `i128` if it is an integer, or an integral float, that fits.
    pub fn to_i128(&self) -> Option<i128> {
        match self.magnitude() {
            Magnitude::Int(true, abs) if abs <= i128::max_value() as u128 + 1 => {
                Some((abs as i128).wrapping_neg())
            }
            Magnitude::Int(false, abs) if abs <= i128::max_value() as u128 => Some(abs as i128),
            _ => None,
        }
    }

    /// The value as a `u128` if it is a non-negative integer or integral float.
    pub fn to_u128(&self) -> Option<u128> {
        match self.magnitude() {
            Magnitude::Int(false, abs) => Some(abs),
            _ => None,
        }
    }

    fn magnitude(&self) -> Magnitude {
        match self {
            Number::Int(i) => {
                let (neg, abs) = i.sign_magnitude();
                Magnitude::Int(neg, abs)
            }
            Number::Float(fl) => match fl.to_f64() {
                None => Magnitude::Opaque(fl.width(), fl.bits()),
                Some(f) if f.is_nan() => Magnitude::Float(std::f64::NAN.to_bits()),
                Some(f)
                    if f.is_finite()
                        && f.fract() == 0.0
                        && !(f == 0.0 && f.is_sign_negative())
                        && f.abs() < TWO_POW_128 =>
                {
                    Magnitude::Int(f < 0.0, f.abs() as u128)
                }
                Some(f) => Magnitude::Float(f.to_bits()),
            },
        }
    }

    /// Writes the little-endian payload, without a header.
    pub fn write_le(&self, out: &mut ByteWriter) { out.write_slice(&self.to_le_bytes()) }

    /// The little-endian payload bytes.
    pub fn to_le_bytes(&self) -> SmallVec<[u8; 16]> {
        let bits = match self {
            Number::Float(f) => f.bits(),
            Number::Int(i) => i.bits(),
        };
        let width = self.width().bytes();
        let mut buf = [0u8; 16];
        LittleEndian::write_u128(&mut buf, bits);
        SmallVec::from_slice(&buf[..width])
    }

    /// Reads a bare payload of the given kind and width.
    pub fn read_le(kind: NumKind, width: Width, cursor: &mut ByteCursor) -> Result<Number> {
        let bs = cursor.read_slice(width.bytes())?;
        Ok(Number::from_le_bytes(kind, width, bs))
    }

    /// Rebuilds a number from exactly `width.bytes()` little-endian bytes.
    pub(crate) fn from_le_bytes(kind: NumKind, width: Width, bs: &[u8]) -> Number {
        debug_assert_eq!(bs.len(), width.bytes());
        let bits = LittleEndian::read_uint128(bs, width.bytes());
        match kind {
            NumKind::Float => Number::Float(Float::from_bits(width, bits)),
            NumKind::Unsigned => Number::Int(Inum::unsigned_with_width(bits, width)),
            NumKind::Signed => {
                // sign-extend from the top bit of the payload
                let shift = 128 - 8 * width.bytes() as u32;
                let i = ((bits << shift) as i128) >> shift;
                Number::Int(Inum::signed_with_width(i, width))
            }
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool { self.magnitude() == other.magnitude() }
}

impl From<Inum> for Number {
    fn from(i: Inum) -> Number { Number::Int(i) }
}

impl From<Float> for Number {
    fn from(f: Float) -> Number { Number::Float(f) }
}

macro_rules! number_from {
    ($via:ident, $($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Number { Number::from($via::from(n)) }
            }
        )*
    };
}

number_from!(Inum, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
number_from!(Float, f16, f32, f64);

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Number::Float(x) => write!(f, "{}", x),
            Number::Int(i) => write!(f, "{}", i),
        }
    }
}
