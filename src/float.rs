use crate::number::Width;
use half::f16;
use std::convert::TryFrom;

/// A floating point number, stored as its raw IEEE 754 bits.
///
/// BEVE floats come in five widths. Half, single and double precision map onto
/// [`f16`], [`f32`] and [`f64`]; the 1-byte and 16-byte forms have no native Rust
/// type, so their bits are carried through untouched.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Float {
    /// 8-bit minifloat, bits kept opaque.
    Mini(u8),
    /// IEEE binary16.
    Half(u16),
    /// IEEE binary32.
    Single(u32),
    /// IEEE binary64.
    Double(u64),
    /// IEEE binary128, bits kept opaque.
    Quad(u128),
}

use Float::*;

impl Float {
    /// Width of the encoded float.
    pub fn width(self) -> Width {
        match self {
            Mini(_) => Width::W1,
            Half(_) => Width::W2,
            Single(_) => Width::W4,
            Double(_) => Width::W8,
            Quad(_) => Width::W16,
        }
    }

    /// The raw bits, zero-extended.
    pub fn bits(self) -> u128 {
        match self {
            Mini(b) => b as u128,
            Half(b) => b as u128,
            Single(b) => b as u128,
            Double(b) => b as u128,
            Quad(b) => b,
        }
    }

    /// Rebuilds a float of the given width from raw bits.
    pub fn from_bits(width: Width, bits: u128) -> Float {
        match width {
            Width::W1 => Mini(bits as u8),
            Width::W2 => Half(bits as u16),
            Width::W4 => Single(bits as u32),
            Width::W8 => Double(bits as u64),
            Width::W16 => Quad(bits),
        }
    }

    /// Converts to [`f64`], exactly, for the widths that have a native counterpart.
    ///
    /// # Example
    ///
    /// ```
    /// use beve::float::Float;
    ///
    /// assert_eq!(Float::from(1.5f32).to_f64(), Some(1.5));
    /// assert_eq!(Float::Quad(0).to_f64(), None);
    /// ```
    pub fn to_f64(self) -> Option<f64> {
        match self {
            Half(b) => Some(f16::from_bits(b).to_f64()),
            Single(b) => Some(f32::from_bits(b) as f64),
            Double(b) => Some(f64::from_bits(b)),
            Mini(_) | Quad(_) => None,
        }
    }
}

impl From<f16> for Float {
    fn from(f: f16) -> Float { Half(f.to_bits()) }
}

impl From<f32> for Float {
    fn from(f: f32) -> Float { Single(f.to_bits()) }
}

impl From<f64> for Float {
    fn from(f: f64) -> Float { Double(f.to_bits()) }
}

impl TryFrom<Float> for f16 {
    type Error = Float;

    fn try_from(f: Float) -> Result<Self, Float> {
        match f {
            Half(n) => Ok(f16::from_bits(n)),
            _ => Err(f),
        }
    }
}

impl TryFrom<Float> for f32 {
    type Error = Float;

    fn try_from(f: Float) -> Result<Self, Float> {
        match f {
            Single(n) => Ok(f32::from_bits(n)),
            Half(n) => Ok(f16::from_bits(n).to_f32()),
            _ => Err(f),
        }
    }
}

impl TryFrom<Float> for f64 {
    type Error = Float;

    fn try_from(f: Float) -> Result<Self, Float> { f.to_f64().ok_or(f) }
}

impl std::fmt::Display for Float {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.to_f64() {
            Some(x) => write!(f, "{}", x),
            None => write!(f, "f{}:{:#x}", self.width().bytes() * 8, self.bits()),
        }
    }
}
