use crate::{from_fn, number::Width};
use std::convert::TryFrom;

/// A fixed-width integer, signed or unsigned, up to 128 bits.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Inum {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
}

use Inum::*;

from_fn!(Inum, i8, I8);
from_fn!(Inum, i16, I16);
from_fn!(Inum, i32, I32);
from_fn!(Inum, i64, I64);
from_fn!(Inum, i128, I128);
from_fn!(Inum, u8, U8);
from_fn!(Inum, u16, U16);
from_fn!(Inum, u32, U32);
from_fn!(Inum, u64, U64);
from_fn!(Inum, u128, U128);
from_fn!(Inum, isize, |i| I64(i as i64));
from_fn!(Inum, usize, |u| U64(u as u64));

impl Inum {
    /// The narrowest integer holding `i`: unsigned when `i` is non-negative, signed
    /// otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use beve::inum::Inum;
    ///
    /// assert_eq!(Inum::shrink(200), Inum::U8(200));
    /// assert_eq!(Inum::shrink(-200), Inum::I16(-200));
    /// ```
    pub fn shrink(i: i128) -> Inum {
        if i >= 0 {
            Inum::shrink_unsigned(i as u128)
        } else {
            Inum::shrink_signed(i)
        }
    }

    /// The narrowest unsigned integer holding `u`.
    pub fn shrink_unsigned(u: u128) -> Inum {
        if u <= u8::max_value() as u128 {
            U8(u as u8)
        } else if u <= u16::max_value() as u128 {
            U16(u as u16)
        } else if u <= u32::max_value() as u128 {
            U32(u as u32)
        } else if u <= u64::max_value() as u128 {
            U64(u as u64)
        } else {
            U128(u)
        }
    }

    /// The narrowest signed integer holding `i`.
    pub fn shrink_signed(i: i128) -> Inum {
        Inum::signed_with_width(i, Width::for_signed(i))
    }

    /// Builds a signed integer of exactly `width`, truncating `i` if it doesn't fit.
    pub(crate) fn signed_with_width(i: i128, width: Width) -> Inum {
        match width {
            Width::W1 => I8(i as i8),
            Width::W2 => I16(i as i16),
            Width::W4 => I32(i as i32),
            Width::W8 => I64(i as i64),
            Width::W16 => I128(i),
        }
    }

    /// Builds an unsigned integer of exactly `width`, truncating `u` if it doesn't fit.
    pub(crate) fn unsigned_with_width(u: u128, width: Width) -> Inum {
        match width {
            Width::W1 => U8(u as u8),
            Width::W2 => U16(u as u16),
            Width::W4 => U32(u as u32),
            Width::W8 => U64(u as u64),
            Width::W16 => U128(u),
        }
    }

    /// Width of the encoded integer.
    pub fn width(self) -> Width {
        match self {
            I8(_) | U8(_) => Width::W1,
            I16(_) | U16(_) => Width::W2,
            I32(_) | U32(_) => Width::W4,
            I64(_) | U64(_) => Width::W8,
            I128(_) | U128(_) => Width::W16,
        }
    }

    /// Indicates whether this is one of the signed variants.
    pub fn is_signed(self) -> bool {
        match self {
            I8(_) | I16(_) | I32(_) | I64(_) | I128(_) => true,
            _ => false,
        }
    }

    /// Indicates whether the value is below zero.
    pub fn is_negative(self) -> bool { self.to_i128().map_or(false, |i| i < 0) }

    /// The value as an `i128`, if it fits.
    pub fn to_i128(self) -> Option<i128> {
        match self {
            I8(i) => Some(i as i128),
            I16(i) => Some(i as i128),
            I32(i) => Some(i as i128),
            I64(i) => Some(i as i128),
            I128(i) => Some(i),
            U8(u) => Some(u as i128),
            U16(u) => Some(u as i128),
            U32(u) => Some(u as i128),
            U64(u) => Some(u as i128),
            U128(u) => i128::try_from(u).ok(),
        }
    }

    /// The value as a `u128`, if it isn't negative.
    pub fn to_u128(self) -> Option<u128> {
        match self {
            U128(u) => Some(u),
            other => other.to_i128().and_then(|i| u128::try_from(i).ok()),
        }
    }

    /// Sign and absolute value; every `Inum` has one.
    pub fn sign_magnitude(self) -> (bool, u128) {
        match self.to_i128() {
            Some(i) => (i < 0, i.unsigned_abs()),
            // only `U128` values above `i128::MAX` land here
            None => (false, self.to_u128().unwrap_or_default()),
        }
    }

    /// Raw little-endian bits, sign-extended to 128 bits for signed variants.
    pub(crate) fn bits(self) -> u128 {
        match self {
            U128(u) => u,
            other => other.to_i128().unwrap_or_default() as u128,
        }
    }
}

macro_rules! try_from_inum {
    ($($t:ty),*) => {
        $(
            impl TryFrom<Inum> for $t {
                type Error = Inum;

                fn try_from(n: Inum) -> Result<$t, Inum> {
                    match n {
                        U128(u) => <$t>::try_from(u).map_err(|_| n),
                        other => other
                            .to_i128()
                            .and_then(|i| <$t>::try_from(i).ok())
                            .ok_or(n),
                    }
                }
            }
        )*
    };
}

try_from_inum!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, isize, usize);

impl std::fmt::Display for Inum {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.to_i128() {
            Some(i) => write!(f, "{}", i),
            None => write!(f, "{}", self.to_u128().unwrap_or_default()),
        }
    }
}
