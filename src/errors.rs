use failure::Fail;

/// Everything that can go wrong while building, encoding or decoding BEVE.
///
/// The decoder only ever produces [`Error::TruncatedInput`] and
/// [`Error::UnsupportedEncoding`], plus [`Error::InconsistentUuid`] when
/// [`DecodeConfig::strict_uuid`](crate::config::DecodeConfig) is set. The remaining
/// variants come from constructors that validate a value before any bytes are written.
#[derive(Debug, Clone, PartialEq, Eq, Fail)]
pub enum Error {
    /// The buffer ended before a header, SIZE or fixed-width field could be read.
    #[fail(
        display = "truncated input: needed {} bytes at offset {}, only {} remaining",
        needed, offset, remaining
    )]
    TruncatedInput {
        /// Offset of the read that failed.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },
    /// A header or payload selects a reserved or unassigned combination.
    #[fail(display = "unsupported encoding at offset {}: {}", offset, reason)]
    UnsupportedEncoding {
        /// Offset of the offending byte.
        offset: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// A typed array was requested for values that don't share one element type.
    #[fail(display = "invalid value for typed array: {}", _0)]
    InvalidValueForTypedArray(String),
    /// Rows of a typed object array don't share the same key set.
    #[fail(
        display = "schema mismatch in row {}: expected fields {:?}, found {:?}",
        row, expected, found
    )]
    SchemaMismatch {
        /// Index of the first row that disagrees.
        row: usize,
        /// The (sorted) fields of the first row.
        expected: Vec<String>,
        /// The (sorted) fields of the offending row.
        found: Vec<String>,
    },
    /// A UUID's version byte disagrees with the version nibble of its raw bytes.
    #[fail(
        display = "inconsistent uuid: version byte is {}, embedded version is {}",
        declared, embedded
    )]
    InconsistentUuid {
        /// The version byte that precedes the raw bytes.
        declared: u8,
        /// The high nibble of byte 6.
        embedded: u8,
    },
    /// A SIZE or variant tag above `2^62 - 1`, which a SIZE can't hold.
    #[fail(display = "{} is out of range for a SIZE", value)]
    SizeOutOfRange {
        /// The rejected value.
        value: u64,
    },
    /// A [`Value`](crate::Value) couldn't be converted into a native type.
    #[fail(display = "conversion failed: {}", _0)]
    Conversion(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn unsupported<S: Into<String>>(offset: usize, reason: S) -> Self {
        Error::UnsupportedEncoding {
            offset,
            reason: reason.into(),
        }
    }

    /// Indicates whether this error was produced while decoding wire bytes.
    pub fn is_decode_error(&self) -> bool {
        match self {
            Error::TruncatedInput { .. }
            | Error::UnsupportedEncoding { .. }
            | Error::InconsistentUuid { .. } => true,
            _ => false,
        }
    }
}

/// Return early with an [`Error::Conversion`].
#[macro_export]
macro_rules! bail_conversion {
    ($($arg:tt)*) => {
        return Err($crate::errors::Error::Conversion(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let e = Error::TruncatedInput {
            offset: 3,
            needed: 4,
            remaining: 1,
        };
        assert_eq!(
            e.to_string(),
            "truncated input: needed 4 bytes at offset 3, only 1 remaining"
        );

        let e = Error::unsupported(0, "major type 7");
        assert_eq!(e.to_string(), "unsupported encoding at offset 0: major type 7");
    }

    #[test]
    fn decode_errors() {
        assert!(Error::unsupported(0, "x").is_decode_error());
        assert!(!Error::Conversion("x".into()).is_decode_error());
    }
}
