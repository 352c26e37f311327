//! Encoder and decoder settings.
//!
//! # Example
//!
//! ```
//! use beve::config::{DecodeConfig, EncodeConfig};
//!
//! let enc = EncodeConfig::default().typed_object_arrays(true);
//! assert!(enc.typed_arrays);
//!
//! let dec = DecodeConfig::default().max_depth(16).strict_uuid(true);
//! assert_eq!(dec.max_depth, 16);
//! ```

/// How deeply containers may nest before decoding gives up.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Encoder settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EncodeConfig {
    /// Write generic arrays of uniform scalars as typed arrays. On by default.
    pub typed_arrays: bool,
    /// Write generic arrays of same-shaped string-keyed objects as typed object arrays.
    /// Off by default.
    pub typed_object_arrays: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        EncodeConfig {
            typed_arrays: true,
            typed_object_arrays: false,
        }
    }
}

impl EncodeConfig {
    /// Default settings.
    pub fn new() -> Self { Self::default() }

    /// Sets [`EncodeConfig::typed_arrays`].
    pub fn typed_arrays(mut self, on: bool) -> Self {
        self.typed_arrays = on;
        self
    }

    /// Sets [`EncodeConfig::typed_object_arrays`].
    pub fn typed_object_arrays(mut self, on: bool) -> Self {
        self.typed_object_arrays = on;
        self
    }
}

/// Decoder settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodeConfig {
    /// Maximum container nesting; deeper input is rejected as unsupported.
    pub max_depth: usize,
    /// Reject UUIDs whose version byte disagrees with their embedded version, instead
    /// of logging a warning and keeping them.
    pub strict_uuid: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            strict_uuid: false,
        }
    }
}

impl DecodeConfig {
    /// Default settings.
    pub fn new() -> Self { Self::default() }

    /// Sets [`DecodeConfig::max_depth`].
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets [`DecodeConfig::strict_uuid`].
    pub fn strict_uuid(mut self, on: bool) -> Self {
        self.strict_uuid = on;
        self
    }
}
