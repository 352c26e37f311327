pub use crate::{
    beve_macro::*,
    config::{DecodeConfig, EncodeConfig},
    encoding::{
        decode, decode_full, decode_with, encode, encode_full, encode_records, encode_with,
        Records,
    },
    errors::Error,
    extension::{
        Complex, Duration, Extension, Layout, Matrix, Timestamp, TypedObjectArray, Uuid, Variant,
    },
    float::Float,
    inum::Inum,
    number::Number,
    rep::*,
    typed::{NumericArray, TypedArray},
    Array, Object, Value,
};
pub use bytes::Bytes;
pub use half::f16;
pub use std::{convert::TryFrom, str::FromStr};
