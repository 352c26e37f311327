use super::{constants::*, ext::put_extension, var_size};
use crate::{
    buffer::ByteWriter,
    config::EncodeConfig,
    extension::{Extension, TypedObjectArray},
    number::{NumKind, Number, Width},
    typed::{NumericArray, TypedArray},
    vecmap::VecMap,
    Array, Object, Value,
};
use bytes::Bytes;
use smallvec::SmallVec;
use tracing::debug;

/// A sink for encoded bytes.
pub trait Serializer {
    /// The type of the output value.
    type Out;
    /// Add a byte to the output value.
    fn put_u8(&mut self, u: u8);
    /// Add a slice to the output value.
    fn put_slice(&mut self, slice: &[u8]);
    /// Return the output value.
    fn finalize(self) -> Self::Out;
}

impl Serializer for Vec<u8> {
    type Out = Self;

    fn put_u8(&mut self, u: u8) { self.push(u) }

    fn put_slice(&mut self, slice: &[u8]) { self.extend_from_slice(slice) }

    fn finalize(self) -> Self::Out { self }
}

impl Serializer for ByteWriter {
    type Out = Vec<u8>;

    fn put_u8(&mut self, u: u8) { self.write_u8(u) }

    fn put_slice(&mut self, slice: &[u8]) { self.write_slice(slice) }

    fn finalize(self) -> Vec<u8> { self.finish() }
}

/// Convenience methods for [`Serializer`], one per wire shape.
pub trait SerializerExt: Serializer {
    /// Add a SIZE.
    fn put_size(&mut self, n: usize);
    /// Add null.
    fn put_null(&mut self);
    /// Add a [`bool`].
    fn put_bool(&mut self, b: bool);
    /// Add a number at its own kind and width.
    fn put_number(&mut self, n: &Number);
    /// Add a string, without a header.
    fn put_bare_str(&mut self, s: &str);
    /// Add a string.
    fn put_str(&mut self, s: &str);
    /// Add a binary blob, as a typed array of `u8`.
    fn put_binary(&mut self, b: &Bytes);
    /// Add a numeric typed array.
    fn put_numeric(&mut self, arr: &NumericArray);
    /// Add a boolean typed array.
    fn put_bools(&mut self, bs: &[bool]);
    /// Add a string typed array.
    fn put_strs<T: AsRef<str>>(&mut self, ss: &[T]);
    /// Add a typed array.
    fn put_typed(&mut self, t: &TypedArray);
    /// Add an object.
    fn put_object(&mut self, o: &Object, cfg: &EncodeConfig);
    /// Add a generic array, promoting it to a typed form if `cfg` allows.
    fn put_array(&mut self, vs: &[Value], cfg: &EncodeConfig);
    /// Add any value.
    fn put_value(&mut self, v: &Value, cfg: &EncodeConfig);
}

#[inline]
fn number_header(kind: NumKind, width: Width) -> u8 {
    header(TYPE_NUMBER, kind.bits(), width.index())
}

/// Packs booleans eight to a byte, least significant bit first.
pub(crate) fn pack_bools(bs: &[bool]) -> SmallVec<[u8; 16]> {
    let mut out = SmallVec::from_elem(0u8, (bs.len() + 7) / 8);
    for (i, b) in bs.iter().enumerate() {
        if *b {
            out[i / 8] |= 1 << (i % 8);
        }
    }
    out
}

/// Little-endian bytes of an integer key, truncated to `width`.
#[inline]
fn put_key<S: Serializer>(out: &mut S, bits: u128, width: Width) {
    out.put_slice(&bits.to_le_bytes()[..width.bytes()])
}

fn put_int_keyed<S: Serializer, K: Copy>(
    out: &mut S,
    m: &VecMap<K, Value>,
    kind: NumKind,
    width: Width,
    bits: impl Fn(K) -> u128,
    cfg: &EncodeConfig,
) {
    out.put_u8(header(TYPE_OBJECT, kind.bits(), width.index()));
    out.put_size(m.len());
    for (k, v) in m.iter() {
        put_key(out, bits(*k), width);
        out.put_value(v, cfg);
    }
}

/// Tries to write `vs` as a typed array, returning whether it did.
fn try_put_typed<S: Serializer>(out: &mut S, vs: &[Value]) -> bool {
    match vs.first() {
        Some(Value::Bool(_)) => {
            let bools: Option<Vec<bool>> = vs
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            match bools {
                Some(bs) => {
                    out.put_bools(&bs);
                    true
                }
                None => false,
            }
        }
        Some(Value::Text(_)) => {
            let strs: Option<Vec<&str>> = vs
                .iter()
                .map(|v| match v {
                    Value::Text(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect();
            match strs {
                Some(ss) => {
                    out.put_strs(&ss[..]);
                    true
                }
                None => false,
            }
        }
        Some(Value::Number(_)) => {
            let nums: Option<Vec<Number>> = vs
                .iter()
                .map(|v| match v {
                    Value::Number(n) => Some(*n),
                    _ => None,
                })
                .collect();
            let arr = nums.and_then(|ns| {
                NumericArray::from_numbers(&ns)
                    .or_else(|_| NumericArray::unify_integers(&ns))
                    .ok()
            });
            match arr {
                Some(arr) => {
                    out.put_numeric(&arr);
                    true
                }
                None => false,
            }
        }
        _ => false,
    }
}

/// Tries to write `vs` as a typed object array, returning whether it did.
fn try_put_objects<S: Serializer>(out: &mut S, vs: &[Value], cfg: &EncodeConfig) -> bool {
    match vs.first() {
        Some(Value::Object(Object::Text(_))) => (),
        _ => return false,
    }
    match TypedObjectArray::from_rows(vs) {
        Ok(toa) => {
            put_extension(out, &Extension::TypedObjectArray(toa), cfg);
            true
        }
        Err(e) => {
            debug!(error = %e, rows = vs.len(), "writing objects as a generic array");
            false
        }
    }
}

impl<S: Serializer> SerializerExt for S {
    #[inline]
    fn put_size(&mut self, n: usize) { var_size::write(n as u64, self) }

    fn put_null(&mut self) { self.put_u8(NULL) }

    fn put_bool(&mut self, b: bool) {
        if b {
            self.put_u8(TRUE)
        } else {
            self.put_u8(FALSE)
        }
    }

    fn put_number(&mut self, n: &Number) {
        self.put_u8(number_header(n.kind(), n.width()));
        self.put_slice(&n.to_le_bytes());
    }

    fn put_bare_str(&mut self, s: &str) {
        self.put_size(s.len());
        self.put_slice(s.as_bytes());
    }

    fn put_str(&mut self, s: &str) {
        self.put_u8(TYPE_STRING);
        self.put_bare_str(s);
    }

    fn put_binary(&mut self, b: &Bytes) {
        self.put_u8(header(TYPE_TYPED_ARRAY, NumKind::Unsigned.bits(), Width::W1.index()));
        self.put_size(b.len());
        self.put_slice(b);
    }

    fn put_numeric(&mut self, arr: &NumericArray) {
        self.put_u8(header(TYPE_TYPED_ARRAY, arr.kind().bits(), arr.width().index()));
        self.put_size(arr.len());
        self.put_slice(arr.data());
    }

    fn put_bools(&mut self, bs: &[bool]) {
        self.put_u8(header(TYPE_TYPED_ARRAY, KIND_BOOL_OR_STRING, 0));
        self.put_size(bs.len());
        self.put_slice(&pack_bools(bs));
    }

    fn put_strs<T: AsRef<str>>(&mut self, ss: &[T]) {
        self.put_u8(header(TYPE_TYPED_ARRAY, KIND_BOOL_OR_STRING, 0) | STRING_ARRAY_BIT);
        self.put_size(ss.len());
        for s in ss {
            self.put_bare_str(s.as_ref());
        }
    }

    fn put_typed(&mut self, t: &TypedArray) {
        match t {
            TypedArray::Numeric(arr) => self.put_numeric(arr),
            TypedArray::Bool(bs) => self.put_bools(bs),
            TypedArray::Text(ss) => self.put_strs(ss.as_slice()),
        }
    }

    fn put_object(&mut self, o: &Object, cfg: &EncodeConfig) {
        match o {
            Object::Text(m) => {
                self.put_u8(header(TYPE_OBJECT, KEY_STRING, 0));
                self.put_size(m.len());
                for (k, v) in m.iter() {
                    self.put_bare_str(k);
                    self.put_value(v, cfg);
                }
            }
            Object::Signed(m) => {
                let width = m
                    .keys()
                    .map(|k| Width::for_signed(*k))
                    .max()
                    .unwrap_or(Width::W1);
                put_int_keyed(self, m, NumKind::Signed, width, |k| k as u128, cfg)
            }
            Object::Unsigned(m) => {
                let width = Width::for_unsigned(m.keys().copied().max().unwrap_or(0));
                put_int_keyed(self, m, NumKind::Unsigned, width, |k| k, cfg)
            }
        }
    }

    fn put_array(&mut self, vs: &[Value], cfg: &EncodeConfig) {
        if cfg.typed_object_arrays && try_put_objects(self, vs, cfg) {
            return;
        }
        if cfg.typed_arrays && try_put_typed(self, vs) {
            return;
        }
        self.put_u8(TYPE_GENERIC_ARRAY);
        self.put_size(vs.len());
        for v in vs {
            self.put_value(v, cfg);
        }
    }

    fn put_value(&mut self, v: &Value, cfg: &EncodeConfig) {
        match v {
            Value::Null => self.put_null(),
            Value::Bool(b) => self.put_bool(*b),
            Value::Number(n) => self.put_number(n),
            Value::Text(s) => self.put_str(s),
            Value::Binary(b) => self.put_binary(b),
            Value::Object(o) => self.put_object(o, cfg),
            Value::Array(Array::Generic(vs)) => self.put_array(vs, cfg),
            Value::Array(Array::Typed(t)) => self.put_typed(t),
            Value::Extension(e) => put_extension(self, e, cfg),
        }
    }
}

/// A value that can be serialized.
pub trait Ser {
    /// Writes `self` to `out`.
    fn ser<S: Serializer>(&self, out: &mut S, cfg: &EncodeConfig);
}

impl Ser for Value {
    fn ser<S: Serializer>(&self, out: &mut S, cfg: &EncodeConfig) { out.put_value(self, cfg) }
}

impl<T: Ser + ?Sized> Ser for &T {
    fn ser<S: Serializer>(&self, out: &mut S, cfg: &EncodeConfig) { (*self).ser(out, cfg) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_packing() {
        assert_eq!(pack_bools(&[true, false, true]).as_slice(), &[0b101]);
        assert_eq!(pack_bools(&[true; 9]).as_slice(), &[0xff, 0x01]);
        assert!(pack_bools(&[]).is_empty());
    }

    #[test]
    fn signed_keys_use_narrowest_width() {
        let m: VecMap<i128, Value> = vec![(-1, Value::Null), (300, Value::Null)].into();
        let out = &mut Vec::new();
        out.put_object(&Object::Signed(m), &EncodeConfig::default());
        // signed keys, 2 bytes
        assert_eq!(out[0], 0b001_01_011);
        assert_eq!(out[1], 2 << 2);
        assert_eq!(out[2..4], [0xff, 0xff]);
        assert_eq!(out[4], NULL);
        assert_eq!(out[5..7], [0x2c, 0x01]);
    }

    #[test]
    fn promotion_can_be_disabled() {
        let vs = vec![Value::from(1u8), Value::from(2u8)];
        let cfg = EncodeConfig::default().typed_arrays(false);
        let out = &mut Vec::new();
        out.put_array(&vs, &cfg);
        assert_eq!(out[0], TYPE_GENERIC_ARRAY);

        let out = &mut Vec::new();
        out.put_array(&vs, &EncodeConfig::default());
        assert_eq!(out[0], header(TYPE_TYPED_ARRAY, 2, 0));
    }

    #[test]
    fn mixed_arrays_stay_generic() {
        let out = &mut Vec::new();
        out.put_array(
            &[Value::from(1u8), Value::from(0.5)],
            &EncodeConfig::default(),
        );
        assert_eq!(out[0], TYPE_GENERIC_ARRAY);

        let out = &mut Vec::new();
        out.put_array(&[], &EncodeConfig::default());
        assert_eq!(out.as_slice(), &[TYPE_GENERIC_ARRAY, 0]);
    }
}
