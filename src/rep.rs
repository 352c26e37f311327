use crate::{
    errors::{Error, Result},
    extension::{Duration, Extension, Timestamp, Uuid, Variant},
    float::Float,
    typed::{NumericArray, TypedArray},
    vecmap::VecMap,
    Array, Object, Value,
};
use bytes::Bytes;
use half::f16;
use std::{
    collections::{BTreeMap, HashMap},
    convert::TryFrom,
    hash::BuildHasher,
    vec::IntoIter,
};

/// A value representable as a [`Value`].
pub trait BeveRep: Clone + Sized {
    /// Converts value into a [`Value`].
    ///
    /// # Example
    ///
    /// ```
    /// use beve::rep::*;
    ///
    /// let v_num = 1.to_beve();
    /// ```
    fn to_beve(&self) -> Value { self.clone().into_beve() }

    /// Consumes value, converting it into a [`Value`].
    ///
    /// # Example
    ///
    /// ```
    /// use beve::rep::*;
    ///
    /// let v_num = 1.into_beve();
    /// ```
    fn into_beve(self) -> Value { self.to_beve() }

    /// Converts value from a [`Value`].
    ///
    /// # Arguments
    ///
    /// `v: Value` - The value to be converted.
    ///
    /// # Example
    ///
    /// ```
    /// use beve::rep::*;
    ///
    /// let v_str = "foo".to_string().into_beve();
    ///
    /// assert_eq!(String::from_beve(v_str).unwrap(), "foo");
    /// ```
    fn from_beve(v: Value) -> Result<Self>;

    /// Converts a vector of these. Numeric primitives override this to produce a typed
    /// array.
    #[doc(hidden)]
    fn vec_into_beve(v: Vec<Self>) -> Value {
        Value::Array(Array::Generic(v.into_iter().map(Self::into_beve).collect()))
    }

    /// Inverse of [`BeveRep::vec_into_beve`].
    #[doc(hidden)]
    fn vec_from_beve(v: Value) -> Result<Vec<Self>> {
        v.into_vec()?.into_iter().map(Self::from_beve).collect()
    }
}

fn expected<T>(what: &str, found: &Value) -> Result<T> {
    bail_conversion!("expected {}, found {}", what, found.type_name())
}

impl BeveRep for Value {
    fn into_beve(self) -> Value { self }

    fn from_beve(v: Value) -> Result<Self> { Ok(v) }
}

impl BeveRep for bool {
    fn into_beve(self) -> Value { Value::Bool(self) }

    fn from_beve(v: Value) -> Result<Self> { v.to_bool() }

    fn vec_into_beve(v: Vec<bool>) -> Value { Value::from(TypedArray::Bool(v)) }
}

/// Vectors of numeric primitives go straight to and from typed arrays.
macro_rules! numeric_vec {
    ($t:ty) => {
        fn vec_into_beve(v: Vec<$t>) -> Value { Value::from(NumericArray::from_slice(&v)) }

        fn vec_from_beve(v: Value) -> Result<Vec<$t>> {
            if let Value::Array(Array::Typed(TypedArray::Numeric(n))) = &v {
                if let Some(out) = n.to_vec::<$t>() {
                    return Ok(out);
                }
            }
            v.into_vec()?.into_iter().map(<$t>::from_beve).collect()
        }
    };
}

macro_rules! int_rep {
    ($via:ident, $($t:ty),*) => {
        $(
            impl BeveRep for $t {
                fn into_beve(self) -> Value { Value::from(self) }

                fn from_beve(v: Value) -> Result<Self> {
                    let n = v.to_number()?;
                    match n.$via().and_then(|i| <$t>::try_from(i).ok()) {
                        Some(i) => Ok(i),
                        None => bail_conversion!("{} doesn't fit in `{}`", n, stringify!($t)),
                    }
                }

                numeric_vec!($t);
            }
        )*
    };
}

int_rep!(to_i128, i8, i16, i32, i64, i128);
int_rep!(to_u128, u8, u16, u32, u64, u128);

// pointer-sized integers travel as their 64-bit counterparts
impl BeveRep for usize {
    fn into_beve(self) -> Value { Value::from(self as u64) }

    fn from_beve(v: Value) -> Result<Self> {
        let u = u64::from_beve(v)?;
        usize::try_from(u).map_err(|_| Error::Conversion(format!("{} doesn't fit in `usize`", u)))
    }
}

impl BeveRep for isize {
    fn into_beve(self) -> Value { Value::from(self as i64) }

    fn from_beve(v: Value) -> Result<Self> {
        let i = i64::from_beve(v)?;
        isize::try_from(i).map_err(|_| Error::Conversion(format!("{} doesn't fit in `isize`", i)))
    }
}

impl BeveRep for f64 {
    fn into_beve(self) -> Value { Value::from(self) }

    fn from_beve(v: Value) -> Result<Self> {
        let n = v.to_number()?;
        match n.to_f64() {
            Some(f) => Ok(f),
            None => bail_conversion!("{} has no `f64` representation", n),
        }
    }

    numeric_vec!(f64);
}

impl BeveRep for f32 {
    fn into_beve(self) -> Value { Value::from(self) }

    fn from_beve(v: Value) -> Result<Self> {
        let n = v.to_number()?;
        let exact = n.as_float().and_then(|f| f32::try_from(f).ok());
        match exact.or_else(|| n.to_f64().map(|f| f as f32)) {
            Some(f) => Ok(f),
            None => bail_conversion!("{} has no `f32` representation", n),
        }
    }

    numeric_vec!(f32);
}

impl BeveRep for f16 {
    fn into_beve(self) -> Value { Value::from(self) }

    fn from_beve(v: Value) -> Result<Self> {
        let n = v.to_number()?;
        match n.as_float().map(f16::try_from) {
            Some(Ok(f)) => Ok(f),
            _ => bail_conversion!("{} is not a half precision float", n),
        }
    }

    numeric_vec!(f16);
}

impl BeveRep for Float {
    fn into_beve(self) -> Value { Value::from(self) }

    fn from_beve(v: Value) -> Result<Self> {
        match v.to_number()?.as_float() {
            Some(f) => Ok(f),
            None => expected("a float", &v),
        }
    }
}

impl BeveRep for String {
    fn into_beve(self) -> Value { Value::Text(self) }

    fn from_beve(v: Value) -> Result<Self> {
        match v {
            Value::Text(s) => Ok(s),
            other => expected("text", &other),
        }
    }

    fn vec_into_beve(v: Vec<String>) -> Value { Value::from(TypedArray::Text(v)) }
}

impl BeveRep for Bytes {
    fn into_beve(self) -> Value { Value::Binary(self) }

    fn from_beve(v: Value) -> Result<Self> {
        match v {
            Value::Binary(b) => Ok(b),
            other => Ok(Bytes::from(u8::vec_from_beve(other)?)),
        }
    }
}

impl<T: BeveRep> BeveRep for Vec<T> {
    fn into_beve(self) -> Value { T::vec_into_beve(self) }

    fn from_beve(v: Value) -> Result<Self> { T::vec_from_beve(v) }
}

impl<T: BeveRep> BeveRep for Option<T> {
    fn into_beve(self) -> Value { self.map_or(Value::Null, T::into_beve) }

    fn to_beve(&self) -> Value { self.as_ref().map_or(Value::Null, T::to_beve) }

    fn from_beve(v: Value) -> Result<Self> {
        match v {
            Value::Null => Ok(None),
            other => T::from_beve(other).map(Some),
        }
    }
}

impl<T: BeveRep> BeveRep for VecMap<String, T> {
    fn into_beve(self) -> Value { Value::Object(Object::Text(self.map_values(T::into_beve))) }

    fn to_beve(&self) -> Value {
        Value::Object(Object::Text(
            self.iter().map(|(k, v)| (k.clone(), v.to_beve())).collect(),
        ))
    }

    fn from_beve(v: Value) -> Result<Self> {
        v.into_object()?
            .into_text_keys()
            .into_iter()
            .map(|(k, v)| Ok((k, T::from_beve(v)?)))
            .collect()
    }
}

impl<T: BeveRep, S: BuildHasher + Default + Clone> BeveRep for HashMap<String, T, S> {
    fn into_beve(self) -> Value {
        Value::Object(Object::Text(
            self.into_iter().map(|(k, v)| (k, v.into_beve())).collect(),
        ))
    }

    fn from_beve(v: Value) -> Result<Self> {
        v.into_object()?
            .into_text_keys()
            .into_iter()
            .map(|(k, v)| Ok((k, T::from_beve(v)?)))
            .collect()
    }
}

impl<T: BeveRep> BeveRep for BTreeMap<String, T> {
    fn into_beve(self) -> Value {
        Value::Object(Object::Text(
            self.into_iter().map(|(k, v)| (k, v.into_beve())).collect(),
        ))
    }

    fn from_beve(v: Value) -> Result<Self> {
        v.into_object()?
            .into_text_keys()
            .into_iter()
            .map(|(k, v)| Ok((k, T::from_beve(v)?)))
            .collect()
    }
}

/// Integer-keyed maps become objects with signed keys.
impl<K, T> BeveRep for BTreeMap<K, T>
where
    K: IntKey + Into<i128> + TryFrom<i128> + Ord + Copy,
    T: BeveRep,
{
    fn into_beve(self) -> Value {
        Value::Object(Object::Signed(
            self.into_iter().map(|(k, v)| (k.into(), v.into_beve())).collect(),
        ))
    }

    fn from_beve(v: Value) -> Result<Self> {
        let pairs: Vec<(i128, Value)> = match v.into_object()? {
            Object::Signed(m) => m.into_vec(),
            Object::Unsigned(m) => m
                .into_vec()
                .into_iter()
                .map(|(k, v)| match i128::try_from(k) {
                    Ok(k) => Ok((k, v)),
                    Err(_) => bail_conversion!("key {} is out of range", k),
                })
                .collect::<Result<_>>()?,
            Object::Text(_) => bail_conversion!("expected integer keys, found text keys"),
        };
        pairs
            .into_iter()
            .map(|(k, v)| match K::try_from(k) {
                Ok(key) => Ok((key, T::from_beve(v)?)),
                Err(_) => bail_conversion!("key {} is out of range", k),
            })
            .collect()
    }
}

/// Integer types usable as object keys.
pub trait IntKey {}

macro_rules! int_key {
    ($($t:ty),*) => { $(impl IntKey for $t {})* };
}

int_key!(i8, i16, i32, i64, u8, u16, u32, u64);

impl BeveRep for () {
    fn into_beve(self) -> Value { Value::Array(Array::Generic(vec![])) }

    fn from_beve(v: Value) -> Result<()> {
        let vs = v.into_vec()?;
        if vs.is_empty() {
            Ok(())
        } else {
            bail_conversion!("expected an empty array, found {} elements", vs.len())
        }
    }
}

macro_rules! tuple_rep {
    ($len:expr; $($t:ident . $i:tt),*) => {
        impl<$($t: BeveRep),*> BeveRep for ($($t,)*) {
            fn into_beve(self) -> Value {
                Value::Array(Array::Generic(vec![$(self.$i.into_beve()),*]))
            }

            fn from_beve(v: Value) -> Result<Self> {
                let mut iter = tuple_from_beve_helper(v, $len)?;
                Ok(($(pop_beve::<$t>(&mut iter)?,)*))
            }
        }
    };
}

tuple_rep!(1; A.0);
tuple_rep!(2; A.0, B.1);
tuple_rep!(3; A.0, B.1, C.2);
tuple_rep!(4; A.0, B.1, C.2, D.3);

macro_rules! extension_rep {
    ($t:ident, $what:expr) => {
        impl BeveRep for $t {
            fn into_beve(self) -> Value { Value::from(self) }

            fn from_beve(v: Value) -> Result<Self> {
                match v {
                    Value::Extension(Extension::$t(x)) => Ok(x),
                    other => expected($what, &other),
                }
            }
        }
    };
}

extension_rep!(Timestamp, "a timestamp");
extension_rep!(Duration, "a duration");
extension_rep!(Uuid, "a uuid");

impl BeveRep for std::time::Duration {
    fn into_beve(self) -> Value { Value::from(Duration::from(self)) }

    fn from_beve(v: Value) -> Result<Self> { std::time::Duration::try_from(Duration::from_beve(v)?) }
}

/// Manually specify how the fields of a struct should be converted to a [`Value`].
/// Usually, you should just add `#[derive(BeveRep)]` to your struct definition instead
/// of doing it manually.
///
/// # Arguments
///
/// * `entries: Vec<(&str, Value)>` - The name of each field and its value, in
///   declaration order.
///
/// # Examples
///
/// An example using `#[derive(BeveRep)]`.
///
/// ```
/// use beve::{beve_macro::*, rep::*};
///
/// #[derive(BeveRep, Clone)]
/// /// This is a silly struct.
/// struct SillyStruct {
///     foo: String,
///     bar: u8,
/// }
///
/// let example = SillyStruct {
///     foo: "hello world".to_string(),
///     bar: 0,
/// };
///
/// let extracted = SillyStruct::from_beve(example.to_beve()).unwrap();
///
/// assert_eq!(extracted.foo, example.foo);
/// assert_eq!(extracted.bar, example.bar);
/// ```
///
/// An example of how this might be done manually.
///
/// ```
/// use beve::{errors::Result, rep::*, Value};
///
/// #[derive(Clone)]
/// struct SillyStruct {
///     foo: String,
///     bar: u8,
/// }
///
/// impl BeveRep for SillyStruct {
///     fn to_beve(&self) -> Value {
///         struct_to_beve_helper(vec![
///             ("foo", self.foo.to_beve()),
///             ("bar", self.bar.to_beve()),
///         ])
///     }
///
///     fn from_beve(v: Value) -> Result<SillyStruct> {
///         let mut fields = struct_from_beve_helper(v, &["foo", "bar"])?;
///         Ok(SillyStruct {
///             foo: pop_beve(&mut fields)?,
///             bar: pop_beve(&mut fields)?,
///         })
///     }
/// }
///
/// let example = SillyStruct {
///     foo: "hello world".to_string(),
///     bar: 0,
/// };
///
/// let extracted = SillyStruct::from_beve(example.to_beve()).unwrap();
///
/// assert_eq!(extracted.foo, example.foo);
/// assert_eq!(extracted.bar, example.bar);
/// ```
///
/// If you find this tedious and repetitive (we do), please see the previous example.
pub fn struct_to_beve_helper(entries: Vec<(&str, Value)>) -> Value {
    Value::Object(Object::Text(VecMap::from_pairs_unchecked(
        entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect(),
    )))
}

/// Manually specify how the fields of a struct should be read from a [`Value`].
/// Usually, you should just add `#[derive(BeveRep)]` to your struct definition instead
/// of doing it manually. See [`struct_to_beve_helper`] for an example of usage.
///
/// Returns the field values in the order of `names`, failing if the object is missing
/// one of them or has any others.
///
/// # Arguments
///
/// * `v: Value` - The object holding the struct data.
/// * `names: &[&str]` - The names of the fields in the order they are to be extracted.
pub fn struct_from_beve_helper(v: Value, names: &[&str]) -> Result<IntoIter<Value>> {
    let mut m = match v.into_object()? {
        Object::Text(m) => m,
        _ => bail_conversion!("struct fields must have text keys"),
    };
    let mut out = Vec::with_capacity(names.len());
    for n in names {
        match m.remove(*n) {
            Some(v) => out.push(v),
            None => bail_conversion!("missing field `{}`", n),
        }
    }
    if !m.is_empty() {
        bail_conversion!(
            "found {} unexpected fields, first `{}`",
            m.len(),
            m.keys().next().map_or("", String::as_str)
        );
    }
    Ok(out.into_iter())
}

/// Checks that `v` is an array of exactly `len` elements and iterates over them.
pub fn tuple_from_beve_helper(v: Value, len: usize) -> Result<IntoIter<Value>> {
    let vs = v.into_vec()?;
    if vs.len() != len {
        bail_conversion!("expected {} elements, found {}", len, vs.len());
    }
    Ok(vs.into_iter())
}

/// Manually specify how a variant of an enum should be converted to a [`Value`].
/// Usually, you should just add `#[derive(BeveRep)]` to your enum definition instead of
/// doing it manually.
///
/// # Arguments
///
/// * `tag: u64` - The index of the variant.
/// * `payload: Value` - The variant's data: null for a unit variant.
///
/// # Example
///
/// ```
/// use beve::{errors::Result, rep::*, Value};
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum SillyEnum {
///     Foo(String),
///     Bar,
/// }
///
/// impl BeveRep for SillyEnum {
///     fn to_beve(&self) -> Value {
///         match self {
///             SillyEnum::Foo(s) => enum_to_beve_helper(0, s.to_beve()),
///             SillyEnum::Bar => enum_to_beve_helper(1, Value::Null),
///         }
///     }
///
///     fn from_beve(v: Value) -> Result<SillyEnum> {
///         match enum_from_beve_helper(v)? {
///             (0, payload) => Ok(SillyEnum::Foo(String::from_beve(payload)?)),
///             (1, _) => Ok(SillyEnum::Bar),
///             (tag, _) => Err(unknown_variant(tag, "SillyEnum")),
///         }
///     }
/// }
///
/// let foo = SillyEnum::Foo("hello".to_string());
/// assert_eq!(SillyEnum::from_beve(foo.to_beve()).unwrap(), foo);
/// ```
pub fn enum_to_beve_helper(index: u32, payload: Value) -> Value {
    Value::Extension(Extension::Variant(Variant::with_index(index, payload)))
}

/// Splits a variant extension into its tag and payload.
pub fn enum_from_beve_helper(v: Value) -> Result<(u64, Value)> {
    match v {
        Value::Extension(Extension::Variant(v)) => Ok(v.into_parts()),
        other => expected("a variant", &other),
    }
}

/// The error for a variant tag an enum doesn't have.
pub fn unknown_variant(tag: u64, name: &str) -> Error {
    Error::Conversion(format!("`{}` has no variant with tag {}", name, tag))
}

/// Gets the next element from an iterator of values as `T`.
///
/// # Arguments
///
/// * `iter: &mut IntoIter<Value>` - An iterator of values to be converted into `T`.
///
/// # Example
///
/// ```
/// use beve::{rep::*, Value};
///
/// let values = Value::from(vec![1u8, 2, 3]).into_vec().unwrap();
///
/// let first: u8 = pop_beve(&mut values.into_iter()).unwrap();
/// assert_eq!(first, 1);
/// ```
pub fn pop_beve<T: BeveRep>(iter: &mut IntoIter<Value>) -> Result<T> {
    match iter.next() {
        Some(v) => T::from_beve(v),
        None => bail_conversion!("ran out of elements"),
    }
}

/// Checks that a unit variant or unit struct carries nothing.
pub fn unit_from_beve_helper(v: Value, name: &str) -> Result<()> {
    if v.is_null() {
        Ok(())
    } else {
        bail_conversion!("`{}` carries no data, found {}", name, v.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beve_macro::*;

    #[test]
    fn unit_struct() {
        #[derive(BeveRep, Clone)]
        struct UnitStruct;

        assert!(UnitStruct.to_beve().is_null());
        assert!(UnitStruct::from_beve(UnitStruct.into_beve()).is_ok());
        assert!(UnitStruct::from_beve(Value::from(1)).is_err());
    }

    #[test]
    fn c_struct() {
        #[derive(BeveRep, Clone, Debug, PartialEq)]
        struct CStruct {
            foo: u8,
            bar: Vec<f32>,
        }

        let c_struct = CStruct {
            foo: 1,
            bar: vec![0.5, 1.5],
        };

        // fields in declaration order
        match c_struct.to_beve() {
            Value::Object(Object::Text(m)) => {
                let keys: Vec<&String> = m.keys().collect();
                assert_eq!(keys, vec!["foo", "bar"]);
                match m.get("bar") {
                    Some(Value::Array(Array::Typed(TypedArray::Numeric(_)))) => (),
                    other => panic!("{:?}", other),
                }
            }
            other => panic!("{:?}", other),
        }

        assert_eq!(CStruct::from_beve(c_struct.to_beve()).unwrap(), c_struct);

        // an extra field
        let mut o = c_struct.to_beve().into_object().unwrap();
        o.insert("baz", 1);
        assert!(CStruct::from_beve(Value::from(o)).is_err());
    }

    #[test]
    fn tuple_struct() {
        #[derive(BeveRep, Clone, Debug, PartialEq)]
        struct Foo(u8, String);

        let foo = Foo(1, "hello".to_string());
        assert_eq!(foo.to_beve(), Value::from(vec![Value::from(1u8), Value::from("hello")]));
        assert_eq!(Foo::from_beve(foo.to_beve()).unwrap(), foo);
        assert!(Foo::from_beve(Value::from(vec![1u8])).is_err());
    }

    #[test]
    fn enums() {
        #[derive(BeveRep, Clone, Debug, PartialEq)]
        enum Named {
            Empty,
            One(u8),
            Two(u8, String),
            Fields { num: u8, text: String },
        }

        let cases = vec![
            Named::Empty,
            Named::One(7),
            Named::Two(1, "hello".to_string()),
            Named::Fields {
                num: 2,
                text: "world".to_string(),
            },
        ];
        for (i, case) in cases.into_iter().enumerate() {
            let v = case.to_beve();
            match &v {
                Value::Extension(Extension::Variant(v)) => assert_eq!(v.tag(), i as u64),
                other => panic!("{:?}", other),
            }
            assert_eq!(Named::from_beve(v).unwrap(), case);
        }

        match Named::One(7).into_beve() {
            Value::Extension(Extension::Variant(v)) => assert_eq!(v.value(), &Value::from(7u8)),
            other => panic!("{:?}", other),
        }
        assert!(Named::from_beve(enum_to_beve_helper(4, Value::Null)).is_err());
    }

    #[test]
    fn generics() {
        #[derive(BeveRep, Clone, Debug, PartialEq)]
        struct Pair<T> {
            left: T,
            right: T,
        }

        let p = Pair {
            left: Some(1u32),
            right: None,
        };
        assert_eq!(Pair::from_beve(p.to_beve()).unwrap(), p);
    }

    #[test]
    fn numbers() {
        assert_eq!(u8::from_beve(Value::from(200u64)).unwrap(), 200);
        assert!(u8::from_beve(Value::from(300u64)).is_err());
        assert!(u32::from_beve(Value::from(-1)).is_err());
        assert_eq!(i64::from_beve(Value::from(3.0)).unwrap(), 3);
        assert!(i64::from_beve(Value::from(3.5)).is_err());
        assert_eq!(f64::from_beve(Value::from(3u8)).unwrap(), 3.0);
        assert_eq!(usize::from_beve(5usize.to_beve()).unwrap(), 5);
        assert_eq!(
            f16::from_beve(f16::from_f32(0.5).to_beve()).unwrap(),
            f16::from_f32(0.5)
        );
    }

    #[test]
    fn vectors() {
        let v = vec![1i16, -2, 3];
        match v.to_beve() {
            Value::Array(Array::Typed(TypedArray::Numeric(n))) => {
                assert_eq!(n.to_vec::<i16>(), Some(v.clone()))
            }
            other => panic!("{:?}", other),
        }
        assert_eq!(Vec::<i16>::from_beve(v.to_beve()).unwrap(), v);

        // widening through the generic path
        let generic = Value::from(vec![Value::from(1u8), Value::from(2u16)]);
        assert_eq!(Vec::<u32>::from_beve(generic).unwrap(), vec![1, 2]);

        let bools = vec![true, false];
        assert_eq!(Vec::<bool>::from_beve(bools.to_beve()).unwrap(), bools);

        let bs = Bytes::from_static(b"abc");
        assert_eq!(Vec::<u8>::from_beve(bs.to_beve()).unwrap(), b"abc".to_vec());
        assert_eq!(Bytes::from_beve(vec![1u8, 2].to_beve()).unwrap(), Bytes::from_static(&[1, 2]));
    }

    #[test]
    fn maps_and_tuples() {
        let mut m = BTreeMap::new();
        m.insert("a".to_string(), (1u8, "x".to_string()));
        assert_eq!(BTreeMap::<String, (u8, String)>::from_beve(m.to_beve()).unwrap(), m);

        let mut h: HashMap<String, Option<bool>> = HashMap::new();
        h.insert("yes".to_string(), Some(true));
        h.insert("unknown".to_string(), None);
        assert_eq!(HashMap::<String, Option<bool>>::from_beve(h.to_beve()).unwrap(), h);

        let mut ints = BTreeMap::new();
        ints.insert(-3i32, "minus three".to_string());
        match ints.to_beve() {
            Value::Object(Object::Signed(_)) => (),
            other => panic!("{:?}", other),
        }
        assert_eq!(BTreeMap::<i32, String>::from_beve(ints.to_beve()).unwrap(), ints);

        assert!(<()>::from_beve(().to_beve()).is_ok());
        let t = (1u8, 2i64, "three".to_string(), 4.0f64);
        assert_eq!(<(u8, i64, String, f64)>::from_beve(t.to_beve()).unwrap(), t);
    }

    #[test]
    fn time() {
        let d = std::time::Duration::from_millis(1500);
        assert_eq!(std::time::Duration::from_beve(d.to_beve()).unwrap(), d);
        assert!(std::time::Duration::from_beve(Duration::new(-1, 0).to_beve()).is_err());

        let t = Timestamp::new(1_697_550_000, 0);
        assert_eq!(Timestamp::from_beve(t.to_beve()).unwrap(), t);
        assert!(Uuid::from_beve(t.to_beve()).is_err());
    }
}
