//! Conversions between [`Value`] and [`serde_json::Value`].
//!
//! JSON numbers are classified like native doubles (see [`Number::from_f64`]): integers
//! take the narrowest width that holds them.
//!
//! Going the other way, BEVE-only shapes are mapped as follows:
//!
//! | BEVE                   | JSON                                  |
//! | ---                    | ---                                   |
//! | binary, typed arrays   | array                                 |
//! | integer object keys    | decimal string keys                   |
//! | variant                | `{"tag": <tag>, "value": <value>}`    |
//! | typed object array     | array of objects                      |
//! | UUID                   | hyphenated string                     |
//!
//! Non-finite floats, integers outside the `i64`/`u64` range and the remaining
//! extensions have no JSON form and fail with [`Error::Conversion`].

use crate::{errors::*, extension::Extension, number::Number, Array, Object, Value};
use serde_json::{Map, Value as Json};
use std::convert::TryFrom;

impl From<&Json> for Value {
    fn from(j: &Json) -> Value {
        match j {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Number(json_number(n)),
            Json::String(s) => Value::Text(s.clone()),
            Json::Array(vs) => Value::Array(Array::Generic(vs.iter().map(Value::from).collect())),
            Json::Object(m) => Value::Object(Object::Text(
                m.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect(),
            )),
        }
    }
}

impl From<Json> for Value {
    fn from(j: Json) -> Value { Value::from(&j) }
}

fn json_number(n: &serde_json::Number) -> Number {
    if let Some(u) = n.as_u64() {
        Number::from_u128(u as u128)
    } else if let Some(i) = n.as_i64() {
        Number::from_i128(i as i128)
    } else {
        Number::from_f64(n.as_f64().unwrap_or(std::f64::NAN))
    }
}

fn number_to_json(n: &Number) -> Result<Json> {
    if n.is_integer() {
        if let Some(u) = n.to_u128() {
            if u <= u64::max_value() as u128 {
                return Ok(Json::from(u as u64));
            }
        } else if let Some(i) = n.to_i128() {
            if i >= i64::min_value() as i128 {
                return Ok(Json::from(i as i64));
            }
        }
        bail_conversion!("integer {:?} is out of range for JSON", n)
    }
    match n.to_f64().and_then(serde_json::Number::from_f64) {
        Some(f) => Ok(Json::Number(f)),
        None => bail_conversion!("float {:?} has no JSON form", n),
    }
}

fn array_to_json(vs: Vec<Value>) -> Result<Json> {
    vs.into_iter()
        .map(Json::try_from)
        .collect::<Result<Vec<_>>>()
        .map(Json::Array)
}

impl TryFrom<Value> for Json {
    type Error = Error;

    fn try_from(v: Value) -> Result<Json> {
        match v {
            Value::Null => Ok(Json::Null),
            Value::Bool(b) => Ok(Json::Bool(b)),
            Value::Number(n) => number_to_json(&n),
            Value::Text(s) => Ok(Json::String(s)),
            Value::Binary(b) => Ok(Json::Array(b.iter().map(|x| Json::from(*x)).collect())),
            Value::Array(a) => array_to_json(a.into_values()),
            Value::Object(o) => {
                let mut m = Map::new();
                for (k, v) in o.into_text_keys() {
                    m.insert(k, Json::try_from(v)?);
                }
                Ok(Json::Object(m))
            }
            Value::Extension(e) => extension_to_json(e),
        }
    }
}

fn extension_to_json(e: Extension) -> Result<Json> {
    match e {
        Extension::Variant(v) => {
            let (tag, value) = v.into_parts();
            let mut m = Map::new();
            m.insert("tag".to_owned(), Json::from(tag));
            m.insert("value".to_owned(), Json::try_from(value)?);
            Ok(Json::Object(m))
        }
        Extension::TypedObjectArray(t) => array_to_json(t.into_objects()),
        Extension::Uuid(u) => Ok(Json::String(u.to_string())),
        other => bail_conversion!("{:?} has no JSON form", other),
    }
}
