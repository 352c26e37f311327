use beve::{
    encoding::{constants::*, *},
    extension::{Extension, TypedObjectArray},
    config::EncodeConfig,
    Value,
};
use beve_strategy::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 300, ..ProptestConfig::default() })]

    #[test]
    fn promoted_rows_decode_to_the_same_objects(rows in arb_rows()) {
        let v = Value::from(rows.clone());
        let enc = encode_with(&v, &EncodeConfig::new().typed_object_arrays(true));
        prop_assert_eq!(enc[0], ext_header(EXT_TYPED_OBJECT_ARRAY));

        let dec = decode_full(&enc).unwrap();
        prop_assert_eq!(&dec, &v);

        match dec {
            Value::Extension(Extension::TypedObjectArray(toa)) => {
                prop_assert_eq!(toa.len(), rows.len());
                prop_assert_eq!(Value::from(toa.into_objects()), v);
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn explicit_extension_matches_generic(rows in arb_rows()) {
        let toa = TypedObjectArray::from_rows(&rows).unwrap();
        let enc = encode_full(&Value::from(toa));

        prop_assert_eq!(decode_full(&enc).unwrap(), Value::from(rows));
    }
}

#[test]
fn mismatched_rows_stay_generic() {
    let mut a = beve::Object::new();
    a.insert("x", 1);
    let mut b = beve::Object::new();
    b.insert("y", 1);
    let v = Value::from(vec![Value::from(a), Value::from(b)]);

    let enc = encode_with(&v, &EncodeConfig::new().typed_object_arrays(true));
    assert_eq!(enc[0], TYPE_GENERIC_ARRAY);
    assert_eq!(decode_full(&enc).unwrap(), v);
}
