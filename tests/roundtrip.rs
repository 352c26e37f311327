use beve::{config::EncodeConfig, encoding::*, errors::Error, Value};
use beve_strategy::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn encode_decode_small(i in proptest::num::i64::ANY) {
        let enc = encode_full(&Value::from(i));
        let dec = decode_full(&enc).ok();

        if dec != Some(Value::from(i)) {
            panic!("Tried encoding\n {:?}\n as \n{:x?}\n got \n{:?}\n", i, enc, dec)
        }
    }

    #[test]
    fn encode_decode(v in arb_value()) {
        let enc = encode_full(&v);
        let dec = decode_full(&enc);

        match dec {
            Ok(dec) => prop_assert_eq!(dec, v),
            Err(e) => panic!("Tried encoding\n {:?}\n as \n{:x?}\n got \n{}\n", v, enc, e),
        }
    }

    #[test]
    fn generic_arrays_decode_the_same(v in arb_value()) {
        let typed = encode_full(&v);
        let generic = encode_with(&v, &EncodeConfig::new().typed_arrays(false));

        prop_assert_eq!(decode_full(&typed).unwrap(), decode_full(&generic).unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 200, ..ProptestConfig::default() })]

    #[test]
    fn prefixes_are_truncated(v in arb_value()) {
        let enc = encode_full(&v);

        for end in 0..enc.len() {
            match decode_full(&enc[..end]) {
                Err(Error::TruncatedInput { .. }) => (),
                other => panic!("prefix of length {} of {:x?} gave {:?}", end, enc, other),
            }
        }
    }

    #[test]
    fn garbage_never_panics(bs in prop::collection::vec(any::<u8>(), 0..64)) {
        if let Err(e) = decode_full(&bs) {
            prop_assert!(e.is_decode_error());
        }
    }

    #[test]
    fn records(vs in prop::collection::vec(arb_value(), 0..8)) {
        let enc = encode_records(&vs);
        let dec: Result<Vec<Value>, Error> = Records::new(&enc).collect();

        prop_assert_eq!(dec.unwrap(), vs);
    }
}
