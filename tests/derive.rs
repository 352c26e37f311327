use beve::prelude::*;
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(BeveRep, Clone, Debug, PartialEq)]
struct Reading {
    sensor: String,
    at: Timestamp,
    samples: Vec<f64>,
    flags: Vec<bool>,
    calibrated: Option<u16>,
}

#[derive(BeveRep, Clone, Debug, PartialEq)]
struct Pair(i32, String);

#[derive(BeveRep, Clone, Debug, PartialEq)]
struct Marker;

#[derive(BeveRep, Clone, Debug, PartialEq)]
enum Event {
    Started,
    Reading(Reading),
    Moved(i64, i64),
    Renamed { from: String, to: String },
    Tagged(BTreeMap<String, Pair>),
    Marked(Marker),
}

fn arb_reading() -> impl Strategy<Value = Reading> {
    (
        any::<String>(),
        any::<i64>(),
        prop::collection::vec(-1e9f64..1e9, 0..8),
        prop::collection::vec(any::<bool>(), 0..8),
        any::<Option<u16>>(),
    )
        .prop_map(|(sensor, secs, samples, flags, calibrated)| Reading {
            sensor,
            at: Timestamp::new(secs, 0),
            samples,
            flags,
            calibrated,
        })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Started),
        arb_reading().prop_map(Event::Reading),
        (any::<i64>(), any::<i64>()).prop_map(|(x, y)| Event::Moved(x, y)),
        (any::<String>(), any::<String>()).prop_map(|(from, to)| Event::Renamed { from, to }),
        prop::collection::btree_map(any::<String>(), (any::<i32>(), any::<String>()), 0..4)
            .prop_map(|m| Event::Tagged(m.into_iter().map(|(k, (i, s))| (k, Pair(i, s))).collect())),
        Just(Event::Marked(Marker)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 500, ..ProptestConfig::default() })]

    #[test]
    fn events_roundtrip(ev in arb_event()) {
        let enc = encode_full(&ev.to_beve());
        let dec: Event = decode_full(&enc).unwrap().into_rep().unwrap();

        prop_assert_eq!(dec, ev);
    }

    #[test]
    fn events_roundtrip_by_value(ev in arb_event()) {
        let enc = encode_full(&ev.clone().into_beve());

        prop_assert_eq!(Event::from_beve(decode_full(&enc).unwrap()).unwrap(), ev);
    }
}

#[test]
fn samples_are_typed() {
    let r = Reading {
        sensor: "t0".into(),
        at: Timestamp::new(1_697_550_000, 123_456_789),
        samples: vec![1.0, 2.5],
        flags: vec![true, false, true],
        calibrated: None,
    };
    let v = r.to_beve();
    let o = v.to_object().unwrap();
    match o.get("samples") {
        Some(Value::Array(Array::Typed(TypedArray::Numeric(n)))) => {
            assert_eq!(n.to_vec::<f64>(), Some(vec![1.0, 2.5]))
        }
        other => panic!("{:?}", other),
    }
    assert_eq!(o.get("calibrated"), Some(&Value::Null));
}

#[test]
fn variant_tags_follow_declaration_order() {
    let enc = encode_full(&Event::Moved(1, 2).to_beve());
    assert_eq!(enc[..2], [0x0e, 2 << 2]);

    let enc = encode_full(&Event::Renamed { from: "a".into(), to: "b".into() }.to_beve());
    assert_eq!(enc[..3], [0x0e, 3 << 2, 0b000_00_011]);
}
