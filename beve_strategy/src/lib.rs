use beve::{
    extension::{Complex, Duration, Extension, Layout, Matrix, Timestamp, Uuid},
    typed::NumericArray,
    vecmap::VecMap,
    Object, Value,
};
use bytes::Bytes;
use half::f16;
use proptest::prelude::*;

/// arbitrary Bytes for use with proptest
pub fn arb_bs() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..64).prop_map(Bytes::from)
}

/// arbitrary numeric typed array for use with proptest
pub fn arb_numeric() -> impl Strategy<Value = NumericArray> {
    prop_oneof![
        prop::collection::vec(any::<i8>(), 0..16).prop_map(NumericArray::from),
        prop::collection::vec(any::<u16>(), 0..16).prop_map(NumericArray::from),
        prop::collection::vec(any::<i32>(), 0..16).prop_map(NumericArray::from),
        prop::collection::vec(any::<u64>(), 0..16).prop_map(NumericArray::from),
        prop::collection::vec(any::<i128>(), 0..16).prop_map(NumericArray::from),
        prop::collection::vec(any::<f32>(), 0..16).prop_map(NumericArray::from),
        prop::collection::vec(any::<f64>(), 0..16).prop_map(NumericArray::from),
    ]
}

/// arbitrary row-major matrix of doubles for use with proptest
pub fn arb_matrix() -> impl Strategy<Value = Matrix> {
    (1..5u64, 1..5u64, any::<bool>()).prop_flat_map(|(rows, cols, col_major)| {
        prop::collection::vec(any::<f64>(), (rows * cols) as usize).prop_map(move |data| {
            let layout = if col_major {
                Layout::ColMajor
            } else {
                Layout::RowMajor
            };
            Matrix::new(layout, &[rows, cols], NumericArray::from(data))
                .expect("data fills the extents")
        })
    })
}

/// arbitrary extension other than variants and typed object arrays, for use with
/// proptest
pub fn arb_extension() -> impl Strategy<Value = Extension> {
    prop_oneof![
        (any::<i64>(), 0..1_000_000_000i64, prop::option::of(any::<i16>())).prop_map(
            |(s, n, tz)| {
                let t = Timestamp::new(s, n);
                Extension::Timestamp(tz.map_or(t, |tz| t.with_offset(tz)))
            }
        ),
        (any::<i64>(), 0..1_000_000_000i64)
            .prop_map(|(s, n)| Extension::Duration(Duration::new(s, n))),
        any::<[u8; 16]>().prop_map(|bs| Extension::Uuid(Uuid::from_bytes(bs))),
        (any::<f64>(), any::<f64>()).prop_filter_map("parts of one type", |(re, im)| {
            Complex::new(re, im).ok().map(Extension::Complex)
        }),
        prop::collection::vec((any::<i32>(), any::<i32>()), 0..8)
            .prop_map(|pairs| Extension::Complex(Complex::from_pairs(&pairs))),
        arb_matrix().prop_map(Extension::Matrix),
    ]
}

/// arbitrary Value for use with proptest
pub fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        // misc
        any::<bool>().prop_map(Value::Bool),
        any::<String>().prop_map(Value::Text),
        arb_bs().prop_map(Value::Binary),
        // integers
        // 8-bit
        any::<u8>().prop_map(Value::from),
        any::<i8>().prop_map(Value::from),
        // 16-bit
        any::<u16>().prop_map(Value::from),
        any::<i16>().prop_map(Value::from),
        // 32-bit
        any::<u32>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        // 64-bit
        any::<u64>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        // 128-bit
        any::<u128>().prop_map(Value::from),
        any::<i128>().prop_map(Value::from),
        // floats
        any::<u16>().prop_map(|n| Value::from(f16::from_bits(n))),
        any::<f32>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        // typed arrays
        arb_numeric().prop_map(Value::from),
        prop::collection::vec(any::<bool>(), 0..20).prop_map(Value::from),
        // extensions
        arb_extension().prop_map(Value::Extension),
    ];
    leaf.prop_recursive(
        8,  // max depth
        64, // max nodes
        10, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Value::from),
                prop::collection::btree_map(any::<String>(), inner.clone(), 0..10)
                    .prop_map(|m| Value::from(Object::from(m))),
                prop::collection::btree_map(any::<i64>(), inner.clone(), 0..10).prop_map(|m| {
                    let m: VecMap<i128, Value> =
                        m.into_iter().map(|(k, v)| (k as i128, v)).collect();
                    Value::from(Object::from(m))
                }),
                (any::<u64>().prop_map(|t| t >> 2), inner)
                    .prop_filter_map("tag fits a SIZE", |(tag, v)| {
                        Extension::variant(tag, v).ok().map(Value::from)
                    }),
            ]
        },
    )
}

/// arbitrary array of same-shaped objects for use with proptest
pub fn arb_rows() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::btree_set("[a-z]{1,8}", 1..5).prop_flat_map(|keys| {
        let keys: Vec<String> = keys.into_iter().collect();
        let width = keys.len();
        prop::collection::vec(
            prop::collection::vec(arb_value(), width..=width),
            1..6,
        )
        .prop_map(move |rows| {
            rows.into_iter()
                .map(|row| {
                    let m: VecMap<String, Value> = keys.iter().cloned().zip(row).collect();
                    Value::from(Object::from(m))
                })
                .collect()
        })
    })
}
