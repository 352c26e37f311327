#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use beve::prelude::*;

const N_BIG_ARR: usize = 100;
const N_CHARS: usize = 100_000;

fn big_str() -> String { "x".repeat(N_CHARS) }

fn big_arr() -> Value {
    let v: Vec<Value> = (0..N_BIG_ARR).map(|_| Value::from(big_str())).collect();
    Value::from(v)
}

fn bench_enc(c: &mut Criterion) {
    let big_arr = big_arr();
    c.bench_function(
        &format!(
            "Encoding a BEVE array of {} {}-character strings",
            N_BIG_ARR, N_CHARS
        ),
        move |b| b.iter(|| encode_full(black_box(&big_arr))),
    );
}

fn bench_dec(c: &mut Criterion) {
    let big_arr = big_arr();
    let enc = encode_full(&big_arr);
    c.bench_function(
        &format!(
            "Decoding a BEVE array of {} {}-character strings",
            N_BIG_ARR, N_CHARS
        ),
        move |b| b.iter(|| decode_full(black_box(&enc))),
    );
}

fn bench_binary(c: &mut Criterion) {
    let v = Value::Binary(Bytes::from(vec![7u8; N_CHARS]));
    let enc = encode_full(&v);
    c.bench_function(&format!("Decoding {} bytes of binary", N_CHARS), move |b| {
        b.iter(|| decode_full(black_box(&enc)))
    });
}

criterion_group!(benches, bench_enc, bench_dec, bench_binary);
criterion_main!(benches);
