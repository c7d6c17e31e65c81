// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{Criterion, criterion_group, criterion_main};
use nodeflake::{Snowflake, base62};
use std::hint::black_box;

fn build() -> Snowflake {
    Snowflake::builder()
        .data_center_id(1)
        .machine_id(1)
        .finalize()
        .expect("Could not create Snowflake")
}

fn bench_new(c: &mut Criterion) {
    c.bench_function("bench_new", |b| {
        b.iter(build);
    });
}

fn bench_next_id(c: &mut Criterion) {
    let sf = build();
    c.bench_function("bench_next_id", |b| {
        b.iter(|| sf.next_id());
    });
}

fn bench_decompose(c: &mut Criterion) {
    let sf = build();
    let id = sf.next_id().expect("Could not generate id");
    c.bench_function("bench_decompose", |b| {
        b.iter(|| sf.decompose(black_box(id)));
    });
}

fn bench_next_code(c: &mut Criterion) {
    let sf = build();
    c.bench_function("bench_next_code", |b| {
        b.iter(|| sf.next_code());
    });
    c.bench_function("bench_base62_encode", |b| {
        b.iter(|| base62::encode(black_box(u64::MAX)));
    });
}

criterion_group!(
    snowflake_perf,
    bench_new,
    bench_next_id,
    bench_decompose,
    bench_next_code
);
criterion_main!(snowflake_perf);
