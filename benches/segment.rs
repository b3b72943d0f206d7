//! Criterion benchmarks for the segment graph.
//!
//! Run with:
//!   cargo bench --bench segment

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use segstring::{Encoding, LogicalString};

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for &width in &[16usize, 256, 4096] {
        let bytes: Vec<u8> = (0..width).map(|i| b'a' + (i % 26) as u8).chain(std::iter::once(0)).collect();
        group.throughput(Throughput::Bytes(width as u64));
        group.bench_with_input(BenchmarkId::new("from_owned", width), &bytes, |b, bytes| {
            b.iter(|| LogicalString::from_owned(bytes, Encoding::Ascii))
        });
    }

    group.bench_function("deep_concat_chain_1000", |b| {
        b.iter(|| {
            let mut s = LogicalString::from_owned(b"x\0", Encoding::Ascii);
            for _ in 0..1000 {
                s = s.concat(&LogicalString::from_owned(b"y\0", Encoding::Ascii));
            }
            s
        })
    });

    group.finish();
}

fn bench_indexed_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_access");

    // Flat leaf baseline.
    let flat_bytes: Vec<u8> = std::iter::repeat(b'a').take(4096).chain(std::iter::once(0)).collect();
    let flat = LogicalString::from_owned(&flat_bytes, Encoding::Ascii);
    group.bench_function("leaf_code_point_at", |b| {
        b.iter(|| flat.code_point_at(2048).unwrap())
    });

    // Deep concat chain: access forces a walk proportional to depth.
    let mut deep = LogicalString::from_owned(b"a\0", Encoding::Ascii);
    for _ in 0..200 {
        deep = deep.concat(&LogicalString::from_owned(b"b\0", Encoding::Ascii));
    }
    group.bench_function("deep_concat_code_point_at", |b| {
        b.iter(|| deep.code_point_at(deep.length() - 1).unwrap())
    });

    // Repetition: access is O(1) modulo the unit regardless of `times`.
    let repeated = LogicalString::from_owned(b"unit\0", Encoding::Ascii).repeat(1_000_000);
    group.bench_function("repetition_code_point_at", |b| {
        b.iter(|| repeated.code_point_at(999_999).unwrap())
    });

    group.finish();
}

fn bench_forced_materialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("forced_materialization");

    group.bench_function("drop_big_repetition_behind_substring_view", |b| {
        b.iter_batched(
            || {
                let base = LogicalString::from_owned(b"hello\0", Encoding::Ascii);
                let big = base.repeat(1_000_000);
                let view = big.substr_len(500_000, 10);
                (big, view)
            },
            |(big, view)| {
                drop(big);
                view.code_point_at(0).unwrap()
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_construction, bench_indexed_access, bench_forced_materialization);
criterion_main!(benches);
