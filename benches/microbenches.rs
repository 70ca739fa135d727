//! Criterion microbenches for NGFF metadata parsing and conversion.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - Metadata JSON parsing (from_json_str, from_json_slice)
//! - Version conversion (v0.4 -> v0.6 and back)
//! - Full-document validation

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use ngffmeta::model::io_json::{from_json_slice, from_json_str};
use ngffmeta::validation::{validate_metadata, ValidateOptions};
use ngffmeta::NgffVersion;

// Include test fixtures at compile time (no file I/O during benchmark)
const V04_FIXTURE: &str = include_str!("../tests/fixtures/sample_valid.v04.json");
const V06_FIXTURE: &str = include_str!("../tests/fixtures/sample_globals.v06.json");

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata_parse");
    group.throughput(Throughput::Bytes(V04_FIXTURE.len() as u64));

    group.bench_function("from_json_str", |b| {
        b.iter(|| {
            let metadata = from_json_str(black_box(V04_FIXTURE)).unwrap();
            black_box(metadata)
        })
    });

    let bytes = V04_FIXTURE.as_bytes();
    group.bench_function("from_json_slice", |b| {
        b.iter(|| {
            let metadata = from_json_slice(black_box(bytes)).unwrap();
            black_box(metadata)
        })
    });

    group.finish();
}

/// Benchmark conversion through the router.
///
/// Fixtures are parsed once; each iteration clones and converts.
fn bench_convert(c: &mut Criterion) {
    let v04 = from_json_str(V04_FIXTURE).unwrap();
    let v06 = from_json_str(V06_FIXTURE).unwrap();
    let mut group = c.benchmark_group("metadata_convert");

    group.bench_function("v04_to_v06", |b| {
        b.iter(|| {
            let converted = black_box(v04.clone()).to_version(NgffVersion::V06).unwrap();
            black_box(converted)
        })
    });

    group.bench_function("v06_to_v04", |b| {
        b.iter(|| {
            let converted = black_box(v06.clone()).to_version(NgffVersion::V04).unwrap();
            black_box(converted)
        })
    });

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let v06 = from_json_str(V06_FIXTURE).unwrap();
    let opts = ValidateOptions::default();

    c.bench_function("validate_metadata_v06", |b| {
        b.iter(|| black_box(validate_metadata(black_box(&v06), &opts)))
    });
}

criterion_group!(benches, bench_parse, bench_convert, bench_validate);
criterion_main!(benches);
