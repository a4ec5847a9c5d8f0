//! Criterion micro-benchmarks for tag hashing, record encoding and
//! external reference virtualization.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tagmem_bench::mixed_values;
use tagmem_codec::registry::CONSTRUCTOR_NAMES;
use tagmem_codec::{encode_record, tag_of, Context, ContextConfig, TypeRegistry, Value};
use tagmem_test_utils::{small_region, Hierarchy};

/// Benchmark: hash every fixed constructor name.
fn bench_tag_of_constructors(c: &mut Criterion) {
    c.bench_function("tag_of_constructors", |b| {
        b.iter(|| {
            for name in CONSTRUCTOR_NAMES {
                black_box(tag_of(black_box(name)));
            }
        });
    });
}

/// Benchmark: build the registry with both fixed tables.
fn bench_registry_new(c: &mut Criterion) {
    c.bench_function("registry_new", |b| {
        b.iter(|| black_box(TypeRegistry::new()));
    });
}

/// Benchmark: encode 1K mixed values to records without allocating.
fn bench_encode_record_1k(c: &mut Criterion) {
    let values = mixed_values(1_000, 42);
    let region = small_region();

    c.bench_function("encode_record_1k", |b| {
        b.iter(|| {
            for value in &values {
                black_box(encode_record(value, &region).unwrap());
            }
        });
    });
}

/// Benchmark: encode 1K mixed values into a fresh context.
fn bench_context_encode_1k(c: &mut Criterion) {
    let values = mixed_values(1_000, 42);

    c.bench_function("context_encode_1k", |b| {
        b.iter_batched(
            || Context::new(ContextConfig::with_region_bytes(1 << 20)).unwrap(),
            |mut ctx| {
                for value in &values {
                    black_box(ctx.encode(value).unwrap());
                }
                ctx
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: decode 1K previously encoded values.
fn bench_context_decode_1k(c: &mut Criterion) {
    let values = mixed_values(1_000, 42);
    let mut ctx = Context::new(ContextConfig::with_region_bytes(1 << 20)).unwrap();
    let tagged: Vec<_> = values.iter().map(|v| ctx.encode(v).unwrap()).collect();

    c.bench_function("context_decode_1k", |b| {
        b.iter(|| {
            for t in &tagged {
                black_box(ctx.decode(t).unwrap());
            }
        });
    });
}

/// Benchmark: externalize 256 objects sharing a prototype chain, then
/// hit the identity cache for each.
fn bench_externalize_256(c: &mut Criterion) {
    let hierarchy = Hierarchy::new();
    let objects: Vec<_> = (0..256)
        .map(|i| match i % 3 {
            0 => hierarchy.socket(),
            1 => hierarchy.worker(),
            _ => hierarchy.map(),
        })
        .collect();

    c.bench_function("externalize_256", |b| {
        b.iter_batched(
            || Context::new(ContextConfig::with_region_bytes(64 * 1024)).unwrap(),
            |mut ctx| {
                for object in &objects {
                    black_box(ctx.encode(&Value::Object(Arc::clone(object))).unwrap());
                }
                for object in &objects {
                    black_box(ctx.externalize(object).unwrap());
                }
                ctx
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_tag_of_constructors,
    bench_registry_new,
    bench_encode_record_1k,
    bench_context_encode_1k,
    bench_context_decode_1k,
    bench_externalize_256
);
criterion_main!(benches);
