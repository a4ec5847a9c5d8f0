//! Criterion micro-benchmarks for region allocation, access and listing.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tagmem_bench::{allocation_sizes, footprint, region_for};
use tagmem_pointer::{Values, U32};
use tagmem_test_utils::seeded_rng;

/// Benchmark: 10K mallocs of mixed sizes into a fresh region.
fn bench_malloc_mixed_10k(c: &mut Criterion) {
    let sizes = allocation_sizes(10_000, 42);
    let bytes = footprint(&sizes);

    c.bench_function("malloc_mixed_10k", |b| {
        b.iter_batched(
            || region_for(bytes).unwrap(),
            |region| {
                for &n in &sizes {
                    black_box(region.malloc(n).unwrap());
                }
                region
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: 4 threads x 2500 mallocs contending on one bump.
fn bench_malloc_contended(c: &mut Criterion) {
    let sizes = allocation_sizes(2_500, 7);
    let bytes = footprint(&sizes) * 4;

    c.bench_function("malloc_contended_4x2500", |b| {
        b.iter_batched(
            || Arc::new(region_for(bytes).unwrap()),
            |region| {
                std::thread::scope(|s| {
                    for _ in 0..4 {
                        let region = Arc::clone(&region);
                        let sizes = &sizes;
                        s.spawn(move || {
                            for &n in sizes {
                                black_box(region.malloc(n).unwrap());
                            }
                        });
                    }
                });
                region
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: sequential u32 reads over a 4K-element block.
fn bench_read_u32_4k(c: &mut Criterion) {
    let region = region_for(64 * 1024).unwrap();
    let values = Values::<U32>::random(&region, 4096, &mut seeded_rng(1)).unwrap();

    c.bench_function("read_u32_4k", |b| {
        b.iter(|| {
            let sum: u64 = values.iter(&region).unwrap().map(u64::from).sum();
            black_box(sum);
        });
    });
}

/// Benchmark: walk the block chain of 10K allocations.
fn bench_allocations_walk_10k(c: &mut Criterion) {
    let sizes = allocation_sizes(10_000, 3);
    let region = region_for(footprint(&sizes)).unwrap();
    for &n in &sizes {
        region.malloc(n).unwrap();
    }

    c.bench_function("allocations_walk_10k", |b| {
        b.iter(|| black_box(region.allocations().count()));
    });
}

criterion_group!(
    benches,
    bench_malloc_mixed_10k,
    bench_malloc_contended,
    bench_read_u32_4k,
    bench_allocations_walk_10k
);
criterion_main!(benches);
