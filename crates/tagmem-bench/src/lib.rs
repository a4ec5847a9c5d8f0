//! Benchmark workloads for tagmem.
//!
//! Deterministic inputs shared by the criterion benches:
//!
//! - [`allocation_sizes`]: request sizes skewed toward small blocks
//! - [`mixed_values`]: a value stream shaped like a typical encode load
//! - [`region_for`]: a region large enough for a workload

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tagmem_codec::{TypedArray, Value};
use tagmem_pointer::{F32, U8};
use tagmem_region::{padded_length, Region, RegionConfig, RegionError};

/// `n` request sizes: mostly 1..=64 bytes, one in eight up to 4 KiB.
pub fn allocation_sizes(n: usize, seed: u64) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            if rng.random_ratio(1, 8) {
                rng.random_range(65..=4096)
            } else {
                rng.random_range(1..=64)
            }
        })
        .collect()
}

/// `n` values cycling through numbers, strings, big integers and views.
pub fn mixed_values(n: usize, seed: u64) -> Vec<Value> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|i| match i % 6 {
            0 => Value::Number(rng.random_range(-1_000_000i64..1_000_000) as f64),
            1 => Value::Number(rng.random::<f64>()),
            2 => {
                let len = rng.random_range(1..48);
                Value::String((0..len).map(|_| rng.random_range('a'..='z')).collect())
            }
            3 => Value::BigInt(rng.random::<i64>().into()),
            4 => {
                let bytes: Vec<u8> = (0..rng.random_range(1..128)).map(|_| rng.random()).collect();
                Value::View(TypedArray::of::<U8>(&bytes))
            }
            _ => {
                let lanes: Vec<f32> = (0..16).map(|_| rng.random()).collect();
                Value::View(TypedArray::of::<F32>(&lanes))
            }
        })
        .collect()
}

/// Upper bound on the bytes `sizes` takes at 16-byte alignment.
pub fn footprint(sizes: &[u32]) -> u64 {
    sizes.iter().map(|&n| padded_length(n, 16)).sum()
}

/// A fixed region holding the region header plus `bytes` of blocks.
pub fn region_for(bytes: u64) -> Result<Region, RegionError> {
    let capacity = u32::try_from(bytes + 8).map_err(|_| RegionError::InvalidConfig {
        reason: format!("{bytes} bytes does not fit a u32 region"),
    })?;
    Region::new(RegionConfig::new(capacity.max(16)))
}
