//! Test utilities and fixtures for tagmem development.
//!
//! Provides ready-made regions and contexts, prototype chains shaped like
//! common host hierarchies, a sample of every encodable value kind, and
//! a seeded CSPRNG for reproducible random fills.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tagmem_codec::{Context, ContextConfig};
use tagmem_region::Region;

pub use fixtures::{sample_values, Handle, Hierarchy};

/// Region size used by the small fixtures: 64 KiB.
pub const SMALL_REGION_BYTES: u32 = 64 * 1024;

/// A 64 KiB fixed-size region.
pub fn small_region() -> Region {
    Region::with_capacity(SMALL_REGION_BYTES).expect("64 KiB region config is valid")
}

/// A context over a fresh 64 KiB region.
pub fn small_context() -> Context {
    Context::new(ContextConfig::with_region_bytes(SMALL_REGION_BYTES))
        .expect("64 KiB context config is valid")
}

/// Deterministic CSPRNG for random-fill tests.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
