//! Shared byte region with an atomic bump allocator.
//!
//! A [`Region`] is one contiguous, growable run of bytes that any number
//! of threads may share through an `Arc`. Blocks are carved out of it by
//! a bump allocator that never frees: every block lives as long as the
//! region itself.
//!
//! # Layout
//!
//! ```text
//! offset 0        8               16
//!        ├────────┼───────────────┼──────────────── ...
//!        │ bump   │ size │ length │ block 1 data    │ size │ length │ block 2 data
//!        │ count  │ (first block  │                 │
//!        │        │  header)      │                 │
//! ```
//!
//! - Bytes `[0,8)` hold the region header `{bump_offset, alloc_count}`.
//!   The bump offset starts at 8, so the first block's own header sits at
//!   `[8,16)` and its data at 16.
//! - Every block is prefixed by 8 header bytes: the requested size at
//!   `offset-8` and the padded block length (header included) at
//!   `offset-4`.
//! - Offset 0 is never a valid block and doubles as the null pointer.
//!
//! # Concurrency
//!
//! [`Region::malloc`] is the only operation designed for true parallel
//! use: the bump and the allocation count are single atomic updates, so
//! concurrent callers always receive disjoint blocks. Byte accessors are
//! memory-safe (relaxed per-byte atomics) but two threads writing the same
//! bytes is a logical race the caller must synchronize.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alloc;
pub mod config;
pub mod error;
pub mod listing;
pub mod region;
pub mod view;

// Public re-exports for the primary API surface.
pub use alloc::padded_length;
pub use config::RegionConfig;
pub use error::RegionError;
pub use listing::{Allocation, Allocations};
pub use region::Region;
pub use view::RegionView;
