//! Region-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during region operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegionError {
    /// `malloc` was asked for zero bytes.
    InvalidSize {
        /// Number of bytes requested.
        requested: u32,
    },
    /// `malloc` was asked for a zero alignment.
    InvalidAlignment {
        /// The alignment requested.
        align: u32,
    },
    /// An accessor was called with offset 0, the null pointer.
    NullOffset,
    /// The offset points into the region header or has no block header
    /// in front of it.
    ReservedOffset {
        /// The offending offset.
        offset: u32,
    },
    /// The access would read or write past the end of the region.
    OutOfBounds {
        /// Start of the access.
        offset: u32,
        /// Number of bytes touched.
        len: usize,
        /// Current region capacity in bytes.
        capacity: usize,
    },
    /// The bump allocator has no room left for the block.
    CapacityExceeded {
        /// Padded block length that was requested, header included.
        requested: u64,
        /// Bytes still free at the time of the request.
        available: u64,
    },
    /// A [`RegionConfig`](crate::RegionConfig) failed validation.
    InvalidConfig {
        /// Which invariant was violated.
        reason: String,
    },
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { requested } => {
                write!(f, "malloc needs a non-zero size, got {requested}")
            }
            Self::InvalidAlignment { align } => {
                write!(f, "malloc needs a non-zero alignment, got {align}")
            }
            Self::NullOffset => write!(f, "offset required: 0 is the null pointer"),
            Self::ReservedOffset { offset } => {
                write!(f, "offset {offset} has no block header")
            }
            Self::OutOfBounds {
                offset,
                len,
                capacity,
            } => {
                write!(
                    f,
                    "access of {len} bytes at offset {offset} exceeds region capacity {capacity}"
                )
            }
            Self::CapacityExceeded {
                requested,
                available,
            } => {
                write!(
                    f,
                    "region capacity exceeded: requested {requested} bytes, {available} bytes free"
                )
            }
            Self::InvalidConfig { reason } => write!(f, "invalid region config: {reason}"),
        }
    }
}

impl Error for RegionError {}
