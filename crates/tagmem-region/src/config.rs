//! Region configuration parameters.

use crate::error::RegionError;
use crate::region::FIRST_OFFSET;

/// Configuration for a [`Region`](crate::Region).
///
/// Controls the initial and maximum size of the backing buffer and the
/// alignment [`Region::malloc`](crate::Region::malloc) pads blocks to.
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionConfig {
    /// Bytes available when the region is created.
    ///
    /// Default: 1000 pages of 64 KiB. Must be at least 16 (room for the
    /// region header and the first block header).
    pub initial_bytes: u32,

    /// Upper bound for [`Region::grow`](crate::Region::grow).
    ///
    /// Default: equal to `initial_bytes` (a pre-sized region that never
    /// grows). Must be `>= initial_bytes`.
    pub maximum_bytes: u32,

    /// Alignment used by `malloc` when the caller does not pick one.
    ///
    /// Default: 16. Must be non-zero.
    pub default_align: u32,
}

impl RegionConfig {
    /// Size of one memory page in bytes.
    pub const PAGE_BYTES: u32 = 65_536;

    /// Default number of pages in a fresh region.
    pub const DEFAULT_PAGES: u32 = 1000;

    /// Default block alignment in bytes.
    pub const DEFAULT_ALIGN: u32 = 16;

    /// Create a config for a fixed-size region of `initial_bytes`.
    pub fn new(initial_bytes: u32) -> Self {
        Self {
            initial_bytes,
            maximum_bytes: initial_bytes,
            default_align: Self::DEFAULT_ALIGN,
        }
    }

    /// Create a config sized in pages, growable up to `maximum_pages`.
    pub fn pages(initial_pages: u32, maximum_pages: u32) -> Self {
        Self {
            initial_bytes: initial_pages.saturating_mul(Self::PAGE_BYTES),
            maximum_bytes: maximum_pages.saturating_mul(Self::PAGE_BYTES),
            default_align: Self::DEFAULT_ALIGN,
        }
    }

    /// Set the maximum size the region may grow to.
    pub fn with_maximum(mut self, maximum_bytes: u32) -> Self {
        self.maximum_bytes = maximum_bytes;
        self
    }

    /// Set the default allocation alignment.
    pub fn with_default_align(mut self, align: u32) -> Self {
        self.default_align = align;
        self
    }

    /// Check the invariants documented on each field.
    pub fn validate(&self) -> Result<(), RegionError> {
        if self.initial_bytes < FIRST_OFFSET {
            return Err(RegionError::InvalidConfig {
                reason: format!(
                    "initial_bytes must be at least {FIRST_OFFSET}, got {}",
                    self.initial_bytes
                ),
            });
        }
        if self.maximum_bytes < self.initial_bytes {
            return Err(RegionError::InvalidConfig {
                reason: format!(
                    "maximum_bytes ({}) is below initial_bytes ({})",
                    self.maximum_bytes, self.initial_bytes
                ),
            });
        }
        if self.default_align == 0 {
            return Err(RegionError::InvalidConfig {
                reason: "default_align must be non-zero".into(),
            });
        }
        Ok(())
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self::pages(Self::DEFAULT_PAGES, Self::DEFAULT_PAGES)
    }
}
