//! Bump allocation of length-prefixed blocks.
//!
//! Each block is `8 + byte_length` bytes rounded up to the alignment. The
//! returned offset points just past the block's 8-byte header; the
//! header holds the requested size at `offset-8` and the padded length at
//! `offset-4`. Nothing is ever freed.

use std::sync::atomic::Ordering;

use crate::error::RegionError;
use crate::region::{Region, BLOCK_HEADER_BYTES};

impl Region {
    /// Allocate `byte_length` bytes aligned to the region's default
    /// alignment (16 unless configured otherwise).
    pub fn malloc(&self, byte_length: u32) -> Result<u32, RegionError> {
        self.malloc_aligned(byte_length, self.default_align())
    }

    /// Allocate `byte_length` bytes, padding the block length up to a
    /// multiple of `align_bytes`.
    ///
    /// The bump is a single atomic update that refuses to advance past
    /// the end of the region, so concurrent callers never receive
    /// overlapping blocks and a failed call consumes nothing. The block
    /// header is written with relaxed stores after the bump, so another
    /// thread sees it only once it synchronizes with this one, for example
    /// by joining it. Until then a concurrent
    /// [`allocations`](Region::allocations) walk may stop at this block.
    ///
    /// # Errors
    ///
    /// - [`RegionError::InvalidSize`] when `byte_length` is 0.
    /// - [`RegionError::InvalidAlignment`] when `align_bytes` is 0.
    /// - [`RegionError::CapacityExceeded`] when the block does not fit.
    pub fn malloc_aligned(&self, byte_length: u32, align_bytes: u32) -> Result<u32, RegionError> {
        if byte_length == 0 {
            return Err(RegionError::InvalidSize {
                requested: byte_length,
            });
        }
        if align_bytes == 0 {
            return Err(RegionError::InvalidAlignment { align: align_bytes });
        }

        let length = padded_length(byte_length, align_bytes);
        let capacity = self.capacity() as u64;
        let previous = self
            .bump
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bump| {
                let end = bump as u64 + length;
                (end <= capacity).then_some(end as u32)
            })
            .map_err(|bump| RegionError::CapacityExceeded {
                requested: length,
                available: capacity.saturating_sub(bump as u64),
            })?;
        self.count.fetch_add(1, Ordering::AcqRel);

        // length <= capacity <= u32::MAX, checked by the bump above.
        let offset = previous + BLOCK_HEADER_BYTES;
        self.set_u32(offset - 4, length as u32)?;
        self.set_u32(offset - 8, byte_length)?;

        log::trace!("malloc({byte_length}, {align_bytes}) -> {offset} (block {length})");
        Ok(offset)
    }
}

/// Block length for a request: header plus payload, rounded up to a
/// multiple of `align_bytes`.
pub fn padded_length(byte_length: u32, align_bytes: u32) -> u64 {
    let align = align_bytes as u64;
    let mut length = BLOCK_HEADER_BYTES as u64 + byte_length as u64;
    let remain = length % align;
    if remain != 0 {
        length += align - remain;
    }
    length
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn region() -> Region {
        Region::with_capacity(64 * 1024).unwrap()
    }

    #[test]
    fn first_block_starts_at_sixteen() {
        let r = region();
        assert_eq!(r.malloc(4).unwrap(), 16);
        assert_eq!(r.allocation_count(), 1);
    }

    #[test]
    fn zero_size_is_rejected() {
        let r = region();
        assert_eq!(r.malloc(0), Err(RegionError::InvalidSize { requested: 0 }));
        assert_eq!(r.allocation_count(), 0);
    }

    #[test]
    fn zero_alignment_is_rejected() {
        let r = region();
        assert_eq!(
            r.malloc_aligned(4, 0),
            Err(RegionError::InvalidAlignment { align: 0 })
        );
    }

    #[test]
    fn header_round_trip() {
        let r = region();
        let offset = r.malloc_aligned(13, 8).unwrap();
        assert_eq!(r.size(offset).unwrap(), 13);
        assert_eq!(r.block_length(offset).unwrap(), 24);
    }

    #[test]
    fn one_byte_blocks_are_one_aligned_block_apart() {
        let r = region();
        let a = r.malloc(1).unwrap();
        let b = r.malloc(1).unwrap();
        assert_eq!(a, 16);
        assert_eq!(b - a, 16);
        assert_eq!(r.block_length(a).unwrap(), 16);
    }

    #[test]
    fn padding_is_not_reported_as_size() {
        let r = region();
        let offset = r.malloc(9).unwrap();
        assert_eq!(r.size(offset).unwrap(), 9);
        assert_eq!(r.block_length(offset).unwrap(), 32);
    }

    #[test]
    fn deadbeef_round_trip() {
        let r = region();
        let offset = r.malloc(4).unwrap();
        r.set_u32(offset, 0xDEAD_BEEF).unwrap();
        assert_eq!(r.get_u32(offset).unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn exhausted_region_reports_capacity_and_keeps_state() {
        let r = Region::with_capacity(64).unwrap();
        // 8 header bytes + 16 + 16 + 16 = 56 used, 8 left.
        for _ in 0..3 {
            r.malloc(8).unwrap();
        }
        let before = r.bump_offset();
        assert!(matches!(
            r.malloc(1),
            Err(RegionError::CapacityExceeded {
                requested: 16,
                available: 8
            })
        ));
        assert_eq!(r.bump_offset(), before);
        assert_eq!(r.allocation_count(), 3);
    }

    #[test]
    fn block_filling_the_region_exactly_fits() {
        let r = Region::with_capacity(40).unwrap();
        let offset = r.malloc(24).unwrap();
        assert_eq!(r.block_length(offset).unwrap(), 32);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn concurrent_mallocs_never_overlap() {
        let r = Arc::new(Region::with_capacity(1 << 20).unwrap());
        let mut offsets: Vec<u32> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|t| {
                    let r = Arc::clone(&r);
                    s.spawn(move || {
                        (0..200)
                            .map(|i| r.malloc(1 + (i + t) % 40).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        assert_eq!(r.allocation_count(), 1600);
        offsets.sort_unstable();
        for pair in offsets.windows(2) {
            let end = pair[0] - 8 + r.block_length(pair[0]).unwrap();
            assert!(end <= pair[1] - 8, "{pair:?} overlap");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn blocks_are_aligned_and_monotonic(
                requests in proptest::collection::vec((1u32..300, 1u32..64), 1..40),
            ) {
                let r = Region::with_capacity(1 << 20).unwrap();
                let mut last_end = 8u32;
                for (size, align) in requests {
                    let offset = r.malloc_aligned(size, align).unwrap();
                    let length = r.block_length(offset).unwrap();
                    prop_assert_eq!(length % align, 0);
                    prop_assert!(length >= size + 8);
                    prop_assert_eq!(r.size(offset).unwrap(), size);
                    prop_assert_eq!(offset - 8, last_end);
                    last_end = offset - 8 + length;
                }
            }

            #[test]
            fn padded_length_is_minimal(size in 1u32..10_000, align in 1u32..256) {
                let length = padded_length(size, align);
                prop_assert_eq!(length % align as u64, 0);
                prop_assert!(length >= size as u64 + 8);
                prop_assert!(length < size as u64 + 8 + align as u64);
            }
        }
    }
}
