//! The shared byte region and its typed accessors.
//!
//! All fixed-width accessors are little-endian and address the region by
//! absolute byte offset. Offsets are plain `u32`s; offset 0 is reserved
//! as the null pointer and every accessor rejects it.

use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use crate::config::RegionConfig;
use crate::error::RegionError;
use crate::view::RegionView;

/// Size of the region header `{bump_offset, alloc_count}` in bytes.
pub const HEADER_BYTES: u32 = 8;

/// Size of the per-block header `{size, length}` in bytes.
pub const BLOCK_HEADER_BYTES: u32 = 8;

/// Offset of the first block's data.
pub const FIRST_OFFSET: u32 = HEADER_BYTES + BLOCK_HEADER_BYTES;

/// A contiguous, growable byte buffer with an embedded bump allocator.
///
/// The two region header words live in dedicated atomics rather than in
/// the byte array, because they are the only values mutated with atomic
/// read-modify-write. [`Region::to_bytes`] writes them back into bytes
/// `[0,8)` so a raw dump matches the documented layout bit for bit.
///
/// `Region` is `Send + Sync`; share it with `Arc<Region>` to allocate
/// from several threads at once.
pub struct Region {
    /// Backing storage, zero-initialised. Index 0..8 is never used
    /// directly; the header words shadow it.
    bytes: Vec<AtomicU8>,
    /// Bump pointer: offset of the next block header.
    pub(crate) bump: AtomicU32,
    /// Number of successful allocations.
    pub(crate) count: AtomicU32,
    maximum: u32,
    default_align: u32,
}

macro_rules! accessors {
    ($( $ty:ty => $get:ident, $set:ident; )*) => {
        $(
            #[doc = concat!("Read a little-endian `", stringify!($ty), "` at `offset`.")]
            pub fn $get(&self, offset: u32) -> Result<$ty, RegionError> {
                Ok(<$ty>::from_le_bytes(self.read_array(offset)?))
            }

            #[doc = concat!("Write a little-endian `", stringify!($ty), "` at `offset`.")]
            pub fn $set(&self, offset: u32, value: $ty) -> Result<(), RegionError> {
                self.write_array(offset, value.to_le_bytes())
            }
        )*
    };
}

impl Region {
    /// Create a zero-filled region from a validated config.
    pub fn new(config: RegionConfig) -> Result<Self, RegionError> {
        config.validate()?;
        Ok(Self {
            bytes: zeroed(config.initial_bytes as usize),
            bump: AtomicU32::new(HEADER_BYTES),
            count: AtomicU32::new(0),
            maximum: config.maximum_bytes,
            default_align: config.default_align,
        })
    }

    /// Create a fixed-size region of `bytes` bytes with default alignment.
    pub fn with_capacity(bytes: u32) -> Result<Self, RegionError> {
        Self::new(RegionConfig::new(bytes))
    }

    /// Current size of the backing buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Largest size [`Region::grow`] may reach.
    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Alignment used by [`Region::malloc`].
    pub fn default_align(&self) -> u32 {
        self.default_align
    }

    /// The bump offset: where the next block header will be placed.
    pub fn bump_offset(&self) -> u32 {
        self.bump.load(Ordering::Acquire)
    }

    /// Number of blocks handed out so far.
    pub fn allocation_count(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    /// Bytes consumed by blocks, headers and padding included.
    pub fn used(&self) -> usize {
        (self.bump_offset() - HEADER_BYTES) as usize
    }

    /// Bytes still available to the bump allocator.
    pub fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.bump_offset() as usize)
    }

    /// Grow the backing buffer by `additional` zeroed bytes.
    ///
    /// Requires exclusive access: no handle may be reading the region
    /// while its storage moves. Existing offsets stay valid.
    pub fn grow(&mut self, additional: u32) -> Result<(), RegionError> {
        let target = self.bytes.len() as u64 + additional as u64;
        if target > self.maximum as u64 {
            return Err(RegionError::CapacityExceeded {
                requested: target,
                available: self.maximum as u64,
            });
        }
        self.bytes
            .resize_with(target as usize, || AtomicU8::new(0));
        log::debug!("region grown to {target} bytes");
        Ok(())
    }

    /// Validate an access of `len` bytes at `offset` and return its range.
    fn span(&self, offset: u32, len: usize) -> Result<Range<usize>, RegionError> {
        if offset == 0 {
            return Err(RegionError::NullOffset);
        }
        if offset < HEADER_BYTES {
            return Err(RegionError::ReservedOffset { offset });
        }
        let start = offset as usize;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(RegionError::OutOfBounds {
                offset,
                len,
                capacity: self.bytes.len(),
            })?;
        Ok(start..end)
    }

    pub(crate) fn read_array<const N: usize>(&self, offset: u32) -> Result<[u8; N], RegionError> {
        let range = self.span(offset, N)?;
        let mut out = [0u8; N];
        for (dst, src) in out.iter_mut().zip(&self.bytes[range]) {
            *dst = src.load(Ordering::Relaxed);
        }
        Ok(out)
    }

    pub(crate) fn write_array<const N: usize>(
        &self,
        offset: u32,
        value: [u8; N],
    ) -> Result<(), RegionError> {
        self.write_bytes(offset, &value)
    }

    accessors! {
        u8 => get_u8, set_u8;
        i8 => get_i8, set_i8;
        u16 => get_u16, set_u16;
        i16 => get_i16, set_i16;
        u32 => get_u32, set_u32;
        i32 => get_i32, set_i32;
        u64 => get_u64, set_u64;
        i64 => get_i64, set_i64;
        f32 => get_f32, set_f32;
        f64 => get_f64, set_f64;
        u128 => get_u128, set_u128;
    }

    /// Requested byte length of the block at `offset` (stored at
    /// `offset-8`).
    ///
    /// `size(0)` returns the allocation count from the region header.
    pub fn size(&self, offset: u32) -> Result<u32, RegionError> {
        if offset == 0 {
            return Ok(self.allocation_count());
        }
        self.header_word(offset, BLOCK_HEADER_BYTES)
    }

    /// Padded length of the block at `offset`, header included (stored
    /// at `offset-4`).
    ///
    /// `block_length(0)` returns the bump offset from the region header.
    pub fn block_length(&self, offset: u32) -> Result<u32, RegionError> {
        if offset == 0 {
            return Ok(self.bump_offset());
        }
        self.header_word(offset, BLOCK_HEADER_BYTES / 2)
    }

    fn header_word(&self, offset: u32, back: u32) -> Result<u32, RegionError> {
        if offset < FIRST_OFFSET {
            return Err(RegionError::ReservedOffset { offset });
        }
        self.get_u32(offset - back)
    }

    /// Copy `length` bytes starting at `offset` out of the region.
    pub fn array_buffer(&self, offset: u32, length: u32) -> Result<Vec<u8>, RegionError> {
        let range = self.span(offset, length as usize)?;
        Ok(self.bytes[range]
            .iter()
            .map(|b| b.load(Ordering::Relaxed))
            .collect())
    }

    /// Copy `data` into the region starting at `offset`.
    pub fn write_bytes(&self, offset: u32, data: &[u8]) -> Result<(), RegionError> {
        let range = self.span(offset, data.len())?;
        for (dst, &src) in self.bytes[range].iter().zip(data) {
            dst.store(src, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Borrow `length` bytes starting at `offset` without copying.
    ///
    /// Writes through the view are visible to every other reader of the
    /// region.
    pub fn view_buffer(&self, offset: u32, length: u32) -> Result<RegionView<'_>, RegionError> {
        let range = self.span(offset, length as usize)?;
        Ok(RegionView::new(offset, &self.bytes[range]))
    }

    /// Copy the whole region, header words included, into a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out: Vec<u8> = self
            .bytes
            .iter()
            .map(|b| b.load(Ordering::Relaxed))
            .collect();
        if out.len() >= HEADER_BYTES as usize {
            out[0..4].copy_from_slice(&self.bump_offset().to_le_bytes());
            out[4..8].copy_from_slice(&self.allocation_count().to_le_bytes());
        }
        out
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("capacity", &self.capacity())
            .field("maximum", &self.maximum)
            .field("bump_offset", &self.bump_offset())
            .field("allocation_count", &self.allocation_count())
            .finish()
    }
}

fn zeroed(len: usize) -> Vec<AtomicU8> {
    (0..len).map(|_| AtomicU8::new(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Region {
        Region::with_capacity(1024).unwrap()
    }

    #[test]
    fn fresh_region_header() {
        let r = region();
        assert_eq!(r.bump_offset(), 8);
        assert_eq!(r.allocation_count(), 0);
        assert_eq!(r.size(0).unwrap(), 0);
        assert_eq!(r.block_length(0).unwrap(), 8);
        assert_eq!(r.used(), 0);
    }

    #[test]
    fn typed_accessors_are_little_endian() {
        let r = region();
        r.set_u32(64, 0x0403_0201).unwrap();
        assert_eq!(r.array_buffer(64, 4).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(r.get_u16(64).unwrap(), 0x0201);
        assert_eq!(r.get_u8(67).unwrap(), 4);
    }

    #[test]
    fn signed_and_float_accessors() {
        let r = region();
        r.set_i8(32, -5).unwrap();
        r.set_i16(34, -300).unwrap();
        r.set_i32(36, -70_000).unwrap();
        r.set_i64(40, i64::MIN).unwrap();
        r.set_f32(48, 1.5).unwrap();
        r.set_f64(56, -0.25).unwrap();
        r.set_u128(64, u128::MAX - 1).unwrap();
        assert_eq!(r.get_i8(32).unwrap(), -5);
        assert_eq!(r.get_i16(34).unwrap(), -300);
        assert_eq!(r.get_i32(36).unwrap(), -70_000);
        assert_eq!(r.get_i64(40).unwrap(), i64::MIN);
        assert_eq!(r.get_f32(48).unwrap(), 1.5);
        assert_eq!(r.get_f64(56).unwrap(), -0.25);
        assert_eq!(r.get_u128(64).unwrap(), u128::MAX - 1);
    }

    #[test]
    fn null_offset_is_rejected() {
        let r = region();
        assert_eq!(r.get_u8(0), Err(RegionError::NullOffset));
        assert_eq!(r.set_f64(0, 1.0), Err(RegionError::NullOffset));
        assert_eq!(r.array_buffer(0, 4), Err(RegionError::NullOffset));
    }

    #[test]
    fn header_words_are_not_addressable() {
        let r = region();
        assert_eq!(
            r.get_u32(4),
            Err(RegionError::ReservedOffset { offset: 4 })
        );
        assert_eq!(r.size(12), Err(RegionError::ReservedOffset { offset: 12 }));
    }

    #[test]
    fn out_of_bounds_access_is_an_error() {
        let r = region();
        assert!(matches!(
            r.get_u64(1020),
            Err(RegionError::OutOfBounds { offset: 1020, len: 8, .. })
        ));
        assert!(r.get_u32(1020).is_ok());
    }

    #[test]
    fn view_aliases_region_bytes() {
        let r = region();
        let view = r.view_buffer(100, 4).unwrap();
        view.set(0, 0xAB).unwrap();
        assert_eq!(r.get_u8(100).unwrap(), 0xAB);
        r.set_u8(103, 7).unwrap();
        assert_eq!(view.get(3), Some(7));
    }

    #[test]
    fn grow_extends_up_to_maximum() {
        let mut r = Region::new(RegionConfig::new(64).with_maximum(128)).unwrap();
        r.set_u8(60, 9).unwrap();
        r.grow(64).unwrap();
        assert_eq!(r.capacity(), 128);
        assert_eq!(r.get_u8(60).unwrap(), 9);
        assert_eq!(r.get_u8(127).unwrap(), 0);
        assert!(matches!(
            r.grow(1),
            Err(RegionError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn to_bytes_materializes_header() {
        let r = region();
        r.malloc(4).unwrap();
        let raw = r.to_bytes();
        assert_eq!(raw.len(), 1024);
        assert_eq!(u32::from_le_bytes(raw[0..4].try_into().unwrap()), 24);
        assert_eq!(u32::from_le_bytes(raw[4..8].try_into().unwrap()), 1);
        // First block header: size then length.
        assert_eq!(u32::from_le_bytes(raw[8..12].try_into().unwrap()), 4);
        assert_eq!(u32::from_le_bytes(raw[12..16].try_into().unwrap()), 16);
    }
}
