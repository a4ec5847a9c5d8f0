//! Aliased, non-copying views into a region.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::RegionError;

/// A borrowed window of region bytes.
///
/// Reads and writes go straight to the region: a view observes writes
/// made through any other handle, and its own writes are visible to all
/// other readers.
#[derive(Clone, Copy)]
pub struct RegionView<'a> {
    offset: u32,
    bytes: &'a [AtomicU8],
}

impl<'a> RegionView<'a> {
    pub(crate) fn new(offset: u32, bytes: &'a [AtomicU8]) -> Self {
        Self { offset, bytes }
    }

    /// Absolute region offset of the first byte.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of bytes in the view.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the view covers zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read the byte at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).map(|b| b.load(Ordering::Relaxed))
    }

    /// Write the byte at `index`.
    pub fn set(&self, index: usize, value: u8) -> Result<(), RegionError> {
        let byte = self.bytes.get(index).ok_or(RegionError::OutOfBounds {
            offset: self.offset,
            len: index + 1,
            capacity: self.bytes.len(),
        })?;
        byte.store(value, Ordering::Relaxed);
        Ok(())
    }

    /// Iterate the current byte values.
    pub fn iter(&self) -> impl Iterator<Item = u8> + 'a {
        self.bytes.iter().map(|b| b.load(Ordering::Relaxed))
    }

    /// Copy the viewed bytes out.
    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl fmt::Debug for RegionView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionView")
            .field("offset", &self.offset)
            .field("bytes", &self.to_vec())
            .finish()
    }
}
