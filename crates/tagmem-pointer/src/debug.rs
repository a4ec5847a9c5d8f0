//! Structured dumps of a pointer's block.

use std::fmt;

use tagmem_region::Region;

use crate::element::Element;
use crate::error::PointerError;
use crate::pointer::Pointer;

/// Snapshot of a block as seen through element kind `K`.
///
/// `buffer` holds all `byte_length` bytes; `data` holds only the whole
/// elements, so a trailing partial element shows up in `buffer` alone.
#[derive(Clone, PartialEq)]
pub struct PointerDebug<K: Element> {
    /// Whole elements in the block.
    pub length: u32,
    /// Offset of the block's data.
    pub byte_offset: u32,
    /// Requested size of the block.
    pub byte_length: u32,
    /// Copy of the block's bytes.
    pub buffer: Vec<u8>,
    /// Decoded elements.
    pub data: Vec<K::Native>,
}

impl<K: Element> PointerDebug<K> {
    pub(crate) fn capture(region: &Region, pointer: Pointer) -> Result<Self, PointerError> {
        let byte_offset = pointer.as_offset();
        let byte_length = pointer.byte_length(region)?;
        let buffer = region.array_buffer(byte_offset, byte_length)?;
        let data: Vec<K::Native> = buffer
            .chunks_exact(K::BYTES_PER_ELEMENT as usize)
            .filter_map(K::from_le)
            .collect();
        Ok(Self {
            length: data.len() as u32,
            byte_offset,
            byte_length,
            buffer,
            data,
        })
    }
}

impl<K: Element> fmt::Debug for PointerDebug<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerDebug")
            .field("kind", &K::KIND)
            .field("length", &self.length)
            .field("byte_offset", &self.byte_offset)
            .field("byte_length", &self.byte_length)
            .field("buffer", &self.buffer)
            .field("data", &self.data)
            .finish()
    }
}
