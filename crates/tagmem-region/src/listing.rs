//! Walking the block chain.
//!
//! Blocks are laid end to end, so the whole allocation history can be
//! recovered from the headers alone: start at the first block and hop by
//! each block's padded length until a zero length (never allocated) or
//! the end of the region is reached.

use crate::region::{Region, FIRST_OFFSET};
use crate::view::RegionView;

/// One block found by [`Region::allocations`].
#[derive(Clone, Copy, Debug)]
pub struct Allocation<'a> {
    /// Offset of the block's data (what `malloc` returned).
    pub byte_offset: u32,
    /// Padded block length, header included.
    pub block_length: u32,
    /// Requested size in bytes.
    pub byte_length: u32,
    /// Aliased view of the block's `byte_length` data bytes.
    pub buffer: RegionView<'a>,
}

/// Lazy iterator over the blocks of a region.
///
/// Reads headers as it goes: it reflects the region's state at the time
/// each block is visited, not a snapshot taken at creation. Allocating
/// from another thread while iterating is a race; the iterator may or may
/// not see blocks published after it started. Clone it (or call
/// [`Region::allocations`] again) to restart.
#[derive(Clone, Debug)]
pub struct Allocations<'a> {
    region: &'a Region,
    next: u32,
}

impl Region {
    /// Iterate every block allocated so far, in allocation order.
    pub fn allocations(&self) -> Allocations<'_> {
        Allocations {
            region: self,
            next: FIRST_OFFSET,
        }
    }
}

impl<'a> Iterator for Allocations<'a> {
    type Item = Allocation<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.next;
        // A header past the end of the region means the chain is done.
        let block_length = self.region.block_length(offset).ok()?;
        if block_length == 0 {
            return None;
        }
        let byte_length = self.region.size(offset).ok()?;
        let buffer = self.region.view_buffer(offset, byte_length).ok()?;
        self.next = offset.checked_add(block_length)?;
        Some(Allocation {
            byte_offset: offset,
            block_length,
            byte_length,
            buffer,
        })
    }
}
