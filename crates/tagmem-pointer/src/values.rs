//! Array handles: a run of `K` elements filling one block.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use rand::{CryptoRng, RngCore};
use tagmem_region::{Region, RegionError};

use crate::debug::PointerDebug;
use crate::element::Element;
use crate::error::PointerError;
use crate::pointer::{Flavor, Pointer, TypedPointer};

/// Pointer to `size / width` consecutive `K` elements.
///
/// The element count is not stored in the handle; it is recomputed from
/// the block header on every call.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Values<K: Element> {
    pointer: Pointer,
    _kind: PhantomData<K>,
}

impl<K: Element> Values<K> {
    /// Allocate a block holding `values` and copy them in.
    pub fn from_slice(region: &Region, values: &[K::Native]) -> Result<Self, RegionError> {
        let mut bytes = Vec::with_capacity(values.len() * K::BYTES_PER_ELEMENT as usize);
        for &v in values {
            K::put_le(v, &mut bytes);
        }
        let byte_length = block_size(region, bytes.len())?;
        let pointer = Pointer::malloc(region, byte_length)?;
        region.write_bytes(pointer.as_offset(), &bytes)?;
        Ok(Self::from_pointer(pointer))
    }

    /// Allocate `count` elements filled from a cryptographically secure
    /// generator. A `count` of 0 allocates one element.
    pub fn random<R>(region: &Region, count: u32, rng: &mut R) -> Result<Self, RegionError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let count = count.max(1);
        let byte_length = count.checked_mul(K::BYTES_PER_ELEMENT).ok_or(
            RegionError::CapacityExceeded {
                requested: count as u64 * K::BYTES_PER_ELEMENT as u64,
                available: region.remaining() as u64,
            },
        )?;
        let pointer = Pointer::malloc(region, byte_length)?;
        let mut bytes = vec![0u8; byte_length as usize];
        rng.fill_bytes(&mut bytes);
        region.write_bytes(pointer.as_offset(), &bytes)?;
        Ok(Self::from_pointer(pointer))
    }

    /// [`Values::random`] seeded from the thread-local OS-seeded generator.
    pub fn random_secure(region: &Region, count: u32) -> Result<Self, RegionError> {
        Self::random(region, count, &mut rand::rng())
    }

    /// Wrap an existing offset without checking its block.
    pub const fn from_pointer(pointer: Pointer) -> Self {
        Self {
            pointer,
            _kind: PhantomData,
        }
    }

    /// Rebuild a handle from its erased form.
    pub fn from_typed(typed: TypedPointer) -> Result<Self, PointerError> {
        if typed.kind != K::KIND {
            return Err(PointerError::KindMismatch {
                expected: K::KIND,
                found: typed.kind,
            });
        }
        if typed.flavor != Flavor::Values {
            return Err(PointerError::FlavorMismatch {
                expected: Flavor::Values,
                found: typed.flavor,
            });
        }
        Ok(Self::from_pointer(typed.pointer))
    }

    /// The untyped pointer.
    pub const fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// The raw offset.
    pub const fn as_offset(&self) -> u32 {
        self.pointer.as_offset()
    }

    /// Number of whole elements in the block.
    pub fn len(&self, region: &Region) -> Result<u32, RegionError> {
        Ok(self.pointer.byte_length(region)? / K::BYTES_PER_ELEMENT)
    }

    /// Whether the block holds no whole element.
    pub fn is_empty(&self, region: &Region) -> Result<bool, RegionError> {
        Ok(self.len(region)? == 0)
    }

    /// Read element `index`.
    pub fn at(&self, region: &Region, index: u32) -> Result<K::Native, PointerError> {
        let offset = self.element_offset(region, index)?;
        Ok(K::get(region, offset)?)
    }

    /// Overwrite element `index`.
    pub fn set(&self, region: &Region, index: u32, value: K::Native) -> Result<(), PointerError> {
        let offset = self.element_offset(region, index)?;
        Ok(K::set(region, offset, value)?)
    }

    fn element_offset(&self, region: &Region, index: u32) -> Result<u32, PointerError> {
        let len = self.len(region)?;
        if index >= len {
            return Err(PointerError::IndexOutOfRange { index, len });
        }
        Ok(self.pointer.as_offset() + index * K::BYTES_PER_ELEMENT)
    }

    /// Lazy iterator over the elements.
    ///
    /// Each step reads the region, so writes made between steps are
    /// observed. The element count is fixed when the iterator is
    /// created. Call again (or clone) to restart.
    pub fn iter<'a>(&self, region: &'a Region) -> Result<ValuesIter<'a, K>, RegionError> {
        let len = self.len(region)?;
        // Validate the whole span once so each step can only fail on a
        // corrupted header.
        region.view_buffer(self.pointer.as_offset(), len * K::BYTES_PER_ELEMENT)?;
        Ok(ValuesIter {
            region,
            next: self.pointer.as_offset(),
            remaining: len,
            _kind: PhantomData,
        })
    }

    /// Collect every element.
    pub fn to_vec(&self, region: &Region) -> Result<Vec<K::Native>, RegionError> {
        Ok(self.iter(region)?.collect())
    }

    /// Erase the element kind into a value.
    pub const fn erase(&self) -> TypedPointer {
        TypedPointer {
            pointer: self.pointer,
            kind: K::KIND,
            flavor: Flavor::Values,
        }
    }

    /// Dump the block this handle points at.
    pub fn debug(&self, region: &Region) -> Result<PointerDebug<K>, PointerError> {
        PointerDebug::capture(region, self.pointer)
    }
}

impl<K: Element> fmt::Debug for Values<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Values<{}>({})", K::KIND, self.pointer.as_offset())
    }
}

fn block_size(region: &Region, len: usize) -> Result<u32, RegionError> {
    u32::try_from(len).map_err(|_| RegionError::CapacityExceeded {
        requested: len as u64,
        available: region.remaining() as u64,
    })
}

/// Iterator returned by [`Values::iter`].
pub struct ValuesIter<'a, K: Element> {
    region: &'a Region,
    next: u32,
    remaining: u32,
    _kind: PhantomData<K>,
}

impl<K: Element> Clone for ValuesIter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            region: self.region,
            next: self.next,
            remaining: self.remaining,
            _kind: PhantomData,
        }
    }
}

impl<K: Element> fmt::Debug for ValuesIter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesIter")
            .field("kind", &K::KIND)
            .field("next", &self.next)
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl<K: Element> Iterator for ValuesIter<'_, K> {
    type Item = K::Native;

    fn next(&mut self) -> Option<K::Native> {
        if self.remaining == 0 {
            return None;
        }
        match K::get(self.region, self.next) {
            Ok(value) => {
                self.remaining -= 1;
                self.next += K::BYTES_PER_ELEMENT;
                Some(value)
            }
            Err(_) => {
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}

impl<K: Element> FusedIterator for ValuesIter<'_, K> {}
