//! Scalar handles: one element of kind `K`.

use std::fmt;
use std::marker::PhantomData;

use tagmem_region::{Region, RegionError};

use crate::debug::PointerDebug;
use crate::element::Element;
use crate::error::PointerError;
use crate::pointer::{Flavor, Pointer, TypedPointer};

/// Pointer to a single `K` element.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Number<K: Element> {
    pointer: Pointer,
    _kind: PhantomData<K>,
}

impl<K: Element> Number<K> {
    /// Allocate one element and store `value` in it.
    pub fn allocate(region: &Region, value: K::Native) -> Result<Self, RegionError> {
        let pointer = Pointer::malloc(region, K::BYTES_PER_ELEMENT)?;
        K::set(region, pointer.as_offset(), value)?;
        Ok(Self::from_pointer(pointer))
    }

    /// Parse `text` as a `K` and allocate it.
    ///
    /// Integer kinds accept integers only; float kinds accept any
    /// float literal. Surrounding whitespace is ignored.
    pub fn parse(region: &Region, text: &str) -> Result<Self, PointerError> {
        let value = text
            .trim()
            .parse::<K::Native>()
            .map_err(|_| PointerError::Parse {
                kind: K::KIND,
                text: text.to_owned(),
            })?;
        Ok(Self::allocate(region, value)?)
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
        if typed.flavor != Flavor::Scalar {
            return Err(PointerError::FlavorMismatch {
                expected: Flavor::Scalar,
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

    /// Read the element.
    pub fn read(&self, region: &Region) -> Result<K::Native, RegionError> {
        K::get(region, self.pointer.as_offset())
    }

    /// Overwrite the element.
    pub fn write(&self, region: &Region, value: K::Native) -> Result<(), RegionError> {
        K::set(region, self.pointer.as_offset(), value)
    }

    /// Erase the element kind into a value.
    pub const fn erase(&self) -> TypedPointer {
        TypedPointer {
            pointer: self.pointer,
            kind: K::KIND,
            flavor: Flavor::Scalar,
        }
    }

    /// Dump the block this handle points at.
    pub fn debug(&self, region: &Region) -> Result<PointerDebug<K>, PointerError> {
        PointerDebug::capture(region, self.pointer)
    }
}

impl<K: Element> fmt::Debug for Number<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number<{}>({})", K::KIND, self.pointer.as_offset())
    }
}
