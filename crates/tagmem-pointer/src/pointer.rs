//! Untyped and erased pointers.

use std::fmt;

use tagmem_core::ElementKind;
use tagmem_region::{Region, RegionError};

/// A raw offset into a region.
///
/// Offset 0 is the null pointer. There is no arithmetic and no implicit
/// conversion to a number; use [`Pointer::as_offset`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pointer(u32);

impl Pointer {
    /// The null pointer.
    pub const NULL: Self = Self(0);

    /// Wrap a raw offset.
    pub const fn new(offset: u32) -> Self {
        Self(offset)
    }

    /// Allocate `byte_length` bytes and return a pointer to them.
    pub fn malloc(region: &Region, byte_length: u32) -> Result<Self, RegionError> {
        region.malloc(byte_length).map(Self)
    }

    /// The raw offset.
    pub const fn as_offset(self) -> u32 {
        self.0
    }

    /// Whether this is the null pointer.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Requested byte length of the block this pointer addresses.
    ///
    /// The null pointer has no block; `Region::size(0)` is the allocation
    /// count, so it is rejected here instead.
    pub fn byte_length(self, region: &Region) -> Result<u32, RegionError> {
        if self.is_null() {
            return Err(RegionError::NullOffset);
        }
        region.size(self.0)
    }

    /// Owned copy of the block's bytes.
    pub fn to_bytes(self, region: &Region) -> Result<Vec<u8>, RegionError> {
        region.array_buffer(self.0, self.byte_length(region)?)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*{}", self.0)
    }
}

/// Whether a typed pointer addresses one element or a run of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// Exactly one element.
    Scalar,
    /// `size / width` elements.
    Values,
}

impl Flavor {
    /// Constructor-name suffix: `"Number"` or `"Values"`.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Scalar => "Number",
            Self::Values => "Values",
        }
    }
}

/// A pointer with its element kind and flavor carried as values.
///
/// This is what [`Number::erase`](crate::Number::erase) and
/// [`Values::erase`](crate::Values::erase) produce, and what the codec
/// accepts when a pointer itself is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypedPointer {
    /// The raw offset.
    pub pointer: Pointer,
    /// Element kind.
    pub kind: ElementKind,
    /// Scalar or array.
    pub flavor: Flavor,
}

impl TypedPointer {
    /// Constructor name of the handle class, e.g. `"Uint8Number"` or
    /// `"BigInt64Values"`.
    pub fn constructor_name(&self) -> String {
        format!("{}{}", self.kind.labels().long, self.flavor.suffix())
    }

    /// The raw offset.
    pub const fn as_offset(&self) -> u32 {
        self.pointer.as_offset()
    }
}

impl fmt::Display for TypedPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.constructor_name(), self.pointer.as_offset())
    }
}
