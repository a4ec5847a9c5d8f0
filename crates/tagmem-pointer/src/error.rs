//! Pointer-layer error types.

use std::error::Error;
use std::fmt;

use tagmem_core::ElementKind;
use tagmem_region::RegionError;

use crate::pointer::Flavor;

/// Errors from typed pointer operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerError {
    /// The underlying region access failed.
    Region(RegionError),
    /// Text could not be parsed as an element of the given kind.
    Parse {
        /// Kind the text was parsed as.
        kind: ElementKind,
        /// The rejected text.
        text: String,
    },
    /// An element index past the end of a values pointer.
    IndexOutOfRange {
        /// Requested index.
        index: u32,
        /// Number of elements in the block.
        len: u32,
    },
    /// An erased pointer was converted to a handle of another kind.
    KindMismatch {
        /// Kind of the handle being built.
        expected: ElementKind,
        /// Kind carried by the erased pointer.
        found: ElementKind,
    },
    /// An erased pointer was converted to a handle of the other flavor.
    FlavorMismatch {
        /// Flavor of the handle being built.
        expected: Flavor,
        /// Flavor carried by the erased pointer.
        found: Flavor,
    },
}

impl fmt::Display for PointerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Region(e) => write!(f, "region error: {e}"),
            Self::Parse { kind, text } => write!(f, "cannot parse {text:?} as {kind}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for {len} elements")
            }
            Self::KindMismatch { expected, found } => {
                write!(f, "expected a {expected} pointer, found {found}")
            }
            Self::FlavorMismatch { expected, found } => write!(
                f,
                "expected a {} pointer, found a {} pointer",
                expected.suffix(),
                found.suffix()
            ),
        }
    }
}

impl Error for PointerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Region(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegionError> for PointerError {
    fn from(e: RegionError) -> Self {
        Self::Region(e)
    }
}
