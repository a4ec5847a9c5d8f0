//! Codec error types.

use std::error::Error;
use std::fmt;

use tagmem_pointer::PointerError;
use tagmem_region::RegionError;

/// Errors from encoding, decoding and reference management.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// An integer does not fit any 64-bit element kind.
    EncodingRange {
        /// Text form of the rejected value.
        value: String,
    },
    /// The value has no byte encoding on this path.
    UnsupportedKind {
        /// What was rejected.
        kind: &'static str,
    },
    /// Record bytes do not match their shape.
    MalformedRecord {
        /// What was wrong.
        detail: String,
    },
    /// The reference table has no free slot.
    ExternTableFull {
        /// Slot limit, including the reserved null slot.
        max: u32,
    },
    /// A reference index with no object behind it.
    UnknownReference {
        /// The index read from the record.
        index: u32,
    },
    /// A context setting is out of range.
    InvalidConfig {
        /// Which setting and why.
        reason: String,
    },
    /// A region access failed.
    Region(RegionError),
    /// A typed pointer access failed.
    Pointer(PointerError),
}

impl CodecError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedRecord {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncodingRange { value } => {
                write!(f, "{value} does not fit a 64-bit integer element")
            }
            Self::UnsupportedKind { kind } => write!(f, "cannot encode {kind} as a record"),
            Self::MalformedRecord { detail } => write!(f, "malformed record: {detail}"),
            Self::ExternTableFull { max } => {
                write!(f, "reference table full ({max} slots)")
            }
            Self::UnknownReference { index } => write!(f, "no object at reference index {index}"),
            Self::InvalidConfig { reason } => write!(f, "invalid context config: {reason}"),
            Self::Region(e) => write!(f, "region error: {e}"),
            Self::Pointer(e) => write!(f, "pointer error: {e}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Region(e) => Some(e),
            Self::Pointer(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegionError> for CodecError {
    fn from(e: RegionError) -> Self {
        Self::Region(e)
    }
}

impl From<PointerError> for CodecError {
    fn from(e: PointerError) -> Self {
        match e {
            PointerError::Region(inner) => Self::Region(inner),
            other => Self::Pointer(other),
        }
    }
}
