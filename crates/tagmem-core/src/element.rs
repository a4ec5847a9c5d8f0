//! Element kinds for typed pointers.
//!
//! An [`ElementKind`] describes how a run of bytes in the region is
//! interpreted: how wide one element is, whether it is signed, and
//! whether it is an IEEE-754 float. Pointer handles carry a kind at the
//! type level; the erased form carries it as a value of this enum.

use std::fmt;

/// Fixed-width element adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 64-bit integer.
    U64,
    /// Signed 64-bit integer.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// 128-bit vector lane, stored as a little-endian `u128`.
    V128,
}

/// Display names of an [`ElementKind`] in the different vocabularies
/// it is referred to by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Labels {
    /// Long name, e.g. `"Uint16"` or `"BigInt64"`.
    pub long: &'static str,
    /// Short name, e.g. `"u16"`.
    pub short: &'static str,
    /// Name of the matching typed-array constructor, e.g. `"Uint16Array"`.
    pub array: &'static str,
    /// WebAssembly value type the element loads into.
    pub wasm: &'static str,
}

impl ElementKind {
    /// Every element kind, narrowest integers first.
    pub const ALL: [ElementKind; 11] = [
        Self::U8,
        Self::I8,
        Self::U16,
        Self::I16,
        Self::U32,
        Self::I32,
        Self::U64,
        Self::I64,
        Self::F32,
        Self::F64,
        Self::V128,
    ];

    /// Width of one element in bytes.
    pub const fn bytes_per_element(self) -> u32 {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
            Self::V128 => 16,
        }
    }

    /// Whether the element is a two's-complement signed integer.
    ///
    /// Floats report `false`: their sign is part of the IEEE encoding,
    /// not a choice between two integer interpretations.
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Whether the element is an IEEE-754 float.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Display labels for this kind.
    pub const fn labels(self) -> Labels {
        let (long, short, array, wasm) = match self {
            Self::U8 => ("Uint8", "u8", "Uint8Array", "i32"),
            Self::I8 => ("Int8", "i8", "Int8Array", "i32"),
            Self::U16 => ("Uint16", "u16", "Uint16Array", "i32"),
            Self::I16 => ("Int16", "i16", "Int16Array", "i32"),
            Self::U32 => ("Uint32", "u32", "Uint32Array", "i32"),
            Self::I32 => ("Int32", "i32", "Int32Array", "i32"),
            Self::U64 => ("BigUint64", "u64", "BigUint64Array", "i64"),
            Self::I64 => ("BigInt64", "i64", "BigInt64Array", "i64"),
            Self::F32 => ("Float32", "f32", "Float32Array", "f32"),
            Self::F64 => ("Float64", "f64", "Float64Array", "f64"),
            Self::V128 => ("BigVec128", "v128", "BigVec128Array", "v128"),
        };
        Labels {
            long,
            short,
            array,
            wasm,
        }
    }

    /// Look a kind up by its short label (`"u8"`, `"f64"`, ...).
    pub fn from_short(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.labels().short == label)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.labels().short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_match_native_types() {
        assert_eq!(ElementKind::U8.bytes_per_element(), 1);
        assert_eq!(ElementKind::I16.bytes_per_element(), 2);
        assert_eq!(ElementKind::F32.bytes_per_element(), 4);
        assert_eq!(ElementKind::I64.bytes_per_element(), 8);
        assert_eq!(ElementKind::V128.bytes_per_element(), 16);
    }

    #[test]
    fn floats_are_not_signed_integers() {
        for kind in ElementKind::ALL {
            assert!(!(kind.is_float() && kind.is_signed()), "{kind}");
        }
    }

    #[test]
    fn short_labels_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_short(kind.labels().short), Some(kind));
        }
        assert_eq!(ElementKind::from_short("u12"), None);
    }

    #[test]
    fn array_labels_follow_host_names() {
        assert_eq!(ElementKind::U64.labels().array, "BigUint64Array");
        assert_eq!(ElementKind::V128.labels().wasm, "v128");
    }
}
