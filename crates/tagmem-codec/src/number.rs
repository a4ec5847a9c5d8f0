//! Narrowing doubles and big integers to the smallest element kind.

use tagmem_core::ElementKind;

use crate::error::CodecError;

/// Largest integer a double represents exactly together with all its
/// neighbours.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Classification bits stored in a number record, one byte each.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NumberFlags {
    /// The value is NaN.
    pub is_nan: bool,
    /// The value is neither infinite nor NaN.
    pub is_finite: bool,
    /// The value is finite with no fractional part.
    pub is_integer: bool,
    /// The value is an integer within `±MAX_SAFE_INTEGER`.
    pub is_safe_integer: bool,
}

impl NumberFlags {
    /// Classify a double.
    pub fn of(value: f64) -> Self {
        let is_integer = is_integer(value);
        Self {
            is_nan: value.is_nan(),
            is_finite: value.is_finite(),
            is_integer,
            is_safe_integer: is_integer && value.abs() <= MAX_SAFE_INTEGER,
        }
    }

    /// Pack into a `u32`: byte 0 is `is_nan`, byte 3 `is_safe_integer`.
    pub fn bits(self) -> u32 {
        u32::from_le_bytes([
            self.is_nan as u8,
            self.is_finite as u8,
            self.is_integer as u8,
            self.is_safe_integer as u8,
        ])
    }

    /// Unpack; any non-zero byte is `true`.
    pub fn from_bits(bits: u32) -> Self {
        let [nan, finite, integer, safe] = bits.to_le_bytes();
        Self {
            is_nan: nan != 0,
            is_finite: finite != 0,
            is_integer: integer != 0,
            is_safe_integer: safe != 0,
        }
    }
}

fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Narrow a non-zero double to its smallest exact element encoding.
///
/// Integers go to the first of `i8, i16, i32, i64` (negative) or
/// `u8, u16, u32, u64` (non-negative) that holds them exactly. Anything
/// else goes to `f32` when the round trip is exact, otherwise `f64`.
///
/// # Errors
///
/// [`CodecError::EncodingRange`] for integers outside the 64-bit range.
pub fn narrow_number(value: f64) -> Result<(ElementKind, Vec<u8>), CodecError> {
    if !is_integer(value) {
        let single = value as f32;
        if single as f64 == value {
            return Ok((ElementKind::F32, single.to_le_bytes().to_vec()));
        }
        return Ok((ElementKind::F64, value.to_le_bytes().to_vec()));
    }
    // Saturates outside the i128 range; the 64-bit checks below reject
    // those values anyway.
    narrow_integer(value as i128).ok_or_else(|| CodecError::EncodingRange {
        value: value.to_string(),
    })
}

/// Narrow an integer to its smallest exact element encoding.
pub fn narrow_integer(value: i128) -> Option<(ElementKind, Vec<u8>)> {
    macro_rules! first_fit {
        ($( $ty:ty => $kind:ident ),*) => {
            $(
                if let Ok(v) = <$ty>::try_from(value) {
                    return Some((ElementKind::$kind, v.to_le_bytes().to_vec()));
                }
            )*
        };
    }
    if value < 0 {
        first_fit!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);
    } else {
        first_fit!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);
    }
    None
}

/// Narrow a big integer to its 8-byte encoding: `i64` when negative,
/// `u64` otherwise.
pub fn narrow_bigint(value: i128) -> Result<(ElementKind, [u8; 8]), CodecError> {
    let fit = if value < 0 {
        i64::try_from(value).map(|v| (ElementKind::I64, v.to_le_bytes()))
    } else {
        u64::try_from(value).map(|v| (ElementKind::U64, v.to_le_bytes()))
    };
    fit.map_err(|_| CodecError::EncodingRange {
        value: value.to_string(),
    })
}

/// Read one element of `kind` from exactly its width in bytes.
pub(crate) fn widen(kind: ElementKind, bytes: &[u8]) -> Option<f64> {
    macro_rules! read {
        ($ty:ty) => {
            <$ty>::from_le_bytes(bytes.try_into().ok()?) as f64
        };
    }
    Some(match kind {
        ElementKind::U8 => read!(u8),
        ElementKind::I8 => read!(i8),
        ElementKind::U16 => read!(u16),
        ElementKind::I16 => read!(i16),
        ElementKind::U32 => read!(u32),
        ElementKind::I32 => read!(i32),
        ElementKind::U64 => read!(u64),
        ElementKind::I64 => read!(i64),
        ElementKind::F32 => read!(f32),
        ElementKind::F64 => read!(f64),
        ElementKind::V128 => return None,
    })
}
