//! Element adapters: the type-level side of [`ElementKind`].

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use tagmem_core::ElementKind;
use tagmem_region::{Region, RegionError};

/// A fixed-width element a pointer can be typed with.
///
/// Each implementor is a zero-sized marker tying a Rust native type to
/// an [`ElementKind`] and to the region's getter/setter pair for it.
pub trait Element: Copy + Eq + Hash + fmt::Debug + Default + Send + Sync + 'static {
    /// The Rust type one element decodes to.
    type Native: Copy + PartialEq + fmt::Debug + FromStr;

    /// The runtime kind this marker stands for.
    const KIND: ElementKind;

    /// Smallest representable value.
    const MIN: Self::Native;

    /// Largest representable value.
    const MAX: Self::Native;

    /// Width of one element in bytes.
    const BYTES_PER_ELEMENT: u32 = Self::KIND.bytes_per_element();

    /// Read one element at `offset`.
    fn get(region: &Region, offset: u32) -> Result<Self::Native, RegionError>;

    /// Write one element at `offset`.
    fn set(region: &Region, offset: u32, value: Self::Native) -> Result<(), RegionError>;

    /// Append the little-endian bytes of `value` to `out`.
    fn put_le(value: Self::Native, out: &mut Vec<u8>);

    /// Decode one element from exactly `BYTES_PER_ELEMENT` bytes.
    fn from_le(bytes: &[u8]) -> Option<Self::Native>;
}

macro_rules! elements {
    ($( $(#[$doc:meta])* $name:ident: $native:ty => $kind:ident, $get:ident, $set:ident; )*) => {
        $(
            $(#[$doc])*
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl Element for $name {
                type Native = $native;
                const KIND: ElementKind = ElementKind::$kind;
                const MIN: $native = <$native>::MIN;
                const MAX: $native = <$native>::MAX;

                fn get(region: &Region, offset: u32) -> Result<$native, RegionError> {
                    region.$get(offset)
                }

                fn set(region: &Region, offset: u32, value: $native) -> Result<(), RegionError> {
                    region.$set(offset, value)
                }

                fn put_le(value: $native, out: &mut Vec<u8>) {
                    out.extend_from_slice(&value.to_le_bytes());
                }

                fn from_le(bytes: &[u8]) -> Option<$native> {
                    Some(<$native>::from_le_bytes(bytes.try_into().ok()?))
                }
            }
        )*
    };
}

elements! {
    /// Unsigned 8-bit elements.
    U8: u8 => U8, get_u8, set_u8;
    /// Signed 8-bit elements.
    I8: i8 => I8, get_i8, set_i8;
    /// Unsigned 16-bit elements.
    U16: u16 => U16, get_u16, set_u16;
    /// Signed 16-bit elements.
    I16: i16 => I16, get_i16, set_i16;
    /// Unsigned 32-bit elements.
    U32: u32 => U32, get_u32, set_u32;
    /// Signed 32-bit elements.
    I32: i32 => I32, get_i32, set_i32;
    /// Unsigned 64-bit elements.
    U64: u64 => U64, get_u64, set_u64;
    /// Signed 64-bit elements.
    I64: i64 => I64, get_i64, set_i64;
    /// 32-bit float elements.
    F32: f32 => F32, get_f32, set_f32;
    /// 64-bit float elements.
    F64: f64 => F64, get_f64, set_f64;
    /// 128-bit vector lanes.
    V128: u128 => V128, get_u128, set_u128;
}
