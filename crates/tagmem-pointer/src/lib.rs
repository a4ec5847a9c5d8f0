//! Typed offset handles into a tagmem [`Region`](tagmem_region::Region).
//!
//! A pointer is nothing more than a `u32` offset returned by the region's
//! allocator. This crate attaches an element kind to that offset at the
//! type level so reads and writes go through the right width and
//! signedness:
//!
//! - [`Number<K>`]: exactly one element of kind `K`.
//! - [`Values<K>`]: a run of `size / width` elements of kind `K`.
//! - [`TypedPointer`]: the erased form, carrying the kind as a value.
//!
//! Element kinds are zero-sized markers implementing [`Element`]:
//! [`U8`], [`I8`], [`U16`], [`I16`], [`U32`], [`I32`], [`U64`], [`I64`],
//! [`F32`], [`F64`] and [`V128`].
//!
//! Handles never own memory. They stay valid for as long as the region
//! they were allocated from; there is no free.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod debug;
pub mod element;
pub mod error;
pub mod number;
pub mod pointer;
pub mod values;

pub use debug::PointerDebug;
pub use element::{Element, F32, F64, I16, I32, I64, I8, U16, U32, U64, U8, V128};
pub use error::PointerError;
pub use number::Number;
pub use pointer::{Flavor, Pointer, TypedPointer};
pub use values::{Values, ValuesIter};
