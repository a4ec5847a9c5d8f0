//! Core classifications shared across the tagmem workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the closed vocabularies every other crate agrees on:
//!
//! - [`ElementKind`]: the fixed-width element adapters a pointer can be
//!   typed with (width, signedness, float-ness, labels).
//! - [`Primitive`]: the eight primitive value kinds a host value can be
//!   classified as before encoding.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod primitive;

pub use element::{ElementKind, Labels};
pub use primitive::Primitive;
