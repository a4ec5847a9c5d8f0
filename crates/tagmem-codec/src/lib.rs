//! Tagged-value encoding over a tagmem region.
//!
//! A [`Context`] owns everything needed to turn a runtime [`Value`] into
//! bytes at an offset and back:
//!
//! - a [`TypeRegistry`] of deterministic type tags,
//! - the record codec ([`encode_record`] / [`decode_record`]),
//! - an [`ExternTable`] and [`MarkerChains`] for host objects, which are
//!   stood in for by 16-byte [`ExternRef`] records.
//!
//! ```text
//! Value ──classify──▶ (type tag, kind tag)
//!   │
//!   ├─ host object ──▶ ExternTable + [type, kind, index, 0]
//!   └─ otherwise   ──▶ Record { shape, bytes } ──malloc──▶ region
//! ```
//!
//! Encoding is all-or-nothing per call: either the record is allocated
//! and written, or an error is returned and the region is untouched.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
pub mod externref;
pub mod host;
pub mod number;
pub mod record;
pub mod registry;
pub mod tag;
pub mod value;

pub use config::ContextConfig;
pub use context::{Context, ExternDebug, TaggedPointer};
pub use error::CodecError;
pub use externref::{ExternRef, ExternTable, MarkerChains, MarkerId};
pub use host::{downcast_ref, HostObject, ObjectRef, PlainObject, Prototype};
pub use number::NumberFlags;
pub use record::{decode_record, encode_record, EmptyKind, Record, RecordShape};
pub use registry::TypeRegistry;
pub use tag::{label_of, tag_of, TypeDescriptor};
pub use value::{TypedArray, Value};
