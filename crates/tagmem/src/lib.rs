//! tagmem: a bump-allocated byte region with typed pointers and a
//! self-describing tagged-value encoding.
//!
//! This is the facade crate that re-exports the public API of every
//! tagmem sub-crate. For most users, adding `tagmem` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tagmem::prelude::*;
//! use std::sync::Arc;
//!
//! let mut ctx = Context::new(ContextConfig::with_region_bytes(64 * 1024)).unwrap();
//!
//! // Plain values become records in the region.
//! let tagged = ctx.encode(&Value::from(256.0)).unwrap();
//! assert_eq!(tagged.as_offset(), 16);
//! assert_eq!(ctx.decode(&tagged).unwrap(), Value::from(256.0));
//!
//! // Host objects become 16-byte references, one per object.
//! let socket = PlainObject::new("WebSocket").into_ref();
//! let a = ctx.encode(&Value::from(Arc::clone(&socket))).unwrap();
//! let b = ctx.encode(&Value::from(socket)).unwrap();
//! assert_eq!(a, b);
//!
//! // Typed pointers share the same region.
//! let region = Arc::clone(ctx.region());
//! let lanes = Values::<U16>::from_slice(&region, &[1, 2, 3]).unwrap();
//! assert_eq!(lanes.to_vec(&region).unwrap(), vec![1, 2, 3]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tagmem-core` | `ElementKind`, `Primitive` |
//! | [`region`] | `tagmem-region` | `Region`, allocator, block listing |
//! | [`pointer`] | `tagmem-pointer` | `Number<K>`, `Values<K>`, element markers |
//! | [`codec`] | `tagmem-codec` | Tag registry, records, external references, `Context` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Shared classifications (`tagmem-core`).
pub use tagmem_core as types;

/// The byte region and its bump allocator (`tagmem-region`).
///
/// [`region::Region::malloc`] hands out 16-byte-aligned, length-prefixed
/// blocks; [`region::Region::allocations`] walks them back.
pub use tagmem_region as region;

/// Typed offset handles (`tagmem-pointer`).
///
/// [`pointer::Number`] for one element, [`pointer::Values`] for a run
/// of them.
pub use tagmem_pointer as pointer;

/// Tagged-value encoding (`tagmem-codec`).
///
/// Start from [`codec::Context`].
pub use tagmem_codec as codec;

/// Common imports for typical tagmem usage.
///
/// ```rust
/// use tagmem::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use tagmem_core::{ElementKind, Primitive};

    // Region
    pub use tagmem_region::{Region, RegionConfig, RegionError};

    // Pointers
    pub use tagmem_pointer::{
        Element, Number, Pointer, PointerError, TypedPointer, Values, F32, F64, I16, I32, I64,
        I8, U16, U32, U64, U8, V128,
    };

    // Codec
    pub use tagmem_codec::{
        CodecError, Context, ContextConfig, HostObject, ObjectRef, PlainObject, Prototype,
        TaggedPointer, TypedArray, Value,
    };
}
