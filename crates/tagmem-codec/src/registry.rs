//! The type tag registry.
//!
//! Two namespaces: `primitives` (the eight value kinds, prefix
//! `typeof_`) and `constructors` (host type names, suffix `_object`).
//! Both are filled at construction; constructors not in the fixed list
//! are registered the first time they are asked for.

use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::IndexMap;
use tagmem_core::Primitive;

use crate::tag::TypeDescriptor;

/// Prefix of every primitive label.
pub const PRIMITIVE_PREFIX: &str = "typeof_";

/// Suffix of every constructor label.
pub const CONSTRUCTOR_SUFFIX: &str = "_object";

/// Host type names registered up front, in registration order.
pub const CONSTRUCTOR_NAMES: &[&str] = &[
    "Array",
    "Object",
    "Number",
    "String",
    "Boolean",
    "BigInt",
    "Symbol",
    "Function",
    "Date",
    "RegExp",
    "Map",
    "Set",
    "WeakMap",
    "WeakSet",
    "ArrayBuffer",
    "SharedArrayBuffer",
    "DataView",
    "Promise",
    "Error",
    "GeneratorFunction",
    "AsyncFunction",
    "ArrayBufferView",
    "OffsetPointer",
    "Pointer",
    "TypedArray",
    "TypedNumber",
    "TypedValues",
    "Uint8Array",
    "Uint8Number",
    "Uint8Values",
    "Int8Array",
    "Int8Number",
    "Int8Values",
    "Uint16Array",
    "Uint16Number",
    "Uint16Values",
    "Int16Array",
    "Int16Number",
    "Int16Values",
    "Uint32Array",
    "Uint32Number",
    "Uint32Values",
    "Int32Array",
    "Int32Number",
    "Int32Values",
    "Float32Array",
    "Float32Number",
    "Float32Values",
    "Float64Array",
    "Float64Number",
    "Float64Values",
    "BigUint64Array",
    "BigUint64Number",
    "BigUint64Values",
    "BigInt64Array",
    "BigInt64Number",
    "BigInt64Values",
    "BigVec128Array",
    "BigVec128Number",
    "BigVec128Values",
    "WindowProperties",
    "Window",
    "Worker",
    "Navigator",
    "WorkerNavigator",
    "Crypto",
    "Performance",
    "CompassHeading",
    "SubtleCrypto",
    "TextDecoder",
    "TextEncoder",
    "URL",
    "URLSearchParams",
    "WebAssembly",
    "WebGLRenderingContext",
    "WebGL2RenderingContext",
    "WorkerGlobalScope",
    "XMLHttpRequest",
    "XMLDocument",
    "Document",
    "HTMLElement",
    "HTMLAnchorElement",
    "HTMLAreaElement",
    "Blob",
    "File",
    "FileList",
    "FileReader",
    "FormData",
    "IndexedDB",
    "IDBDatabase",
    "IDBObjectStore",
    "IDBRequest",
    "IDBTransaction",
    "IDBCursor",
    "IDBIndex",
    "IDBKeyRange",
    "IDBFactory",
    "IDBOpenDBRequest",
    "MessageChannel",
    "WebSocket",
];

type Key = (String, String, String);

/// Interned type descriptors with forward and reverse lookup.
#[derive(Debug)]
pub struct TypeRegistry {
    interned: IndexMap<Key, Arc<TypeDescriptor>>,
    primitives: IndexMap<Primitive, Arc<TypeDescriptor>>,
    constructors: IndexMap<String, Arc<TypeDescriptor>>,
    primitive_tags: IndexMap<u32, Arc<TypeDescriptor>>,
    constructor_tags: IndexMap<u32, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    /// Registry with both fixed tables populated.
    pub fn new() -> Self {
        let mut registry = Self {
            interned: IndexMap::new(),
            primitives: IndexMap::with_capacity(Primitive::ALL.len()),
            constructors: IndexMap::with_capacity(CONSTRUCTOR_NAMES.len()),
            primitive_tags: IndexMap::with_capacity(Primitive::ALL.len()),
            constructor_tags: IndexMap::with_capacity(CONSTRUCTOR_NAMES.len()),
        };
        for primitive in Primitive::ALL {
            let descriptor = registry.register(primitive.name(), PRIMITIVE_PREFIX, "");
            index_tag(&mut registry.primitive_tags, &descriptor);
            registry.primitives.insert(primitive, descriptor);
        }
        for &name in CONSTRUCTOR_NAMES {
            registry.insert_constructor(name);
        }
        registry
    }

    /// Intern the descriptor for `prefix + name + suffix`.
    ///
    /// The same triple always yields the same `Arc`.
    pub fn register(&mut self, name: &str, prefix: &str, suffix: &str) -> Arc<TypeDescriptor> {
        let key = (prefix.to_owned(), name.to_owned(), suffix.to_owned());
        Arc::clone(
            self.interned
                .entry(key)
                .or_insert_with(|| Arc::new(TypeDescriptor::new(name, prefix, suffix))),
        )
    }

    /// Descriptor of a primitive kind.
    pub fn primitive(&self, primitive: Primitive) -> &Arc<TypeDescriptor> {
        // Every primitive is inserted in `new`.
        &self.primitives[&primitive]
    }

    /// Descriptor of a constructor, registering it on first use.
    pub fn constructor(&mut self, name: &str) -> Arc<TypeDescriptor> {
        if let Some(descriptor) = self.constructors.get(name) {
            return Arc::clone(descriptor);
        }
        let descriptor = self.insert_constructor(name);
        log::debug!("registered constructor {name} as {descriptor} ({})", descriptor.value());
        descriptor
    }

    /// Descriptor of a constructor, if already registered.
    pub fn find_constructor(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.constructors.get(name)
    }

    /// Reverse lookup in the primitive namespace.
    pub fn primitive_by_tag(&self, tag: u32) -> Option<&Arc<TypeDescriptor>> {
        self.primitive_tags.get(&tag)
    }

    /// Reverse lookup in the constructor namespace. On a collision the
    /// first descriptor registered under the tag is returned.
    pub fn constructor_by_tag(&self, tag: u32) -> Option<&Arc<TypeDescriptor>> {
        self.constructor_tags.get(&tag)
    }

    /// Primitive descriptors in registration order.
    pub fn primitives(&self) -> impl Iterator<Item = (Primitive, &Arc<TypeDescriptor>)> {
        self.primitives.iter().map(|(&p, d)| (p, d))
    }

    /// Constructor descriptors in registration order.
    pub fn constructors(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.constructors.values()
    }

    fn insert_constructor(&mut self, name: &str) -> Arc<TypeDescriptor> {
        let descriptor = self.register(name, "", CONSTRUCTOR_SUFFIX);
        index_tag(&mut self.constructor_tags, &descriptor);
        self.constructors
            .insert(name.to_owned(), Arc::clone(&descriptor));
        descriptor
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn index_tag(tags: &mut IndexMap<u32, Arc<TypeDescriptor>>, descriptor: &Arc<TypeDescriptor>) {
    match tags.entry(descriptor.value()) {
        Entry::Vacant(slot) => {
            slot.insert(Arc::clone(descriptor));
        }
        Entry::Occupied(slot) if slot.get().label() != descriptor.label() => {
            log::warn!(
                "type tag {} collides: {} keeps it, {} is forward-only",
                descriptor.value(),
                slot.get(),
                descriptor
            );
        }
        Entry::Occupied(_) => {}
    }
}
