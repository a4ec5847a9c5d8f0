//! The encoding context: one region plus every registry that gives its
//! records meaning.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tagmem_pointer::{Pointer, TypedPointer, Values, U32};
use tagmem_region::{Region, RegionError};

use crate::config::ContextConfig;
use crate::error::CodecError;
use crate::externref::{ExternRef, ExternTable, MarkerChains, MarkerId};
use crate::host::{identity, ObjectRef};
use crate::record::{decode_record, encode_record, RecordShape};
use crate::registry::TypeRegistry;
use crate::tag::TypeDescriptor;
use crate::value::{object_primitive, Value};

/// Where an encoded value lives and how to read it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaggedPointer {
    /// Offset of the record.
    pub pointer: Pointer,
    /// Primitive tag of the encoded value.
    pub type_tag: u32,
    /// Constructor tag of the encoded value.
    pub kind_tag: u32,
    /// Layout of the record.
    pub shape: RecordShape,
}

impl TaggedPointer {
    /// The raw offset.
    pub fn as_offset(&self) -> u32 {
        self.pointer.as_offset()
    }
}

/// What an external reference record resolves to.
#[derive(Clone, Debug)]
pub struct ExternDebug {
    /// Primitive descriptor for the record's type tag.
    pub type_of: Option<Arc<TypeDescriptor>>,
    /// Constructor descriptor for the record's kind tag.
    pub object_of: Option<Arc<TypeDescriptor>>,
    /// Table index stored in the record.
    pub ref_index: u32,
    /// The referenced object.
    pub object: ObjectRef,
}

/// Encoder and decoder over a shared region.
///
/// The region is shared (`Arc`); everything else belongs to the context
/// and changes only through `&mut self`. Caches hold strong references
/// for the context's lifetime.
pub struct Context {
    region: Arc<Region>,
    registry: TypeRegistry,
    externs: ExternTable,
    markers: MarkerChains,
    references: IndexMap<usize, ExternRef>,
}

impl Context {
    /// A context over a fresh region.
    pub fn new(config: ContextConfig) -> Result<Self, CodecError> {
        config.validate()?;
        let region = Region::new(config.region)?;
        Ok(Self::with_region(Arc::new(region), config.extern_table_max))
    }

    /// A context over an existing region.
    pub fn with_region(region: Arc<Region>, extern_table_max: u32) -> Self {
        Self {
            region,
            registry: TypeRegistry::new(),
            externs: ExternTable::new(extern_table_max),
            markers: MarkerChains::new(),
            references: IndexMap::new(),
        }
    }

    /// The region records are written to.
    pub fn region(&self) -> &Arc<Region> {
        &self.region
    }

    /// The tag registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The tag registry, for registering names ahead of use.
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// The reference table.
    pub fn externs(&self) -> &ExternTable {
        &self.externs
    }

    /// The marker arena.
    pub fn markers(&self) -> &MarkerChains {
        &self.markers
    }

    /// Encode `value` into the region.
    ///
    /// Host objects become external references (the same object always
    /// yields the same reference). Everything else is written as a fresh
    /// record. Nothing is allocated when encoding fails.
    pub fn encode(&mut self, value: &Value) -> Result<TaggedPointer, CodecError> {
        if let Value::Object(object) = value {
            let reference = self.externalize(object)?;
            return Ok(TaggedPointer {
                pointer: reference.pointer(),
                type_tag: reference.type_tag(),
                kind_tag: reference.kind_tag(),
                shape: RecordShape::Extern(reference.marker()),
            });
        }

        let (primitive, constructor) = value.classify();
        let type_tag = self.registry.primitive(primitive).value();
        let kind_tag = self.registry.constructor(&constructor).value();

        let record = encode_record(value, &self.region)?;
        let byte_length =
            u32::try_from(record.len()).map_err(|_| RegionError::CapacityExceeded {
                requested: record.len() as u64,
                available: self.region.remaining() as u64,
            })?;
        let pointer = Pointer::malloc(&self.region, byte_length)?;
        self.region.write_bytes(pointer.as_offset(), &record.bytes)?;

        Ok(TaggedPointer {
            pointer,
            type_tag,
            kind_tag,
            shape: record.shape,
        })
    }

    /// Read back the value behind a tagged pointer.
    ///
    /// Pointer copies decode to a handle of the same kind over the copy.
    pub fn decode(&self, tagged: &TaggedPointer) -> Result<Value, CodecError> {
        match tagged.shape {
            RecordShape::Extern(_) => Ok(Value::Object(Arc::clone(self.deref(tagged.pointer)?))),
            RecordShape::Pointer(kind, flavor) => Ok(Value::Pointer(TypedPointer {
                pointer: tagged.pointer,
                kind,
                flavor,
            })),
            shape => {
                let bytes = tagged.pointer.to_bytes(&self.region)?;
                decode_record(shape, &bytes)
            }
        }
    }

    /// Stand a host object in for a 16-byte reference record.
    ///
    /// Returns the cached reference when the object was seen before.
    /// Otherwise builds the marker chain for its prototypes, allocates the
    /// record and appends the object to the table.
    ///
    /// # Errors
    ///
    /// - [`CodecError::ExternTableFull`] when the table has no free slot.
    /// - [`CodecError::Region`] when the record cannot be allocated.
    pub fn externalize(&mut self, object: &ObjectRef) -> Result<ExternRef, CodecError> {
        let key = identity(object);
        if let Some(reference) = self.references.get(&key) {
            return Ok(*reference);
        }

        let Some(index) = self.externs.next_index() else {
            log::warn!(
                "reference table full ({} slots), cannot externalize {}",
                self.externs.max(),
                object.constructor_name()
            );
            return Err(CodecError::ExternTableFull {
                max: self.externs.max(),
            });
        };

        let type_tag = self.registry.primitive(object_primitive(&**object)).value();
        let kind_tag = self.registry.constructor(object.constructor_name()).value();
        let words = ExternRef::words(type_tag, kind_tag, index);
        let values = Values::<U32>::from_slice(&self.region, &words)?;
        let marker = self.markers.marker_for(object.prototype());
        self.externs.push(Arc::clone(object))?;

        let reference = ExternRef::new(values, marker, type_tag, kind_tag, index);
        self.references.insert(key, reference);
        log::debug!(
            "externalized {} as ref {index} at {} (marker {marker})",
            object.constructor_name(),
            values.as_offset()
        );
        Ok(reference)
    }

    fn record_words(&self, pointer: Pointer) -> Result<[u32; ExternRef::WORDS], CodecError> {
        let words = Values::<U32>::from_pointer(pointer).to_vec(&self.region)?;
        words.try_into().map_err(|words: Vec<u32>| {
            CodecError::malformed(format!(
                "reference record holds {} words, expected {}",
                words.len(),
                ExternRef::WORDS
            ))
        })
    }

    /// The host object an external reference record points at.
    pub fn deref(&self, pointer: Pointer) -> Result<&ObjectRef, CodecError> {
        let [_, _, index, _] = self.record_words(pointer)?;
        self.externs
            .get(index)
            .ok_or(CodecError::UnknownReference { index })
    }

    /// Resolve every field of an external reference record.
    pub fn extern_debug(&self, pointer: Pointer) -> Result<ExternDebug, CodecError> {
        let [type_tag, kind_tag, ref_index, _] = self.record_words(pointer)?;
        let object = self
            .externs
            .get(ref_index)
            .ok_or(CodecError::UnknownReference { index: ref_index })?;
        Ok(ExternDebug {
            type_of: self.registry.primitive_by_tag(type_tag).cloned(),
            object_of: self.registry.constructor_by_tag(kind_tag).cloned(),
            ref_index,
            object: Arc::clone(object),
        })
    }

    /// Marker names from `marker` up to `Externref`.
    pub fn marker_chain(&self, marker: MarkerId) -> Vec<&str> {
        self.markers.chain(marker)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("region", &self.region)
            .field("references", &self.externs.len())
            .field("markers", &self.markers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PlainObject, Prototype};
    use crate::value::TypedArray;
    use tagmem_core::{ElementKind, Primitive};
    use tagmem_pointer::{Number, U8};

    fn context() -> Context {
        Context::new(ContextConfig::with_region_bytes(64 * 1024)).unwrap()
    }

    #[test]
    fn first_record_lands_at_sixteen() {
        let mut ctx = context();
        let tagged = ctx.encode(&Value::from(42.0)).unwrap();
        assert_eq!(tagged.as_offset(), 16);
        assert_eq!(ctx.region().size(16).unwrap(), 9);
        assert_eq!(
            tagged.type_tag,
            ctx.registry().primitive(Primitive::Number).value()
        );
    }

    #[test]
    fn scalars_round_trip_through_region() {
        let mut ctx = context();
        let values = [
            Value::Undefined,
            Value::Null,
            Value::from(true),
            Value::from(0.0),
            Value::from(-129.0),
            Value::from(3.25),
            Value::from(""),
            Value::from("region"),
            Value::BigInt(-7),
            Value::Symbol(Some("id".into())),
            Value::from(TypedArray::of::<U8>(&[1, 2, 3])),
        ];
        for value in values {
            let tagged = ctx.encode(&value).unwrap();
            assert_eq!(ctx.decode(&tagged).unwrap(), value);
        }
    }

    #[test]
    fn zero_number_is_one_sentinel_byte_in_region() {
        let mut ctx = context();
        let tagged = ctx.encode(&Value::from(0.0)).unwrap();
        assert_eq!(ctx.region().size(tagged.as_offset()).unwrap(), 1);
        assert_eq!(ctx.region().get_i8(tagged.as_offset()).unwrap(), -3);
    }

    #[test]
    fn pointer_values_are_copied() {
        let mut ctx = context();
        let region = Arc::clone(ctx.region());
        let original = Number::<U8>::allocate(&region, 77).unwrap();
        let tagged = ctx.encode(&Value::from(original.erase())).unwrap();
        assert_ne!(tagged.pointer, original.pointer());
        assert_eq!(
            ctx.registry().constructor_by_tag(tagged.kind_tag).map(|d| d.name()),
            Some("Uint8Number")
        );
        let Value::Pointer(copy) = ctx.decode(&tagged).unwrap() else {
            panic!("expected a pointer");
        };
        assert_eq!(copy.kind, ElementKind::U8);
        original.write(&region, 1).unwrap();
        assert_eq!(Number::<U8>::from_typed(copy).unwrap().read(&region).unwrap(), 77);
    }

    #[test]
    fn failed_encode_allocates_nothing() {
        let mut ctx = context();
        let before = ctx.region().bump_offset();
        assert!(ctx.encode(&Value::from(1e20)).is_err());
        assert!(ctx.encode(&Value::from(TypedArray::of::<U8>(&[]))).is_err());
        assert_eq!(ctx.region().bump_offset(), before);
    }

    #[test]
    fn objects_become_sixteen_byte_records() {
        let mut ctx = context();
        let object = PlainObject::new("Map").into_ref();
        let tagged = ctx.encode(&Value::from(Arc::clone(&object))).unwrap();
        assert_eq!(ctx.region().size(tagged.as_offset()).unwrap(), 16);
        let words = Values::<U32>::from_pointer(tagged.pointer)
            .to_vec(ctx.region())
            .unwrap();
        assert_eq!(words, vec![tagged.type_tag, tagged.kind_tag, 1, 0]);
        assert_eq!(ctx.decode(&tagged).unwrap(), Value::Object(object));
    }

    #[test]
    fn same_object_same_reference() {
        let mut ctx = context();
        let object = PlainObject::new("Object").into_ref();
        let a = ctx.externalize(&object).unwrap();
        let b = ctx.externalize(&Arc::clone(&object)).unwrap();
        assert_eq!(a, b);
        assert_eq!(ctx.externs().len(), 1);

        let other = PlainObject::new("Object").into_ref();
        let c = ctx.externalize(&other).unwrap();
        assert_ne!(a.pointer(), c.pointer());
        assert_eq!(c.ref_index(), a.ref_index() + 1);
    }

    #[test]
    fn functions_carry_the_function_tag() {
        let mut ctx = context();
        let f = PlainObject::function().into_ref();
        let reference = ctx.externalize(&f).unwrap();
        assert_eq!(
            reference.type_tag(),
            ctx.registry().primitive(Primitive::Function).value()
        );
    }

    #[test]
    fn markers_follow_prototypes() {
        let mut ctx = context();
        let base = Prototype::root("Object");
        let target = Prototype::extend(&base, "EventTarget");
        let socket = PlainObject::new("WebSocket")
            .with_prototype(Prototype::extend(&target, "WebSocket"))
            .into_ref();
        let reference = ctx.externalize(&socket).unwrap();
        assert_eq!(
            ctx.marker_chain(reference.marker()),
            ["WebSocket", "EventTarget", "Object", "Externref"]
        );
    }

    #[test]
    fn extern_debug_resolves_descriptors() {
        let mut ctx = context();
        let object = PlainObject::new("Blob").into_ref();
        let reference = ctx.externalize(&object).unwrap();
        let debug = ctx.extern_debug(reference.pointer()).unwrap();
        assert_eq!(debug.type_of.unwrap().label(), "TYPEOF_OBJECT");
        assert_eq!(debug.object_of.unwrap().label(), "BLOB_OBJECT");
        assert_eq!(debug.ref_index, 1);
        assert!(Arc::ptr_eq(&debug.object, &object));
    }

    #[test]
    fn full_table_rejects_without_allocating() {
        let mut ctx = Context::new(
            ContextConfig::with_region_bytes(4096).with_extern_table_max(2),
        )
        .unwrap();
        ctx.externalize(&PlainObject::new("A").into_ref()).unwrap();
        let before = ctx.region().bump_offset();
        assert_eq!(
            ctx.externalize(&PlainObject::new("B").into_ref()),
            Err(CodecError::ExternTableFull { max: 2 })
        );
        assert_eq!(ctx.region().bump_offset(), before);
    }

    #[test]
    fn deref_rejects_non_reference_records() {
        let mut ctx = context();
        let tagged = ctx.encode(&Value::from("x")).unwrap();
        assert!(matches!(
            ctx.deref(tagged.pointer),
            Err(CodecError::MalformedRecord { .. })
        ));
        let forged = Values::<U32>::from_slice(ctx.region(), &[0, 0, 99, 0]).unwrap();
        assert_eq!(
            ctx.deref(forged.pointer()).err(),
            Some(CodecError::UnknownReference { index: 99 })
        );
    }
}
