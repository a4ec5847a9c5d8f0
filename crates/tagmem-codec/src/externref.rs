//! External references: 16-byte stand-ins for host objects.
//!
//! A host object cannot live in the region, so encoding one stores the
//! object in an [`ExternTable`] and writes a record
//! `[type tag, kind tag, table index, 0]` in its place. Each reference
//! also carries a [`MarkerId`], a mirror of the object's prototype chain
//! built from [`MarkerChains`]: one marker per distinct prototype, each
//! extending its parent's marker, with the root extending marker 0
//! (`Externref`).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tagmem_pointer::{Pointer, Values, U32};

use crate::error::CodecError;
use crate::host::{ObjectRef, Prototype};

/// Index of a marker in [`MarkerChains`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u32);

impl MarkerId {
    /// The base every chain extends.
    pub const EXTERNREF: Self = Self(0);
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of marker 0.
pub const EXTERNREF_NAME: &str = "Externref";

#[derive(Debug)]
struct Marker {
    name: String,
    parent: Option<MarkerId>,
}

/// Arena of markers keyed by prototype identity.
#[derive(Debug)]
pub struct MarkerChains {
    markers: Vec<Marker>,
    // Keyed by `Arc` address; the stored `Arc` keeps the address from
    // being reused.
    by_prototype: IndexMap<usize, (Arc<Prototype>, MarkerId)>,
}

impl MarkerChains {
    /// An arena holding only the `Externref` base.
    pub fn new() -> Self {
        Self {
            markers: vec![Marker {
                name: EXTERNREF_NAME.to_owned(),
                parent: None,
            }],
            by_prototype: IndexMap::new(),
        }
    }

    /// Marker for the leaf of `prototype`'s chain, creating markers for
    /// any link not seen before. No prototype maps to the base.
    pub fn marker_for(&mut self, prototype: Option<&Arc<Prototype>>) -> MarkerId {
        let Some(prototype) = prototype else {
            return MarkerId::EXTERNREF;
        };
        let mut parent = MarkerId::EXTERNREF;
        for link in Prototype::chain(prototype) {
            parent = self.intern(link, parent);
        }
        parent
    }

    fn intern(&mut self, link: Arc<Prototype>, parent: MarkerId) -> MarkerId {
        let key = Arc::as_ptr(&link) as usize;
        if let Some((_, id)) = self.by_prototype.get(&key) {
            return *id;
        }
        let id = MarkerId(self.markers.len() as u32);
        self.markers.push(Marker {
            name: link.name().to_owned(),
            parent: Some(parent),
        });
        self.by_prototype.insert(key, (link, id));
        id
    }

    /// Display name of a marker.
    pub fn name(&self, id: MarkerId) -> Option<&str> {
        self.markers.get(id.0 as usize).map(|m| m.name.as_str())
    }

    /// The marker a marker extends; `None` for the base.
    pub fn parent(&self, id: MarkerId) -> Option<MarkerId> {
        self.markers.get(id.0 as usize).and_then(|m| m.parent)
    }

    /// Names from `id` up to and including the base. Empty for an
    /// unknown id.
    pub fn chain(&self, id: MarkerId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut cursor = self.markers.get(id.0 as usize).map(|_| id);
        while let Some(current) = cursor {
            let marker = &self.markers[current.0 as usize];
            names.push(marker.name.as_str());
            cursor = marker.parent;
        }
        names
    }

    /// Number of markers, the base included.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Always `false`: the base marker is never removed.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl Default for MarkerChains {
    fn default() -> Self {
        Self::new()
    }
}

/// Default slot limit of an [`ExternTable`], null slot included.
pub const DEFAULT_TABLE_MAX: u32 = 65_536;

/// Append-only table of host objects.
///
/// Slot 0 is the null reference and is never handed out, so the first
/// object lands at index 1.
#[derive(Debug)]
pub struct ExternTable {
    objects: Vec<ObjectRef>,
    max: u32,
}

impl ExternTable {
    /// A table of at most `max` slots, the null slot included.
    pub fn new(max: u32) -> Self {
        Self {
            objects: Vec::new(),
            max,
        }
    }

    /// Index the next [`push`](Self::push) would return, if there is room.
    pub fn next_index(&self) -> Option<u32> {
        let next = self.objects.len() as u32 + 1;
        (next < self.max).then_some(next)
    }

    /// Append an object and return its index.
    pub fn push(&mut self, object: ObjectRef) -> Result<u32, CodecError> {
        let index = self
            .next_index()
            .ok_or(CodecError::ExternTableFull { max: self.max })?;
        self.objects.push(object);
        Ok(index)
    }

    /// The object at `index`.
    pub fn get(&self, index: u32) -> Option<&ObjectRef> {
        let slot = index.checked_sub(1)?;
        self.objects.get(slot as usize)
    }

    /// Number of objects stored.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no object has been stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Slot limit, null slot included.
    pub fn max(&self) -> u32 {
        self.max
    }
}

/// Handle to an external reference record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExternRef {
    values: Values<U32>,
    marker: MarkerId,
    type_tag: u32,
    kind_tag: u32,
    ref_index: u32,
}

impl ExternRef {
    /// Number of `u32` words in a record.
    pub const WORDS: usize = 4;

    pub(crate) fn new(
        values: Values<U32>,
        marker: MarkerId,
        type_tag: u32,
        kind_tag: u32,
        ref_index: u32,
    ) -> Self {
        Self {
            values,
            marker,
            type_tag,
            kind_tag,
            ref_index,
        }
    }

    /// The record's words as they are laid out in the region.
    pub fn words(type_tag: u32, kind_tag: u32, ref_index: u32) -> [u32; Self::WORDS] {
        [type_tag, kind_tag, ref_index, 0]
    }

    /// Pointer to the 16-byte record.
    pub fn pointer(&self) -> Pointer {
        self.values.pointer()
    }

    /// The record as a `u32` array handle.
    pub fn values(&self) -> Values<U32> {
        self.values
    }

    /// Primitive tag of the referenced object.
    pub fn type_tag(&self) -> u32 {
        self.type_tag
    }

    /// Constructor tag of the referenced object.
    pub fn kind_tag(&self) -> u32 {
        self.kind_tag
    }

    /// Index of the object in the table.
    pub fn ref_index(&self) -> u32 {
        self.ref_index
    }

    /// Leaf marker of the object's prototype chain.
    pub fn marker(&self) -> MarkerId {
        self.marker
    }
}
