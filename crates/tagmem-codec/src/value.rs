//! Runtime values the codec accepts and produces.

use std::borrow::Cow;
use std::sync::Arc;

use tagmem_core::{ElementKind, Primitive};
use tagmem_pointer::{Element, TypedPointer};

use crate::host::{HostObject, ObjectRef};

/// A typed-array view: element kind plus its raw little-endian bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypedArray {
    kind: ElementKind,
    bytes: Vec<u8>,
}

impl TypedArray {
    /// Build a view from native values.
    pub fn of<K: Element>(values: &[K::Native]) -> Self {
        let mut bytes = Vec::with_capacity(values.len() * K::BYTES_PER_ELEMENT as usize);
        for &v in values {
            K::put_le(v, &mut bytes);
        }
        Self {
            kind: K::KIND,
            bytes,
        }
    }

    /// Build a view from raw bytes. Fails unless the length is a whole
    /// number of elements.
    pub fn from_bytes(kind: ElementKind, bytes: Vec<u8>) -> Option<Self> {
        (bytes.len() % kind.bytes_per_element() as usize == 0).then_some(Self { kind, bytes })
    }

    /// Element kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.kind.bytes_per_element() as usize
    }

    /// Whether the view has no elements.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw element bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the elements as `K`, if `K` is this view's kind.
    pub fn to_values<K: Element>(&self) -> Option<Vec<K::Native>> {
        if K::KIND != self.kind {
            return None;
        }
        self.bytes
            .chunks_exact(K::BYTES_PER_ELEMENT as usize)
            .map(K::from_le)
            .collect()
    }
}

/// A dynamically typed runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// The absent value.
    Undefined,
    /// The null object.
    Null,
    /// A boolean.
    Boolean(bool),
    /// A double.
    Number(f64),
    /// Text.
    String(String),
    /// An integer of arbitrary size. Only the 64-bit range encodes.
    BigInt(i128),
    /// A symbol and its optional description.
    Symbol(Option<String>),
    /// A typed-array view.
    View(TypedArray),
    /// A pointer handle into the region.
    Pointer(TypedPointer),
    /// A host object.
    Object(ObjectRef),
}

impl Value {
    /// Primitive kind and constructor name of the value.
    ///
    /// `undefined` and `null` report the `Object` constructor. Views,
    /// pointers and host objects classify as objects (or functions, when
    /// callable).
    pub fn classify(&self) -> (Primitive, Cow<'_, str>) {
        match self {
            Self::Undefined => (Primitive::Undefined, Cow::Borrowed("Object")),
            Self::Null => (Primitive::Object, Cow::Borrowed("Object")),
            Self::Boolean(_) => (Primitive::Boolean, Cow::Borrowed("Boolean")),
            Self::Number(_) => (Primitive::Number, Cow::Borrowed("Number")),
            Self::String(_) => (Primitive::String, Cow::Borrowed("String")),
            Self::BigInt(_) => (Primitive::BigInt, Cow::Borrowed("BigInt")),
            Self::Symbol(_) => (Primitive::Symbol, Cow::Borrowed("Symbol")),
            Self::View(view) => (Primitive::Object, Cow::Borrowed(view.kind.labels().array)),
            Self::Pointer(pointer) => (Primitive::Object, Cow::Owned(pointer.constructor_name())),
            Self::Object(object) => (
                object_primitive(&**object),
                Cow::Borrowed(object.constructor_name()),
            ),
        }
    }

    /// Whether encoding this value produces an external reference.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Object(_))
    }
}

/// `Function` for callable objects, `Object` otherwise.
pub(crate) fn object_primitive(object: &dyn HostObject) -> Primitive {
    if object.is_callable() {
        Primitive::Function
    } else {
        Primitive::Object
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::View(a), Self::View(b)) => a == b,
            (Self::Pointer(a), Self::Pointer(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<TypedArray> for Value {
    fn from(v: TypedArray) -> Self {
        Self::View(v)
    }
}

impl From<TypedPointer> for Value {
    fn from(v: TypedPointer) -> Self {
        Self::Pointer(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Self::Object(v)
    }
}
