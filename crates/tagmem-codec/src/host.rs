//! Host objects: values that live outside the region.
//!
//! The codec never looks inside a host object. It needs three facts:
//! the constructor name (for the kind tag), whether it is callable (for
//! the primitive tag), and its prototype chain (for the marker chain).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

/// Prototype chains this short or shorter stay on the stack.
pub const INLINE_CHAIN: usize = 8;

/// A prototype chain, root first.
pub type Chain = SmallVec<[Arc<Prototype>; INLINE_CHAIN]>;

/// One link of a prototype chain.
///
/// Identity is the `Arc` allocation, not the name: two prototypes with
/// the same name are still distinct links.
#[derive(Debug)]
pub struct Prototype {
    name: String,
    parent: Option<Arc<Prototype>>,
}

impl Prototype {
    /// A prototype with no parent.
    pub fn root(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            parent: None,
        })
    }

    /// A prototype inheriting from `parent`.
    pub fn extend(parent: &Arc<Self>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            parent: Some(Arc::clone(parent)),
        })
    }

    /// Display name of this link.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent link, if any.
    pub fn parent(&self) -> Option<&Arc<Prototype>> {
        self.parent.as_ref()
    }

    /// Every link from the root down to `this`, inclusive.
    pub fn chain(this: &Arc<Self>) -> Chain {
        let mut chain = Chain::new();
        let mut link = Some(this);
        while let Some(proto) = link {
            chain.push(Arc::clone(proto));
            link = proto.parent();
        }
        chain.reverse();
        chain
    }
}

/// An object owned by the host.
pub trait HostObject: Any + fmt::Debug + Send + Sync {
    /// Name of the object's constructor, e.g. `"Map"`.
    fn constructor_name(&self) -> &str;

    /// The object's immediate prototype.
    fn prototype(&self) -> Option<&Arc<Prototype>> {
        None
    }

    /// Whether the object can be called.
    fn is_callable(&self) -> bool {
        false
    }
}

/// Shared handle to a host object.
pub type ObjectRef = Arc<dyn HostObject>;

/// Borrow a host object as its concrete type.
pub fn downcast_ref<T: HostObject>(object: &ObjectRef) -> Option<&T> {
    let object: &dyn HostObject = &**object;
    let any: &dyn Any = object;
    any.downcast_ref::<T>()
}

/// Identity key of a host object: the address of its allocation.
pub(crate) fn identity(object: &ObjectRef) -> usize {
    Arc::as_ptr(object) as *const () as usize
}

/// A general-purpose host object carrying only what the codec reads.
#[derive(Debug, Clone)]
pub struct PlainObject {
    constructor: String,
    prototype: Option<Arc<Prototype>>,
    callable: bool,
}

impl PlainObject {
    /// A non-callable object built by `constructor`.
    pub fn new(constructor: impl Into<String>) -> Self {
        Self {
            constructor: constructor.into(),
            prototype: None,
            callable: false,
        }
    }

    /// A callable object built by `Function`.
    pub fn function() -> Self {
        Self {
            constructor: "Function".to_owned(),
            prototype: None,
            callable: true,
        }
    }

    /// Set the immediate prototype.
    pub fn with_prototype(mut self, prototype: Arc<Prototype>) -> Self {
        self.prototype = Some(prototype);
        self
    }

    /// Wrap into a shared handle.
    pub fn into_ref(self) -> ObjectRef {
        Arc::new(self)
    }
}

impl HostObject for PlainObject {
    fn constructor_name(&self) -> &str {
        &self.constructor
    }

    fn prototype(&self) -> Option<&Arc<Prototype>> {
        self.prototype.as_ref()
    }

    fn is_callable(&self) -> bool {
        self.callable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_is_root_first() {
        let object = Prototype::root("Object");
        let event_target = Prototype::extend(&object, "EventTarget");
        let socket = Prototype::extend(&event_target, "WebSocket");
        let names: Vec<_> = Prototype::chain(&socket)
            .iter()
            .map(|p| p.name().to_owned())
            .collect();
        assert_eq!(names, ["Object", "EventTarget", "WebSocket"]);
    }

    #[test]
    fn downcast_recovers_concrete_type() {
        let object = PlainObject::new("Map").into_ref();
        let plain = downcast_ref::<PlainObject>(&object).unwrap();
        assert_eq!(plain.constructor_name(), "Map");
    }

    #[test]
    fn identity_follows_allocation() {
        let a = PlainObject::new("Object").into_ref();
        let b = PlainObject::new("Object").into_ref();
        assert_eq!(identity(&a), identity(&Arc::clone(&a)));
        assert_ne!(identity(&a), identity(&b));
    }
}
