//! Host object fixtures and value samples.
//!
//! - [`Hierarchy`]: prototype chains shaped like a browser's.
//! - [`Handle`]: a host object with a payload, for downcasts.
//! - [`sample_values`]: one value of every record-encoded kind.

use std::sync::Arc;

use tagmem_codec::{HostObject, ObjectRef, PlainObject, Prototype, TypedArray, Value};
use tagmem_pointer::{F64, U8};

/// Prototype links shaped like a browser object hierarchy.
pub struct Hierarchy {
    pub object: Arc<Prototype>,
    pub event_target: Arc<Prototype>,
    pub web_socket: Arc<Prototype>,
    pub worker: Arc<Prototype>,
    pub map: Arc<Prototype>,
}

impl Hierarchy {
    pub fn new() -> Self {
        let object = Prototype::root("Object");
        let event_target = Prototype::extend(&object, "EventTarget");
        let web_socket = Prototype::extend(&event_target, "WebSocket");
        let worker = Prototype::extend(&event_target, "Worker");
        let map = Prototype::extend(&object, "Map");
        Self {
            object,
            event_target,
            web_socket,
            worker,
            map,
        }
    }

    /// A fresh object whose immediate prototype is `prototype`.
    pub fn instance(&self, constructor: &str, prototype: &Arc<Prototype>) -> ObjectRef {
        PlainObject::new(constructor)
            .with_prototype(Arc::clone(prototype))
            .into_ref()
    }

    pub fn socket(&self) -> ObjectRef {
        self.instance("WebSocket", &self.web_socket)
    }

    pub fn worker(&self) -> ObjectRef {
        self.instance("Worker", &self.worker)
    }

    pub fn map(&self) -> ObjectRef {
        self.instance("Map", &self.map)
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

/// Host object that carries a payload, for downcast tests.
#[derive(Debug)]
pub struct Handle {
    pub id: u64,
    pub prototype: Option<Arc<Prototype>>,
}

impl Handle {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            prototype: None,
        }
    }

    pub fn into_ref(self) -> ObjectRef {
        Arc::new(self)
    }
}

impl HostObject for Handle {
    fn constructor_name(&self) -> &str {
        "Handle"
    }

    fn prototype(&self) -> Option<&Arc<Prototype>> {
        self.prototype.as_ref()
    }
}

/// One value of every kind that encodes to a record, empties included.
pub fn sample_values() -> Vec<Value> {
    vec![
        Value::Undefined,
        Value::Null,
        Value::Boolean(true),
        Value::Boolean(false),
        Value::Number(0.0),
        Value::Number(255.0),
        Value::Number(256.0),
        Value::Number(-129.0),
        Value::Number(0.75),
        Value::Number(std::f64::consts::PI),
        Value::String(String::new()),
        Value::String("tagged".into()),
        Value::String("\u{1F600} wide".into()),
        Value::BigInt(0),
        Value::BigInt(-42),
        Value::BigInt(i128::from(u64::MAX)),
        Value::Symbol(Some("marker".into())),
        Value::View(TypedArray::of::<U8>(&[1, 2, 3])),
        Value::View(TypedArray::of::<F64>(&[0.5, -2.0])),
    ]
}
