use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::interpreter::{bridge::NativeObject, value::core::Value};

/// A script-created class instance.
///
/// Carries the class name and the named field map. Member resolution for
/// methods falls through to the registered `ClassDecl`; field order is
/// driven by the declaration, not by this map.
#[derive(Debug)]
pub struct Object {
    pub type_name: String,
    pub fields:    HashMap<String, Value>,
}

impl Object {
    /// Creates an instance with no fields set yet.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into(),
               fields:    HashMap::new(), }
    }
}

/// The referent of a non-null handle: a script object or a host native.
#[derive(Clone)]
pub enum HandleRef {
    Object(Rc<RefCell<Object>>),
    Native(Rc<dyn NativeObject>),
}

impl HandleRef {
    /// Whether two handles refer to the same underlying object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => native_ptr_eq(a, b),
            _ => false,
        }
    }

    /// The referent as a plain value.
    #[must_use]
    pub fn as_value(&self) -> Value {
        match self {
            Self::Object(obj) => Value::Object(obj.clone()),
            Self::Native(obj) => Value::Native(obj.clone()),
        }
    }
}

impl fmt::Debug for HandleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(obj) => write!(f, "Object({})", obj.borrow().type_name),
            Self::Native(obj) => write!(f, "Native({})", obj.type_name()),
        }
    }
}

/// Identity comparison for type-erased natives; compares the data address
/// so two `Rc`s to the same allocation always agree.
#[must_use]
pub fn native_ptr_eq(a: &Rc<dyn NativeObject>, b: &Rc<dyn NativeObject>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
