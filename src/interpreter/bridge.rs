use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::interpreter::value::{
    core::{NativeFunction, Value},
    object::{HandleRef, native_ptr_eq},
};

/// The signature of a host function exposed to scripts.
pub type HostFn = Rc<dyn Fn(&[HostValue]) -> HostValue>;

/// A value on the host side of the native boundary.
///
/// `wrap_native` converts host values into script values and `unwrap`
/// converts back; the two are inverse for data-carrying variants, so
/// `unwrap(&wrap_native(x)) == x` holds for null, numbers, booleans,
/// strings and arrays thereof.
#[derive(Clone)]
pub enum HostValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Array(Vec<HostValue>),
    Func(HostFn),
    Object(Rc<dyn NativeObject>),
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Int(n) => write!(f, "Int({n})"),
            Self::Float(x) => write!(f, "Float({x})"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Array(items) => write!(f, "Array({items:?})"),
            Self::Func(_) => write!(f, "Func"),
            Self::Object(obj) => write!(f, "Object({})", obj.type_name()),
        }
    }
}

/// Structural equality for data, identity for functions and objects.
impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Func(a), Self::Func(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            },
            (Self::Object(a), Self::Object(b)) => native_ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<i64> for HostValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for HostValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// A host object exposed to scripts as an opaque `Native` value.
///
/// Implementations opt into whichever capabilities they support; the
/// defaults expose nothing. Interior mutability is the implementor's
/// concern, since scripts reach the object through shared references.
pub trait NativeObject {
    /// The type name scripts see in diagnostics.
    fn type_name(&self) -> &str {
        "native"
    }

    /// Reads a named property.
    fn get_property(&self, _name: &str) -> Option<HostValue> {
        None
    }

    /// Writes a named property; returns whether the property was accepted.
    fn set_property(&self, _name: &str, _value: HostValue) -> bool {
        false
    }

    /// Whether a method of this name exists.
    fn has_method(&self, _name: &str) -> bool {
        false
    }

    /// Invokes a method with the object itself as receiver.
    fn call(&self, _method: &str, _args: &[HostValue]) -> Option<HostValue> {
        None
    }

    /// Reads an indexed element.
    fn get_index(&self, _index: usize) -> Option<HostValue> {
        None
    }

    /// Writes an indexed element; returns whether the index was accepted.
    fn set_index(&self, _index: usize, _value: HostValue) -> bool {
        false
    }
}

/// Converts a host value into a script value.
///
/// Numbers, booleans and strings map to their scalar variants (integers
/// keep the engine's 32-bit truncation rule), arrays wrap element-wise,
/// functions become native functions that marshal arguments and results,
/// and everything else stays an opaque `Native`.
#[must_use]
pub fn wrap_native(value: HostValue) -> Value {
    match value {
        HostValue::Null => Value::Null,
        HostValue::Int(n) => Value::int(n),
        HostValue::Float(x) => Value::Float(x),
        HostValue::Bool(b) => Value::Bool(b),
        HostValue::Str(s) => Value::String(s),
        HostValue::Array(items) => Value::array(items.into_iter().map(wrap_native).collect()),
        HostValue::Func(func) => {
            Value::NativeFunction(Rc::new(NativeFunction {
                name: "native".to_owned(),
                func: Box::new(move |_, args| {
                    let host_args: Vec<HostValue> = args.iter().map(unwrap).collect();
                    Ok(wrap_native(func(&host_args)))
                }),
            }))
        },
        HostValue::Object(obj) => Value::Native(obj),
    }
}

/// Converts a script value back into a host value.
///
/// Handles unwrap to their referent's host form, or null when the handle
/// is null. Script objects and function values have no host form and
/// unwrap to null.
#[must_use]
pub fn unwrap(value: &Value) -> HostValue {
    match value {
        Value::Int(n) => HostValue::Int(*n),
        Value::Float(x) => HostValue::Float(*x),
        Value::Bool(b) => HostValue::Bool(*b),
        Value::String(s) => HostValue::Str(s.clone()),
        Value::Null | Value::Void => HostValue::Null,
        Value::Array(elements) => {
            HostValue::Array(elements.borrow().iter().map(unwrap).collect())
        },
        Value::Native(obj) => HostValue::Object(obj.clone()),
        Value::Handle(Some(HandleRef::Native(obj))) => HostValue::Object(obj.clone()),
        Value::Handle(_) | Value::Object(_) | Value::Function(_) | Value::NativeFunction(_) => {
            HostValue::Null
        },
    }
}

/// A method of a [`NativeRecord`], invoked with the record as receiver.
pub type RecordMethod = Rc<dyn Fn(&NativeRecord, &[HostValue]) -> HostValue>;

/// A ready-made [`NativeObject`] with named properties and methods.
///
/// Convenient for hosts that want to expose a bag of state and behavior
/// without writing a trait implementation:
///
/// ```
/// use seraph::{HostValue, NativeRecord};
///
/// let counter = NativeRecord::new("Counter")
///     .with_property("count", HostValue::Int(0))
///     .with_method("bump", |record, _args| {
///         let next = match record.property("count") {
///             Some(HostValue::Int(n)) => n + 1,
///             _ => 1,
///         };
///         record.set("count", HostValue::Int(next));
///         HostValue::Int(next)
///     });
/// ```
pub struct NativeRecord {
    type_name:  String,
    properties: RefCell<HashMap<String, HostValue>>,
    methods:    HashMap<String, RecordMethod>,
}

impl NativeRecord {
    /// Creates an empty record with the given type name.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name:  type_name.into(),
               properties: RefCell::new(HashMap::new()),
               methods:    HashMap::new(), }
    }

    /// Adds a property, builder-style.
    #[must_use]
    pub fn with_property(self, name: impl Into<String>, value: HostValue) -> Self {
        self.properties.borrow_mut().insert(name.into(), value);
        self
    }

    /// Adds a method, builder-style.
    #[must_use]
    pub fn with_method(mut self,
                       name: impl Into<String>,
                       method: impl Fn(&NativeRecord, &[HostValue]) -> HostValue + 'static)
                       -> Self {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    /// Reads a property from inside a method body.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<HostValue> {
        self.properties.borrow().get(name).cloned()
    }

    /// Writes a property from inside a method body.
    pub fn set(&self, name: impl Into<String>, value: HostValue) {
        self.properties.borrow_mut().insert(name.into(), value);
    }
}

impl NativeObject for NativeRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get_property(&self, name: &str) -> Option<HostValue> {
        self.properties.borrow().get(name).cloned()
    }

    fn set_property(&self, name: &str, value: HostValue) -> bool {
        self.properties.borrow_mut().insert(name.to_owned(), value);
        true
    }

    fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    fn call(&self, method: &str, args: &[HostValue]) -> Option<HostValue> {
        let method = self.methods.get(method)?.clone();
        Some(method(self, args))
    }
}
