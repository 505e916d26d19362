use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    ast::FuncDecl,
    interpreter::{
        bridge::NativeObject,
        evaluator::core::{Engine, EvalResult},
        value::object::{HandleRef, Object, native_ptr_eq},
    },
    util::num::to_int32,
};

/// The signature of a native callable stored in a value.
pub type NativeFn = Box<dyn Fn(&Engine, &[Value]) -> EvalResult<Value>>;

/// A host- or engine-provided function exposed to scripts.
pub struct NativeFunction {
    pub name: String,
    pub func: NativeFn,
}

/// A scripted function value, optionally bound to a method receiver.
pub struct ScriptFunction {
    pub name:     String,
    pub decl:     Rc<FuncDecl>,
    /// The bound `this` for method values; objects get their fields
    /// snapshotted into the call frame.
    pub this_val: Option<Value>,
}

/// Represents a runtime value in the interpreter.
///
/// Scalars carry their data; objects, natives and arrays are shared by
/// reference, so copying a value copies the reference and identity
/// survives. A handle is a nullable reference to an object or native.
#[derive(Clone)]
pub enum Value {
    /// An integer with 32-bit two's-complement semantics.
    Int(i64),
    /// A double-precision float.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// An immutable string.
    String(String),
    /// The null value.
    Null,
    /// The absence of a value, produced by functions that do not return.
    Void,
    /// A script-created class instance, identity-bearing.
    Object(Rc<RefCell<Object>>),
    /// A host-provided opaque object.
    Native(Rc<dyn NativeObject>),
    /// A nullable reference to an object or native.
    Handle(Option<HandleRef>),
    /// An ordered sequence of values.
    Array(Rc<RefCell<Vec<Value>>>),
    /// A scripted function, possibly bound to a receiver.
    Function(Rc<ScriptFunction>),
    /// A native function.
    NativeFunction(Rc<NativeFunction>),
}

impl Value {
    /// Builds an integer value, truncating to 32-bit range.
    ///
    /// # Example
    /// ```
    /// use seraph::Value;
    ///
    /// assert_eq!(Value::int(7), Value::Int(7));
    /// assert_eq!(Value::int(2_147_483_648), Value::Int(-2_147_483_648));
    /// ```
    #[must_use]
    pub const fn int(value: i64) -> Self {
        Self::Int(to_int32(value))
    }

    /// Builds a fresh array value from its elements.
    #[must_use]
    pub fn array(elements: Vec<Self>) -> Self {
        Self::Array(Rc::new(RefCell::new(elements)))
    }

    /// The boolean projection used by conditions.
    ///
    /// Numbers are truthy when non-zero, strings when non-empty, handles
    /// when non-null; `null` and `void` are false; aggregates and
    /// functions are always truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(x) => *x != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::Null | Self::Void => false,
            Self::Handle(target) => target.is_some(),
            Self::Object(_)
            | Self::Native(_)
            | Self::Array(_)
            | Self::Function(_)
            | Self::NativeFunction(_) => true,
        }
    }

    /// The numeric projection used by arithmetic and comparisons.
    ///
    /// Booleans convert to 0/1 and strings parse leniently; everything
    /// else reads as zero.
    #[must_use]
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Int(n) => *n as f64,
            Self::Float(x) => *x,
            Self::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            },
            Self::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// A short description of the value's type, for error messages.
    #[must_use]
    pub fn type_label(&self) -> String {
        match self {
            Self::Int(_) => "int".to_owned(),
            Self::Float(_) => "float".to_owned(),
            Self::Bool(_) => "bool".to_owned(),
            Self::String(_) => "string".to_owned(),
            Self::Null => "null".to_owned(),
            Self::Void => "void".to_owned(),
            Self::Object(obj) => obj.borrow().type_name.clone(),
            Self::Native(obj) => obj.type_name().to_owned(),
            Self::Handle(_) => "handle".to_owned(),
            Self::Array(_) => "array".to_owned(),
            Self::Function(_) | Self::NativeFunction(_) => "function".to_owned(),
        }
    }

    /// The language's equality relation.
    ///
    /// Numbers compare numerically with cross-kind promotion, strings and
    /// booleans by value, objects, natives and arrays by identity. A
    /// handle compares by referent identity, and a null handle equals
    /// `null`.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => *a as f64 == *b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Null, Self::Null) | (Self::Void, Self::Void) => true,
            (Self::Null, Self::Handle(None)) | (Self::Handle(None), Self::Null) => true,
            (Self::Handle(a), Self::Handle(b)) => match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a.ptr_eq(b),
                _ => false,
            },
            (Self::Handle(Some(HandleRef::Object(a))), Self::Object(b))
            | (Self::Object(b), Self::Handle(Some(HandleRef::Object(a)))) => Rc::ptr_eq(a, b),
            (Self::Handle(Some(HandleRef::Native(a))), Self::Native(b))
            | (Self::Native(b), Self::Handle(Some(HandleRef::Native(a)))) => native_ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => native_ptr_eq(a, b),
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::NativeFunction(a), Self::NativeFunction(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Strict structural/identity equality, mainly for host-side assertions.
/// The language's own `==` lives in [`Value::equals`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Null, Self::Null) | (Self::Void, Self::Void) => true,
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => native_ptr_eq(a, b),
            (Self::Array(a), Self::Array(b)) => Rc::ptr_eq(a, b),
            (Self::Handle(None), Self::Handle(None)) => true,
            (Self::Handle(Some(a)), Self::Handle(Some(b))) => a.ptr_eq(b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::NativeFunction(a), Self::NativeFunction(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
            Self::Void => Ok(()),
            Self::Object(obj) => write!(f, "[{}]", obj.borrow().type_name),
            Self::Native(obj) => write!(f, "[{}]", obj.type_name()),
            Self::Handle(None) => write!(f, "null"),
            Self::Handle(Some(target)) => write!(f, "{}", target.as_value()),
            Self::Array(elements) => {
                write!(f, "[")?;
                for (index, value) in elements.borrow().iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            },
            Self::Function(func) => write!(f, "function {}", func.name),
            Self::NativeFunction(func) => write!(f, "function {}", func.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "Int({n})"),
            Self::Float(x) => write!(f, "Float({x})"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Null => write!(f, "Null"),
            Self::Void => write!(f, "Void"),
            Self::Object(obj) => write!(f, "Object({})", obj.borrow().type_name),
            Self::Native(obj) => write!(f, "Native({})", obj.type_name()),
            Self::Handle(None) => write!(f, "Handle(null)"),
            Self::Handle(Some(target)) => write!(f, "Handle({:?})", target.as_value()),
            Self::Array(elements) => write!(f, "Array(len {})", elements.borrow().len()),
            Self::Function(func) => write!(f, "Function({})", func.name),
            Self::NativeFunction(func) => write!(f, "NativeFunction({})", func.name),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
