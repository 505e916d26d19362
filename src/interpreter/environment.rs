use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::core::Value;

/// A lexical scope: a named binding map linked to its parent scope.
///
/// Function frames parent directly to the global environment, so closures
/// over enclosing non-global scopes do not exist in this language.
pub struct Environment {
    parent:   Option<Rc<Environment>>,
    bindings: RefCell<HashMap<String, Value>>,
}

impl Environment {
    /// Creates a root scope.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self { parent:   None,
                       bindings: RefCell::new(HashMap::new()), })
    }

    /// Creates a scope nested under this one.
    #[must_use]
    pub fn child(self: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self { parent:   Some(self.clone()),
                       bindings: RefCell::new(HashMap::new()), })
    }

    /// Creates `name` in this scope, shadowing any outer binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Reads `name`, walking up the scope chain.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.bindings.borrow().get(name) {
            Some(value) => Some(value.clone()),
            None => self.parent.as_ref().and_then(|parent| parent.get(name)),
        }
    }

    /// Whether `name` is defined in this scope or any ancestor.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
        || self.parent.as_ref().is_some_and(|parent| parent.has(name))
    }

    /// Writes `name` in the nearest scope that defines it; if no scope
    /// does, defines it in this scope.
    pub fn set(&self, name: &str, value: Value) {
        if !self.try_set(name, &value) {
            self.define(name, value);
        }
    }

    fn try_set(&self, name: &str, value: &Value) -> bool {
        {
            let mut bindings = self.bindings.borrow_mut();
            if let Some(slot) = bindings.get_mut(name) {
                *slot = value.clone();
                return true;
            }
        }
        self.parent.as_ref().is_some_and(|parent| parent.try_set(name, value))
    }
}
