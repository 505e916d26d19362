use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        bridge::{HostValue, unwrap, wrap_native},
        environment::Environment,
        evaluator::core::{Engine, EvalResult},
        value::core::{NativeFn, NativeFunction, ScriptFunction, Value},
    },
    util::num::f64_trunc,
};

impl Engine {
    /// Resolves `object.member`, including the `Enum::Member` form, which
    /// the parser encodes as member access on the enum's name.
    pub(crate) fn eval_member_expr(&self,
                                   object: &Expr,
                                   member: &str,
                                   line: usize,
                                   env: &Rc<Environment>)
                                   -> EvalResult<Value> {
        if let Expr::Identifier { name, .. } = object
           && let Some(members) = self.enums.borrow().get(name)
        {
            return members.get(member)
                          .map(|value| Value::int(*value))
                          .ok_or_else(|| RuntimeError::UnknownEnumMember {
                              name: name.clone(),
                              member: member.to_owned(),
                              line,
                          });
        }
        let value = self.eval_expr(object, env)?;
        self.get_member(&value, member, line)
    }

    /// Whether an expression names a registered enum.
    pub(crate) fn is_enum_scope(&self, object: &Expr) -> bool {
        matches!(object, Expr::Identifier { name, .. } if self.enums.borrow().contains_key(name))
    }

    /// Resolves a member on a value.
    ///
    /// Handles dereference first (a null handle is an error). Objects
    /// resolve fields, then class methods bound to the receiver. Arrays
    /// and strings synthesize their built-in methods. Natives resolve
    /// properties, then methods bridged through the host boundary.
    pub(crate) fn get_member(&self,
                             value: &Value,
                             member: &str,
                             line: usize)
                             -> EvalResult<Value> {
        match value {
            Value::Handle(None) => Err(RuntimeError::NullHandle { line }),
            Value::Handle(Some(target)) => self.get_member(&target.as_value(), member, line),
            Value::Object(obj) => {
                if let Some(field) = obj.borrow().fields.get(member) {
                    return Ok(field.clone());
                }
                let class = self.classes.borrow().get(&obj.borrow().type_name).cloned();
                if let Some(class) = class
                   && let Some(method) = class.method(member)
                {
                    return Ok(Value::Function(Rc::new(ScriptFunction {
                        name:     method.name.clone(),
                        decl:     method.clone(),
                        this_val: Some(Value::Object(obj.clone())),
                    })));
                }
                Err(RuntimeError::UnknownMember { type_name: obj.borrow().type_name.clone(),
                                                  member:    member.to_owned(),
                                                  line })
            },
            Value::Array(elements) => array_method(elements, member, line),
            Value::String(text) => string_method(text, member, line),
            Value::Native(obj) => {
                if let Some(property) = obj.get_property(member) {
                    return Ok(wrap_native(property));
                }
                if obj.has_method(member) {
                    let receiver = obj.clone();
                    let method_name = member.to_owned();
                    let func: NativeFn = Box::new(move |_, args| {
                        let host_args: Vec<HostValue> = args.iter().map(unwrap).collect();
                        receiver.call(&method_name, &host_args)
                                .map(wrap_native)
                                .ok_or_else(|| RuntimeError::UnknownMember {
                                    type_name: receiver.type_name().to_owned(),
                                    member: method_name.clone(),
                                    line,
                                })
                    });
                    return Ok(Value::NativeFunction(Rc::new(NativeFunction {
                        name: member.to_owned(),
                        func,
                    })));
                }
                Err(RuntimeError::UnknownMember { type_name: obj.type_name().to_owned(),
                                                  member:    member.to_owned(),
                                                  line })
            },
            other => Err(RuntimeError::UnknownMember { type_name: other.type_label(),
                                                       member:    member.to_owned(),
                                                       line }),
        }
    }

    /// Invokes a method on a receiver: dereference handles, resolve the
    /// member, call it. Object receivers are bound as `this` during
    /// member resolution.
    pub(crate) fn call_method(&self,
                              receiver: &Value,
                              method: &str,
                              args: &[Value],
                              line: usize)
                              -> EvalResult<Value> {
        match receiver {
            Value::Handle(None) => Err(RuntimeError::NullHandle { line }),
            Value::Handle(Some(target)) => {
                self.call_method(&target.as_value(), method, args, line)
            },
            _ => {
                let member = self.get_member(receiver, method, line)?;
                self.call_value(&member, args, line)
            },
        }
    }
}

/// Synthesizes one of the array built-ins as a native function sharing the
/// array's storage.
fn array_method(elements: &Rc<RefCell<Vec<Value>>>,
                member: &str,
                line: usize)
                -> EvalResult<Value> {
    let elements = elements.clone();
    let func: NativeFn = match member {
        "size" | "length" => {
            Box::new(move |_, _| Ok(Value::int(elements.borrow().len() as i64)))
        },
        "empty" => Box::new(move |_, _| Ok(Value::Bool(elements.borrow().is_empty()))),
        "push" | "insertLast" => Box::new(move |_, args| {
            elements.borrow_mut().push(args.first().cloned().unwrap_or(Value::Null));
            Ok(Value::Void)
        }),
        "pop" | "removeLast" => {
            Box::new(move |_, _| Ok(elements.borrow_mut().pop().unwrap_or(Value::Void)))
        },
        "resize" => Box::new(move |_, args| {
            let len = f64_trunc(args.first().map_or(0.0, Value::as_number)).max(0) as usize;
            elements.borrow_mut().resize(len, Value::Int(0));
            Ok(Value::Void)
        }),
        "reserve" => Box::new(move |_, _| Ok(Value::Void)),
        "insertAt" => Box::new(move |_, args| {
            let index = f64_trunc(args.first().map_or(0.0, Value::as_number));
            let value = args.get(1).cloned().unwrap_or(Value::Null);
            let mut elements = elements.borrow_mut();
            if index < 0 || index as usize > elements.len() {
                return Err(RuntimeError::IndexOutOfBounds { index,
                                                            len: elements.len(),
                                                            line });
            }
            elements.insert(index as usize, value);
            Ok(Value::Void)
        }),
        "removeAt" => Box::new(move |_, args| {
            let index = f64_trunc(args.first().map_or(0.0, Value::as_number));
            let mut elements = elements.borrow_mut();
            if index < 0 || index as usize >= elements.len() {
                return Err(RuntimeError::IndexOutOfBounds { index,
                                                            len: elements.len(),
                                                            line });
            }
            elements.remove(index as usize);
            Ok(Value::Void)
        }),
        "find" => Box::new(move |_, args| {
            let needle = args.first().cloned().unwrap_or(Value::Null);
            let found = elements.borrow().iter().position(|value| value.equals(&needle));
            Ok(Value::int(found.map_or(-1, |index| index as i64)))
        }),
        _ => {
            return Err(RuntimeError::UnknownMember { type_name: "array".to_owned(),
                                                     member:    member.to_owned(),
                                                     line });
        },
    };
    Ok(Value::NativeFunction(Rc::new(NativeFunction { name: member.to_owned(),
                                                      func })))
}

/// Synthesizes one of the string built-ins over a snapshot of the text.
fn string_method(text: &str, member: &str, line: usize) -> EvalResult<Value> {
    let text = text.to_owned();
    let func: NativeFn = match member {
        "len" | "length" => Box::new(move |_, _| Ok(Value::int(text.chars().count() as i64))),
        "empty" => Box::new(move |_, _| Ok(Value::Bool(text.is_empty()))),
        "toInt" => Box::new(move |_, _| {
            Ok(Value::int(f64_trunc(text.trim().parse().unwrap_or(0.0))))
        }),
        "toFloat" => Box::new(move |_, _| Ok(Value::Float(text.trim().parse().unwrap_or(0.0)))),
        "toUpper" => Box::new(move |_, _| Ok(Value::String(text.to_uppercase()))),
        "toLower" => Box::new(move |_, _| Ok(Value::String(text.to_lowercase()))),
        "getToken" => Box::new(move |_, args| {
            let index = f64_trunc(args.first().map_or(0.0, Value::as_number)).max(0) as usize;
            Ok(Value::String(text.split_whitespace().nth(index).unwrap_or("").to_owned()))
        }),
        "substr" => Box::new(move |_, args| {
            let start = f64_trunc(args.first().map_or(0.0, Value::as_number)).max(0) as usize;
            let taken: String = match args.get(1) {
                Some(len_arg) => {
                    let len = f64_trunc(len_arg.as_number()).max(0) as usize;
                    text.chars().skip(start).take(len).collect()
                },
                None => text.chars().skip(start).collect(),
            };
            Ok(Value::String(taken))
        }),
        "findFirst" => Box::new(move |_, args| {
            let needle = match args.first() {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            let found = text.find(&needle)
                            .map_or(-1, |byte| text[..byte].chars().count() as i64);
            Ok(Value::int(found))
        }),
        _ => {
            return Err(RuntimeError::UnknownMember { type_name: "string".to_owned(),
                                                     member:    member.to_owned(),
                                                     line });
        },
    };
    Ok(Value::NativeFunction(Rc::new(NativeFunction { name: member.to_owned(),
                                                      func })))
}
