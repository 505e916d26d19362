use std::rc::Rc;

use crate::{
    ast::{BinaryOp, Expr, TypeRef},
    error::RuntimeError,
    interpreter::{
        bridge::{unwrap, wrap_native},
        environment::Environment,
        evaluator::{
            binary::eval_binary_values,
            core::{Engine, EvalResult},
            unary::to_handle,
        },
        value::core::Value,
    },
    util::num::{f64_to_int32, f64_trunc},
};

impl Engine {
    /// Reads an assignable expression.
    ///
    /// Names that were never defined read as `Int(0)` so first-use
    /// patterns like `x += 1` work; members and indices resolve normally.
    pub(crate) fn read_lvalue(&self,
                              target: &Expr,
                              env: &Rc<Environment>,
                              line: usize)
                              -> EvalResult<Value> {
        match target {
            Expr::Identifier { name, .. } => Ok(env.get(name).unwrap_or(Value::Int(0))),
            Expr::Member { object, member, line } => {
                let value = self.eval_expr(object, env)?;
                self.get_member(&value, member, *line)
            },
            Expr::Index { object, index, line } => self.eval_index_expr(object, index, *line, env),
            _ => Err(RuntimeError::InvalidAssignmentTarget { line }),
        }
    }

    /// Writes through an assignable expression.
    pub(crate) fn assign_lvalue(&self,
                                target: &Expr,
                                value: Value,
                                env: &Rc<Environment>,
                                line: usize)
                                -> EvalResult<()> {
        match target {
            Expr::Identifier { name, .. } => {
                env.set(name, value);
                Ok(())
            },
            Expr::Member { object, member, line } => {
                let receiver = self.eval_expr(object, env)?;
                self.set_member(&receiver, member, value, *line)
            },
            Expr::Index { object, index, line } => {
                let receiver = self.eval_expr(object, env)?;
                let index_value = self.eval_expr(index, env)?;
                self.set_index(&receiver, &index_value, value, *line)
            },
            _ => Err(RuntimeError::InvalidAssignmentTarget { line }),
        }
    }

    /// Plain and compound assignment. Compound forms read the current
    /// value first, then evaluate the right-hand side.
    pub(crate) fn eval_assign(&self,
                              target: &Expr,
                              op: Option<BinaryOp>,
                              value: &Expr,
                              line: usize,
                              env: &Rc<Environment>)
                              -> EvalResult<Value> {
        let new_value = match op {
            None => self.eval_expr(value, env)?,
            Some(op) => {
                let current = self.read_lvalue(target, env, line)?;
                let rhs = self.eval_expr(value, env)?;
                eval_binary_values(op, &current, &rhs)?
            },
        };
        self.assign_lvalue(target, new_value.clone(), env, line)?;
        Ok(new_value)
    }

    /// `@target = rhs`: the right-hand side is coerced into a handle and
    /// stored, rebinding the reference instead of copying a value.
    pub(crate) fn eval_handle_assign(&self,
                                     target: &Expr,
                                     value: &Expr,
                                     line: usize,
                                     env: &Rc<Environment>)
                                     -> EvalResult<Value> {
        let rhs = self.eval_expr(value, env)?;
        let handle = to_handle(&rhs);
        self.assign_lvalue(target, handle.clone(), env, line)?;
        Ok(handle)
    }

    /// Writes a member on an object, handle referent or native.
    pub(crate) fn set_member(&self,
                             receiver: &Value,
                             member: &str,
                             value: Value,
                             line: usize)
                             -> EvalResult<()> {
        match receiver {
            Value::Handle(None) => Err(RuntimeError::NullHandle { line }),
            Value::Handle(Some(target)) => {
                self.set_member(&target.as_value(), member, value, line)
            },
            Value::Object(obj) => {
                obj.borrow_mut().fields.insert(member.to_owned(), value);
                Ok(())
            },
            Value::Native(obj) => {
                if obj.set_property(member, unwrap(&value)) {
                    Ok(())
                } else {
                    Err(RuntimeError::UnknownMember { type_name: obj.type_name().to_owned(),
                                                      member:    member.to_owned(),
                                                      line })
                }
            },
            other => Err(RuntimeError::UnknownMember { type_name: other.type_label(),
                                                       member:    member.to_owned(),
                                                       line }),
        }
    }

    /// Evaluates `object[index]`.
    pub(crate) fn eval_index_expr(&self,
                                  object: &Expr,
                                  index: &Expr,
                                  line: usize,
                                  env: &Rc<Environment>)
                                  -> EvalResult<Value> {
        let receiver = self.eval_expr(object, env)?;
        let index_value = self.eval_expr(index, env)?;
        self.get_index(&receiver, &index_value, line)
    }

    fn get_index(&self, receiver: &Value, index: &Value, line: usize) -> EvalResult<Value> {
        match receiver {
            Value::Handle(None) => Err(RuntimeError::NullHandle { line }),
            Value::Handle(Some(target)) => self.get_index(&target.as_value(), index, line),
            Value::Array(elements) => {
                let idx = f64_trunc(index.as_number());
                let elements = elements.borrow();
                if idx < 0 || idx as usize >= elements.len() {
                    return Err(RuntimeError::IndexOutOfBounds { index: idx,
                                                                len:   elements.len(),
                                                                line });
                }
                Ok(elements[idx as usize].clone())
            },
            Value::Native(obj) => {
                let idx = f64_trunc(index.as_number());
                if idx >= 0
                   && let Some(value) = obj.get_index(idx as usize)
                {
                    return Ok(wrap_native(value));
                }
                Err(RuntimeError::IndexOutOfBounds { index: idx,
                                                     len:   0,
                                                     line })
            },
            other => Err(RuntimeError::InvalidOperation {
                details: format!("Cannot index a value of type {}", other.type_label()),
                line,
            }),
        }
    }

    /// Writes `object[index] = value`.
    pub(crate) fn set_index(&self,
                            receiver: &Value,
                            index: &Value,
                            value: Value,
                            line: usize)
                            -> EvalResult<()> {
        match receiver {
            Value::Handle(None) => Err(RuntimeError::NullHandle { line }),
            Value::Handle(Some(target)) => {
                self.set_index(&target.as_value(), index, value, line)
            },
            Value::Array(elements) => {
                let idx = f64_trunc(index.as_number());
                let mut elements = elements.borrow_mut();
                if idx < 0 || idx as usize >= elements.len() {
                    return Err(RuntimeError::IndexOutOfBounds { index: idx,
                                                                len:   elements.len(),
                                                                line });
                }
                elements[idx as usize] = value;
                Ok(())
            },
            Value::Native(obj) => {
                let idx = f64_trunc(index.as_number());
                if idx >= 0 && obj.set_index(idx as usize, unwrap(&value)) {
                    Ok(())
                } else {
                    Err(RuntimeError::IndexOutOfBounds { index: idx,
                                                         len:   0,
                                                         line })
                }
            },
            other => Err(RuntimeError::InvalidOperation {
                details: format!("Cannot index a value of type {}", other.type_label()),
                line,
            }),
        }
    }
}

/// Applies a cast.
///
/// Integer-family targets truncate through the 32-bit rule, float targets
/// take the numeric value, `bool` applies truthiness, `string` applies
/// stringification, and an unknown target returns the value unchanged.
pub(crate) fn cast_value(target: &TypeRef, value: Value) -> Value {
    match target.name.as_str() {
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16"
        | "uint32" | "uint64" => Value::Int(f64_to_int32(value.as_number())),
        "float" | "double" => Value::Float(value.as_number()),
        "bool" => Value::Bool(value.is_truthy()),
        "string" => Value::String(value.to_string()),
        _ => value,
    }
}
