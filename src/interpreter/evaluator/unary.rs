use std::rc::Rc;

use crate::{
    ast::{BinaryOp, Expr, UnaryOp},
    interpreter::{
        environment::Environment,
        evaluator::{
            binary::eval_binary_values,
            core::{Engine, EvalResult},
        },
        value::{core::Value, object::HandleRef},
    },
    util::num::f64_to_int32,
};

impl Engine {
    /// Evaluates a unary expression.
    pub(crate) fn eval_unary_expr(&self,
                                  op: UnaryOp,
                                  operand: &Expr,
                                  prefix: bool,
                                  line: usize,
                                  env: &Rc<Environment>)
                                  -> EvalResult<Value> {
        match op {
            UnaryOp::Neg => {
                let value = self.eval_expr(operand, env)?;
                Ok(match value {
                    Value::Int(n) => Value::int(-n),
                    Value::Float(x) => Value::Float(-x),
                    other => Value::Float(-other.as_number()),
                })
            },
            UnaryOp::Not => Ok(Value::Bool(!self.eval_expr(operand, env)?.is_truthy())),
            UnaryOp::BitNot => {
                let n = f64_to_int32(self.eval_expr(operand, env)?.as_number());
                Ok(Value::int(!n))
            },
            UnaryOp::HandleOf => {
                let value = self.eval_expr(operand, env)?;
                Ok(to_handle(&value))
            },
            UnaryOp::Inc | UnaryOp::Dec => self.eval_step(op, operand, prefix, line, env),
        }
    }

    /// `++`/`--` on any assignable expression: read, step by one following
    /// the operand's numeric kind, write back. Prefix forms return the new
    /// value, postfix forms the old one.
    fn eval_step(&self,
                 op: UnaryOp,
                 target: &Expr,
                 prefix: bool,
                 line: usize,
                 env: &Rc<Environment>)
                 -> EvalResult<Value> {
        let current = self.read_lvalue(target, env, line)?;
        let step = if matches!(op, UnaryOp::Inc) { BinaryOp::Add } else { BinaryOp::Sub };
        let updated = eval_binary_values(step, &current, &Value::Int(1))?;
        self.assign_lvalue(target, updated.clone(), env, line)?;
        Ok(if prefix { updated } else { current })
    }
}

/// Coerces a value into a handle.
///
/// A handle passes through unchanged, objects and natives are wrapped,
/// and anything else (including `null`) becomes the null handle.
pub(crate) fn to_handle(value: &Value) -> Value {
    match value {
        Value::Handle(_) => value.clone(),
        Value::Object(obj) => Value::Handle(Some(HandleRef::Object(obj.clone()))),
        Value::Native(obj) => Value::Handle(Some(HandleRef::Native(obj.clone()))),
        _ => Value::Handle(None),
    }
}
