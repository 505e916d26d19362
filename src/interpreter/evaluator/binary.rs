use std::rc::Rc;

use crate::{
    ast::{BinaryOp, Expr},
    interpreter::{
        environment::Environment,
        evaluator::core::{Engine, EvalResult},
        value::core::Value,
    },
    util::num::f64_to_int32,
};

impl Engine {
    /// Evaluates a binary expression.
    ///
    /// `&&` and `||` short-circuit: the right operand is only evaluated
    /// when the left one does not decide the result. Every other operator
    /// evaluates both sides eagerly, left first.
    pub(crate) fn eval_binary_expr(&self,
                                   left: &Expr,
                                   op: BinaryOp,
                                   right: &Expr,
                                   _line: usize,
                                   env: &Rc<Environment>)
                                   -> EvalResult<Value> {
        match op {
            BinaryOp::And => {
                let lhs = self.eval_expr(left, env)?;
                if !lhs.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval_expr(right, env)?.is_truthy()))
            },
            BinaryOp::Or => {
                let lhs = self.eval_expr(left, env)?;
                if lhs.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval_expr(right, env)?.is_truthy()))
            },
            _ => {
                let lhs = self.eval_expr(left, env)?;
                let rhs = self.eval_expr(right, env)?;
                eval_binary_values(op, &lhs, &rhs)
            },
        }
    }
}

/// Applies a binary operator to two evaluated values.
///
/// `+` concatenates when either side is a string, stringifying the other.
/// Arithmetic happens in floating point; the result kind follows the left
/// operand (`int` stays `int` under 32-bit truncation). Bitwise and shift
/// operators coerce both sides to 32-bit integers; shift counts are
/// masked to five bits. Division and modulo by zero yield zero.
pub(crate) fn eval_binary_values(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    match op {
        BinaryOp::Add
            if matches!(lhs, Value::String(_)) || matches!(rhs, Value::String(_)) =>
        {
            Ok(Value::String(format!("{lhs}{rhs}")))
        },
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            let a = lhs.as_number();
            let b = rhs.as_number();
            let out = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => {
                    if b == 0.0 { 0.0 } else { a / b }
                },
                BinaryOp::Mod => {
                    if b == 0.0 { 0.0 } else { a % b }
                },
                _ => unreachable!(),
            };
            Ok(numeric_result(lhs, out))
        },
        BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor
        | BinaryOp::Shl
        | BinaryOp::Shr => {
            let a = f64_to_int32(lhs.as_number());
            let b = f64_to_int32(rhs.as_number());
            let out = match op {
                BinaryOp::BitAnd => a & b,
                BinaryOp::BitOr => a | b,
                BinaryOp::BitXor => a ^ b,
                BinaryOp::Shl => i64::from((a as i32) << ((b & 31) as u32)),
                BinaryOp::Shr => i64::from((a as i32) >> ((b & 31) as u32)),
                _ => unreachable!(),
            };
            Ok(Value::int(out))
        },
        BinaryOp::Equal => Ok(Value::Bool(lhs.equals(rhs))),
        BinaryOp::NotEqual => Ok(Value::Bool(!lhs.equals(rhs))),
        BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => {
            let a = lhs.as_number();
            let b = rhs.as_number();
            Ok(Value::Bool(match op {
                BinaryOp::Less => a < b,
                BinaryOp::Greater => a > b,
                BinaryOp::LessEqual => a <= b,
                BinaryOp::GreaterEqual => a >= b,
                _ => unreachable!(),
            }))
        },
        // non-lazy fallback, used by compound assignment
        BinaryOp::And => Ok(Value::Bool(lhs.is_truthy() && rhs.is_truthy())),
        BinaryOp::Or => Ok(Value::Bool(lhs.is_truthy() || rhs.is_truthy())),
    }
}

fn numeric_result(lhs: &Value, out: f64) -> Value {
    if matches!(lhs, Value::Int(_)) {
        Value::Int(f64_to_int32(out))
    } else {
        Value::Float(out)
    }
}
