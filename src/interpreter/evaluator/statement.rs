use std::rc::Rc;

use crate::{
    ast::{Expr, Stmt, SwitchCase},
    interpreter::{
        environment::Environment,
        evaluator::core::{Engine, EvalResult},
        value::core::Value,
    },
};

/// The result kind threaded through statement execution.
///
/// `Break`, `Continue` and `Return` are non-error control-flow signals:
/// each evaluator frame that understands a signal consumes it, everything
/// else passes it upward. Runtime errors travel separately through the
/// `Err` channel and are never caught internally.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

impl Engine {
    /// Executes a statement list, stopping at the first signal.
    pub(crate) fn exec_block(&self, body: &[Stmt], env: &Rc<Environment>) -> EvalResult<Flow> {
        for stmt in body {
            match self.exec_stmt(stmt, env)? {
                Flow::Normal => {},
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes one statement.
    pub(crate) fn exec_stmt(&self, stmt: &Stmt, env: &Rc<Environment>) -> EvalResult<Flow> {
        match stmt {
            Stmt::Block { body, .. } => self.exec_block(body, &env.child()),
            Stmt::Var(decl) => {
                let value = self.variable_value(decl, env)?;
                env.define(decl.name.clone(), value);
                Ok(Flow::Normal)
            },
            Stmt::Expr { expr, .. } => {
                self.eval_expr(expr, env)?;
                Ok(Flow::Normal)
            },
            Stmt::If { condition,
                       then_branch,
                       else_branch,
                       .. } => {
                if self.eval_expr(condition, env)?.is_truthy() {
                    self.exec_stmt(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch, env)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Stmt::While { condition, body, .. } => {
                while self.eval_expr(condition, env)?.is_truthy() {
                    match self.exec_stmt(body, env)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {},
                    }
                }
                Ok(Flow::Normal)
            },
            Stmt::DoWhile { body, condition, .. } => {
                loop {
                    match self.exec_stmt(body, env)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {},
                    }
                    if !self.eval_expr(condition, env)?.is_truthy() {
                        break;
                    }
                }
                Ok(Flow::Normal)
            },
            Stmt::For { init,
                        condition,
                        update,
                        body,
                        .. } => {
                let scope = env.child();
                if let Some(init) = init {
                    self.exec_stmt(init, &scope)?;
                }
                loop {
                    if let Some(condition) = condition
                       && !self.eval_expr(condition, &scope)?.is_truthy()
                    {
                        break;
                    }
                    match self.exec_stmt(body, &scope)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        // `continue` still reaches the update clause
                        Flow::Normal | Flow::Continue => {},
                    }
                    if let Some(update) = update {
                        self.eval_expr(update, &scope)?;
                    }
                }
                Ok(Flow::Normal)
            },
            Stmt::Switch { discriminant, cases, .. } => {
                self.exec_switch(discriminant, cases, env)
            },
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Void,
                };
                Ok(Flow::Return(value))
            },
            Stmt::Break { .. } => Ok(Flow::Break),
            Stmt::Continue { .. } => Ok(Flow::Continue),
        }
    }

    /// C-style switch: the first matching arm (or `default` reached while
    /// nothing has matched) starts execution, and control falls through
    /// subsequent arm bodies until a `break`. Arm labels after the match
    /// point are not evaluated.
    fn exec_switch(&self,
                   discriminant: &Expr,
                   cases: &[SwitchCase],
                   env: &Rc<Environment>)
                   -> EvalResult<Flow> {
        let selector = self.eval_expr(discriminant, env)?;
        let scope = env.child();
        let mut matched = false;
        for case in cases {
            if !matched {
                matched = match &case.value {
                    Some(expr) => self.eval_expr(expr, &scope)?.equals(&selector),
                    None => true,
                };
            }
            if matched {
                for stmt in &case.body {
                    match self.exec_stmt(stmt, &scope)? {
                        Flow::Normal => {},
                        Flow::Break => return Ok(Flow::Normal),
                        flow => return Ok(flow),
                    }
                }
            }
        }
        Ok(Flow::Normal)
    }
}
