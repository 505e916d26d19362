use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    ast::{ClassDecl, Decl, EnumDecl, Expr, Program},
    error::{RuntimeError, ScriptError},
    interpreter::{
        bridge::{HostValue, NativeObject, unwrap, wrap_native},
        environment::Environment,
        lexer::tokenize,
        parser,
        value::core::{NativeFunction, ScriptFunction, Value},
    },
    util::num::f64_trunc,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// An embeddable script engine.
///
/// One engine owns one global environment plus the class and enum tables.
/// The host loads source text, registers native functions, objects and
/// classes, and calls scripted functions; everything runs synchronously on
/// the calling thread. For isolated scripts, instantiate several engines.
///
/// # Examples
/// ```
/// use seraph::{Engine, Value};
///
/// let engine = Engine::new();
/// engine.load("int double_it(int x) { return x * 2; }").unwrap();
///
/// let out = engine.call("double_it", &[Value::Int(21)]).unwrap();
/// assert_eq!(out, Value::Int(42));
/// ```
pub struct Engine {
    pub(crate) globals: Rc<Environment>,
    pub(crate) classes: RefCell<HashMap<String, Rc<ClassDecl>>>,
    pub(crate) enums:   RefCell<HashMap<String, HashMap<String, i64>>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with an empty global environment.
    #[must_use]
    pub fn new() -> Self {
        Self { globals: Environment::new(),
               classes: RefCell::new(HashMap::new()),
               enums:   RefCell::new(HashMap::new()), }
    }

    /// Lexes, parses and executes a source text.
    ///
    /// Top-level declarations are executed in two passes: classes,
    /// functions and enums are registered first, then global variable
    /// initializers run in source order. Forward references between
    /// functions and classes therefore work regardless of declaration
    /// order.
    ///
    /// # Errors
    /// Returns a [`ScriptError`] wrapping the first lexer, parser or
    /// runtime failure.
    pub fn load(&self, source: &str) -> Result<(), ScriptError> {
        let tokens = tokenize(source)?;
        let program = parser::core::parse(&tokens)?;
        self.execute(&program)?;
        Ok(())
    }

    fn execute(&self, program: &Program) -> EvalResult<()> {
        for decl in &program.decls {
            match decl {
                Decl::Class(class) => self.register_class_decl(class),
                Decl::Func(func) => {
                    self.globals.define(func.name.clone(),
                                        Value::Function(Rc::new(ScriptFunction {
                                            name: func.name.clone(),
                                            decl: func.clone(),
                                            this_val: None,
                                        })));
                },
                Decl::Enum(decl) => self.register_enum_decl(decl)?,
                Decl::Var(_) => {},
            }
        }
        for decl in &program.decls {
            if let Decl::Var(var) = decl {
                let value = self.variable_value(var, &self.globals)?;
                self.globals.define(var.name.clone(), value);
            }
        }
        Ok(())
    }

    fn register_class_decl(&self, class: &Rc<ClassDecl>) {
        self.classes.borrow_mut().insert(class.name.clone(), class.clone());
        // the class name doubles as a callable that constructs instances
        let name = class.name.clone();
        let line = class.line;
        let constructor = NativeFunction {
            name: class.name.clone(),
            func: Box::new(move |engine, args| engine.instantiate_class(&name, args, line)),
        };
        self.globals.define(class.name.clone(), Value::NativeFunction(Rc::new(constructor)));
    }

    fn register_enum_decl(&self, decl: &EnumDecl) -> EvalResult<()> {
        let mut members = HashMap::new();
        let mut next = 0_i64;
        for value in &decl.values {
            let n = match &value.value {
                Some(expr) => f64_trunc(self.eval_expr(expr, &self.globals)?.as_number()),
                None => next,
            };
            members.insert(value.name.clone(), n);
            next = n.wrapping_add(1);
        }
        self.enums.borrow_mut().insert(decl.name.clone(), members);
        Ok(())
    }

    /// Looks up a global function by name and calls it.
    ///
    /// # Parameters
    /// - `name`: Name of a scripted or registered function.
    /// - `args`: Argument values, passed positionally.
    ///
    /// # Returns
    /// The function's return value, or [`Value::Void`] for functions that
    /// do not return one.
    ///
    /// # Errors
    /// Returns a [`RuntimeError`] if the name is unknown, the value is not
    /// callable, or evaluation of the body fails.
    pub fn call(&self, name: &str, args: &[Value]) -> EvalResult<Value> {
        let callee = self.globals.get(name)
                         .ok_or_else(|| RuntimeError::UnknownIdentifier { name: name.to_owned(),
                                                                          line: 0, })?;
        self.call_value(&callee, args, 0)
    }

    /// Binds a native function in globals.
    ///
    /// The closure receives unwrapped host values and its result is
    /// wrapped back into a script value.
    pub fn register_function(&self,
                             name: &str,
                             func: impl Fn(&[HostValue]) -> HostValue + 'static) {
        let native = NativeFunction { name: name.to_owned(),
                                      func: Box::new(move |_, args| {
                                          let host_args: Vec<HostValue> =
                                              args.iter().map(unwrap).collect();
                                          Ok(wrap_native(func(&host_args)))
                                      }), };
        self.globals.define(name, Value::NativeFunction(Rc::new(native)));
    }

    /// Binds a value in globals.
    pub fn register_global(&self, name: &str, value: Value) {
        self.globals.define(name, value);
    }

    /// Binds an integer in globals, applying the 32-bit truncation rule.
    pub fn register_int(&self, name: &str, value: i64) {
        self.globals.define(name, Value::int(value));
    }

    /// Binds a host object in globals as an opaque `Native` value. The
    /// object's [`NativeObject::type_name`] supplies its script-visible
    /// type name.
    pub fn register_object(&self, name: &str, object: Rc<dyn NativeObject>) {
        self.globals.define(name, Value::Native(object));
    }

    /// Binds a native callable that produces a `Native` via `factory`
    /// when invoked from script.
    pub fn register_class(&self,
                          name: &str,
                          factory: impl Fn(&[HostValue]) -> Rc<dyn NativeObject> + 'static) {
        let native = NativeFunction { name: name.to_owned(),
                                      func: Box::new(move |_, args| {
                                          let host_args: Vec<HostValue> =
                                              args.iter().map(unwrap).collect();
                                          Ok(Value::Native(factory(&host_args)))
                                      }), };
        self.globals.define(name, Value::NativeFunction(Rc::new(native)));
    }

    /// Reads a global by name.
    #[must_use]
    pub fn get_global(&self, name: &str) -> Option<Value> {
        self.globals.get(name)
    }

    /// Writes a global by name, defining it if absent.
    pub fn set_global(&self, name: &str, value: Value) {
        self.globals.set(name, value);
    }

    /// Whether a callable global of this name exists.
    #[must_use]
    pub fn has_function(&self, name: &str) -> bool {
        matches!(self.globals.get(name),
                 Some(Value::Function(_) | Value::NativeFunction(_)))
    }

    /// Evaluates an expression in the given scope.
    ///
    /// This is the expression dispatch; the per-form logic lives in the
    /// sibling evaluator modules.
    pub(crate) fn eval_expr(&self, expr: &Expr, env: &Rc<Environment>) -> EvalResult<Value> {
        match expr {
            Expr::IntLiteral { value, .. } => Ok(Value::int(*value)),
            Expr::FloatLiteral { value, .. } => Ok(Value::Float(*value)),
            Expr::StringLiteral { value, .. } => Ok(Value::String(value.clone())),
            Expr::BoolLiteral { value, .. } => Ok(Value::Bool(*value)),
            Expr::NullLiteral { .. } => Ok(Value::Null),
            Expr::Identifier { name, line } => {
                env.get(name)
                   .ok_or_else(|| RuntimeError::UnknownIdentifier { name: name.clone(),
                                                                    line: *line, })
            },
            Expr::Binary { left,
                           op,
                           right,
                           line, } => self.eval_binary_expr(left, *op, right, *line, env),
            Expr::Unary { op,
                          operand,
                          prefix,
                          line, } => self.eval_unary_expr(*op, operand, *prefix, *line, env),
            Expr::Assign { target,
                           op,
                           value,
                           line, } => self.eval_assign(target, *op, value, *line, env),
            Expr::HandleAssign { target, value, line } => {
                self.eval_handle_assign(target, value, *line, env)
            },
            Expr::Call { callee, args, line } => self.eval_call(callee, args, *line, env),
            Expr::Member { object, member, line } => {
                self.eval_member_expr(object, member, *line, env)
            },
            Expr::Index { object, index, line } => {
                self.eval_index_expr(object, index, *line, env)
            },
            Expr::New { class, args, line } => {
                let arg_values = self.eval_args(args, env)?;
                self.instantiate_class(class, &arg_values, *line)
            },
            Expr::Cast { target_type, expr, .. } => {
                let value = self.eval_expr(expr, env)?;
                Ok(super::utils::cast_value(target_type, value))
            },
            Expr::Ternary { condition,
                            then_expr,
                            else_expr,
                            .. } => {
                if self.eval_expr(condition, env)?.is_truthy() {
                    self.eval_expr(then_expr, env)
                } else {
                    self.eval_expr(else_expr, env)
                }
            },
        }
    }

    /// Evaluates call arguments eagerly, left to right.
    pub(crate) fn eval_args(&self,
                            args: &[Expr],
                            env: &Rc<Environment>)
                            -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.eval_expr(arg, env)).collect()
    }
}
