use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::{Expr, TypeRef, VarDecl},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::{
            core::{Engine, EvalResult},
            statement::Flow,
        },
        value::{
            core::{ScriptFunction, Value},
            object::Object,
        },
    },
    util::num::f64_trunc,
};

impl Engine {
    /// Evaluates a call expression.
    ///
    /// A member callee binds its receiver (method dispatch); anything else
    /// evaluates the callee first. Arguments are evaluated eagerly, left
    /// to right, after the callee or receiver.
    pub(crate) fn eval_call(&self,
                            callee: &Expr,
                            args: &[Expr],
                            line: usize,
                            env: &Rc<Environment>)
                            -> EvalResult<Value> {
        if let Expr::Member { object, member, .. } = callee
           && !self.is_enum_scope(object)
        {
            let receiver = self.eval_expr(object, env)?;
            let arg_values = self.eval_args(args, env)?;
            return self.call_method(&receiver, member, &arg_values, line);
        }
        let callee_value = self.eval_expr(callee, env)?;
        let arg_values = self.eval_args(args, env)?;
        self.call_value(&callee_value, &arg_values, line)
    }

    /// Calls an already-evaluated function value.
    pub(crate) fn call_value(&self,
                             callee: &Value,
                             args: &[Value],
                             line: usize)
                             -> EvalResult<Value> {
        match callee {
            Value::NativeFunction(func) => (func.func)(self, args),
            Value::Function(func) => self.call_script_function(func, args),
            _ => Err(RuntimeError::NotCallable { line }),
        }
    }

    /// Calls a scripted function.
    ///
    /// The frame parents directly to the global environment; there are no
    /// closures over enclosing scopes. A bound object receiver defines
    /// `this` and snapshots its fields into the frame so methods read
    /// fields as bare identifiers; after the body runs, class member
    /// names are written back into the object. Parameters shadow
    /// snapshotted fields, and missing arguments default per parameter
    /// type.
    pub(crate) fn call_script_function(&self,
                                       func: &ScriptFunction,
                                       args: &[Value])
                                       -> EvalResult<Value> {
        let frame = self.globals.child();

        if let Some(this_val) = &func.this_val {
            frame.define("this", this_val.clone());
            if let Value::Object(obj) = this_val {
                for (name, value) in obj.borrow().fields.iter() {
                    frame.define(name.clone(), value.clone());
                }
            }
        }

        for (index, param) in func.decl.params.iter().enumerate() {
            let value = match args.get(index) {
                Some(value) => value.clone(),
                None => self.default_for_type(&param.type_ref, func.decl.line)?,
            };
            frame.define(param.name.clone(), value);
        }

        let flow = self.exec_block(&func.decl.body, &frame)?;

        if let Some(Value::Object(obj)) = &func.this_val {
            let class = self.classes.borrow().get(&obj.borrow().type_name).cloned();
            if let Some(class) = class {
                for field in class.fields() {
                    if let Some(value) = frame.get(&field.name) {
                        obj.borrow_mut().fields.insert(field.name.clone(), value);
                    }
                }
            }
        }

        match flow {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::Void),
        }
    }

    /// Instantiates a declared class.
    ///
    /// Field initializers are evaluated in the global environment in
    /// declaration order (the object's frame does not exist yet), then
    /// the constructor runs with the fresh object bound as `this`. The
    /// result is a plain object value; the caller decides whether it
    /// lives behind a handle.
    pub(crate) fn instantiate_class(&self,
                                    name: &str,
                                    args: &[Value],
                                    line: usize)
                                    -> EvalResult<Value> {
        let class = self.classes.borrow().get(name).cloned()
                        .ok_or_else(|| RuntimeError::UnknownClass { name: name.to_owned(),
                                                                    line })?;

        let obj = Rc::new(RefCell::new(Object::new(class.name.clone())));
        for field in class.fields() {
            let value = self.variable_value(field, &self.globals)?;
            obj.borrow_mut().fields.insert(field.name.clone(), value);
        }

        if let Some(ctor) = class.method(&class.name) {
            let bound = ScriptFunction { name:     ctor.name.clone(),
                                         decl:     ctor.clone(),
                                         this_val: Some(Value::Object(obj.clone())), };
            self.call_script_function(&bound, args)?;
        }

        Ok(Value::Object(obj))
    }

    /// Produces the initial value of a declaration.
    ///
    /// With an initializer the expression decides; the `name(sizeExpr)`
    /// form builds an array of that length filled with the element
    /// default; otherwise the declared type's default applies. The same
    /// routine serves statement-level and global declarations.
    pub(crate) fn variable_value(&self,
                                 decl: &VarDecl,
                                 env: &Rc<Environment>)
                                 -> EvalResult<Value> {
        if let Some(init) = &decl.initializer {
            return self.eval_expr(init, env);
        }
        if let Some(size) = &decl.array_size {
            let len = f64_trunc(self.eval_expr(size, env)?.as_number()).max(0) as usize;
            let fill = match &decl.type_ref.template_arg {
                Some(element) => self.default_for_type(element, decl.line)?,
                None => Value::Int(0),
            };
            return Ok(Value::array(vec![fill; len]));
        }
        self.default_for_type(&decl.type_ref, decl.line)
    }

    /// The default value of a type reference.
    ///
    /// Handle-typed declarations default to the null handle. Numeric
    /// types zero, `bool` is false, `string` is empty, arrays start
    /// empty. A known class type instantiates implicitly with no
    /// arguments; an unknown type defaults to the null handle.
    pub(crate) fn default_for_type(&self,
                                   type_ref: &TypeRef,
                                   line: usize)
                                   -> EvalResult<Value> {
        if type_ref.is_handle {
            return Ok(Value::Handle(None));
        }
        match type_ref.name.as_str() {
            "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16"
            | "uint32" | "uint64" => Ok(Value::Int(0)),
            "float" | "double" => Ok(Value::Float(0.0)),
            "bool" => Ok(Value::Bool(false)),
            "string" => Ok(Value::String(String::new())),
            "void" => Ok(Value::Void),
            "array" => Ok(Value::array(Vec::new())),
            name => {
                if self.classes.borrow().contains_key(name) {
                    self.instantiate_class(name, &[], line)
                } else {
                    Ok(Value::Handle(None))
                }
            },
        }
    }
}
