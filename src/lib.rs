//! # seraph
//!
//! seraph is an embeddable interpreter for a statically-typed, C-like
//! scripting language with classes, handles, arrays and enums. A host
//! application loads source text, registers native functions, objects and
//! classes, and calls scripted functions, passing values across the
//! boundary.
//!
//! # Examples
//!
//! ```
//! use seraph::{Engine, Value};
//!
//! let engine = Engine::new();
//! engine.load(r#"
//!     class Counter {
//!         int n;
//!         void bump() { n++; }
//!     }
//!
//!     int run(int start) {
//!         Counter c = new Counter();
//!         c.n = start;
//!         c.bump();
//!         c.bump();
//!         return c.n;
//!     }
//! "#).unwrap();
//!
//! let out = engine.call("run", &[Value::Int(40)]).unwrap();
//! assert_eq!(out, Value::Int(42));
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed code.
///
/// This module declares the AST node types that represent the syntactic
/// structure of source code as a tree: type references, declarations,
/// statements and expressions, each carrying its source line for
/// diagnostics.
pub mod ast;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// Defines all errors that can be raised while loading or running a
/// script, with line (and for the lexer, column) information, plus the
/// combined `ScriptError` surfaced by `Engine::load`.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// Ties together the lexer, parser, evaluator, value representations,
/// environments and the native bridge to provide a complete runtime. The
/// engine's host API lives in `interpreter::evaluator::core`.
pub mod interpreter;
/// General numeric conversion helpers.
///
/// The 32-bit integer truncation rule and float-to-integer conversions
/// used throughout the evaluator.
pub mod util;

pub use error::ScriptError;
pub use interpreter::bridge::{HostValue, NativeObject, NativeRecord, unwrap, wrap_native};
pub use interpreter::evaluator::core::Engine;
pub use interpreter::value::core::Value;
