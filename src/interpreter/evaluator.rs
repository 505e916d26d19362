/// The engine and expression dispatch.
///
/// Contains the `Engine` with its host-facing API (load, call,
/// registration, globals) and the central expression evaluator.
pub mod core;

/// Statement execution.
///
/// Threads the `Flow` control-flow sum through blocks, loops, switch
/// fall-through and the return/break/continue signals.
pub mod statement;

/// Binary operator evaluation.
///
/// Short-circuit logic, string concatenation, numeric arithmetic with the
/// left-operand result rule and 32-bit bitwise operations.
pub mod binary;

/// Unary operator evaluation.
///
/// Negation, logical and bitwise not, increments/decrements on lvalues
/// and the handle-of sigil.
pub mod unary;

/// Member resolution and method dispatch.
///
/// Field and class-method lookup, the array and string built-in methods,
/// the native property/method bridge, and enum member access.
pub mod member;

/// Function calls and class instantiation.
///
/// Scripted call frames with `this` snapshotting, native calls,
/// instantiation and type defaults.
pub mod function;

/// Lvalue plumbing and casts.
///
/// Reading and writing assignable expressions, indexed access and the
/// cast table.
pub mod utils;
