#![deny(clippy::arithmetic_side_effects)]
//! Asteroid Eval - the tree-walking evaluator for Asteroid programs.
//!
//! # Architecture
//!
//! - [`Environment`]: variable scoping with a scope stack, not cloned on
//!   every call (see [`Environment::from_captures`] for the closure-call
//!   path).
//! - [`operators::evaluate_binary`]/[`operators::evaluate_unary`]: direct
//!   enum-based dispatch over the fixed operator symbol set.
//! - [`prelude::dispatch_builtin_method`]: built-in list/string member
//!   functions, looked up by name rather than through the general
//!   struct-method table.
//! - [`call::call_function`]: multi-clause dispatch, redundancy checking,
//!   and the environment swap that isolates a callee from its caller.
//! - [`Term`], `EvalError`, `EvalResult` and the rest of the value/error
//!   model live in `asteroid_patterns`, re-exported here for convenience.

mod call;
mod debugger;
mod environment;
mod errors;
mod interpreter;
mod operators;
mod prelude;

pub use asteroid_patterns::{
    arithmetic_error, arity_mismatch, break_loop, division_by_zero, file_not_found,
    index_out_of_bounds, invalid_binary_op, invalid_unary_op, no_clause_matched,
    non_linear_pattern, not_callable, not_indexable, pattern_match_failed,
    pattern_slicing_length_mismatch, redundant_pattern_found, return_with, system_error, throw,
    undefined_symbol, unknown_struct, Control, EvalError, EvalResult, ExceptionKind, FunctionVal,
    Heap, ObjectVal, StructLayout, Term,
};

pub use call::call_function;
pub use debugger::{Debugger, NullDebugger};
pub use environment::{AssignError, Environment, LocalScope, Mutability, Scope};
pub use interpreter::Interpreter;
pub use operators::{evaluate_binary, evaluate_unary, BinOp, UnOp};
pub use prelude::{dispatch_builtin_method, dispatch_list_method, dispatch_string_method};
