//! Term model and unification engine.
//!
//! This crate owns the one data type Asteroid evaluates, pattern-matches,
//! and runs programs with: [`Term`]. It has no notion of an environment or
//! a call stack — those live in `asteroid_eval`, which depends on this
//! crate rather than the other way around. The boundary is what keeps
//! [`Term::FunctionVal`] tractable: a closure carries a flattened snapshot
//! of its captured bindings (`Rc<FxHashMap<Name, Term>>`) rather than a
//! live reference to the scope it was defined in.

mod errors;
mod heap;
mod term;
mod unify;

pub use errors::{
    arithmetic_error, arity_mismatch, break_loop, division_by_zero, file_not_found,
    index_out_of_bounds, invalid_binary_op, invalid_unary_op, no_clause_matched,
    non_linear_pattern, not_callable, not_indexable, pattern_match_failed,
    pattern_slicing_length_mismatch, redundant_pattern_found, return_with, system_error, throw,
    undefined_symbol, unknown_struct, Control, EvalError, EvalResult, ExceptionKind,
};
pub use heap::Heap;
pub use term::{Clause, FunctionVal, ObjectVal, StructLayout, Term};
pub use unify::{check_linearity, unify, Bindings, UnifyMode};
