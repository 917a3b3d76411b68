//! Centralized error constructors for the evaluator.
//!
//! A single import point for every evaluation error constructor, so call
//! sites write `errors::undefined_symbol(..)` instead of reaching into
//! `asteroid_patterns` directly.
//!
//! # Usage
//!
//! ```ignore
//! use asteroid_eval::errors::{undefined_symbol, division_by_zero};
//! ```

pub use asteroid_patterns::{EvalError, EvalResult, ExceptionKind};

// Pattern-matching errors

pub use asteroid_patterns::{non_linear_pattern, pattern_match_failed, redundant_pattern_found};

// Arithmetic / runtime-type errors

pub use asteroid_patterns::{arithmetic_error, division_by_zero, invalid_binary_op, invalid_unary_op};

// System errors: undefined names, arity mismatches, indexing, and so on

pub use asteroid_patterns::{
    arity_mismatch, file_not_found, index_out_of_bounds, no_clause_matched, not_callable,
    not_indexable, pattern_slicing_length_mismatch, system_error, undefined_symbol,
    unknown_struct,
};

// Non-local exits riding the same `Result` plumbing

pub use asteroid_patterns::{break_loop, return_with, throw, Control};
