//! Error and non-local-exit types shared by the unifier and the evaluator.
//!
//! Asteroid surfaces failures to user code as `Exception` objects caught by
//! `try`/`catch`, but internally a failure needs to carry more than a
//! message: a pattern-match failure inside multi-clause dispatch is routine
//! control flow (try the next clause), while a `RedundantPatternFound` or a
//! division by zero is a hard error that must propagate. `return`/`break`/
//! `throw` are a third thing again: not failures at all, just non-local
//! exits that unwind through the same `Result` plumbing.
//!
//! This module folds all three into one `EvalError` the way the evaluator's
//! `Result<Term, EvalError>` threads them, mirroring the propagate/break/
//! return carrying error type used elsewhere for non-local exits in this
//! codebase.

use crate::term::Term;
use asteroid_ir::SourceLoc;

/// Result of evaluating a term.
pub type EvalResult = Result<Term, EvalError>;

/// The six exception kinds user code can name in a `catch` pattern.
///
/// These are exactly the tags the `Exception` struct's `kind` field can
/// hold; anything else the evaluator raises is an internal bug, not a
/// catchable condition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExceptionKind {
    PatternMatchFailed,
    RedundantPatternFound,
    NonLinearPatternError,
    ArithmeticError,
    FileNotFound,
    SystemError,
}

impl ExceptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExceptionKind::PatternMatchFailed => "PatternMatchFailed",
            ExceptionKind::RedundantPatternFound => "RedundantPatternFound",
            ExceptionKind::NonLinearPatternError => "NonLinearPatternError",
            ExceptionKind::ArithmeticError => "ArithmeticError",
            ExceptionKind::FileNotFound => "FileNotFound",
            ExceptionKind::SystemError => "SystemError",
        }
    }
}

/// A non-local exit in flight: `return`, `break`, or `throw`.
///
/// Distinct from a failed evaluation — these unwind the call stack on
/// purpose and are expected to be caught by a specific construct (a
/// function call boundary, an enclosing loop, or a `try` statement).
#[derive(Clone, Debug)]
pub enum Control {
    Return(Term),
    Break,
    Throw(Term),
}

/// An evaluation failure, or a non-local exit riding the same plumbing.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub message: String,
    pub kind: ExceptionKind,
    pub control: Option<Control>,
    pub loc: Option<SourceLoc>,
}

impl EvalError {
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
            kind,
            control: None,
            loc: None,
        }
    }

    #[must_use]
    pub fn with_loc(mut self, loc: SourceLoc) -> Self {
        self.loc = Some(loc);
        self
    }

    pub fn is_control_flow(&self) -> bool {
        self.control.is_some()
    }

    pub fn as_return(&self) -> Option<&Term> {
        match &self.control {
            Some(Control::Return(v)) => Some(v),
            _ => None,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self.control, Some(Control::Break))
    }

    pub fn as_throw(&self) -> Option<&Term> {
        match &self.control {
            Some(Control::Throw(v)) => Some(v),
            _ => None,
        }
    }

    /// Build the `Exception` object a user `catch` pattern unifies against.
    ///
    /// `throw` already carries its own payload term and is handled
    /// separately by the caller; this is for internally raised failures
    /// (pattern match failures, arithmetic errors, and so on).
    pub fn to_exception_term(&self) -> Term {
        Term::object_exception(self.kind.as_str(), &self.message)
    }
}

#[cold]
pub fn propagate(control: Control) -> EvalError {
    let kind = match &control {
        Control::Throw(_) => ExceptionKind::SystemError,
        Control::Return(_) | Control::Break => ExceptionKind::SystemError,
    };
    EvalError {
        message: String::new(),
        kind,
        control: Some(control),
        loc: None,
    }
}

#[cold]
pub fn return_with(value: Term) -> EvalError {
    propagate(Control::Return(value))
}

#[cold]
pub fn break_loop() -> EvalError {
    propagate(Control::Break)
}

#[cold]
pub fn throw(value: Term) -> EvalError {
    propagate(Control::Throw(value))
}

// Pattern-matching errors

#[cold]
pub fn pattern_match_failed(reason: impl Into<String>) -> EvalError {
    EvalError::new(
        ExceptionKind::PatternMatchFailed,
        format!("pattern match failed: {}", reason.into()),
    )
}

#[cold]
pub fn non_linear_pattern(name: &str) -> EvalError {
    EvalError::new(
        ExceptionKind::NonLinearPatternError,
        format!("non-linear pattern error: variable '{name}' is bound more than once in this pattern"),
    )
}

#[cold]
pub fn redundant_pattern_found(
    function_name: &str,
    winning_line: u32,
    shadowed_line: u32,
) -> EvalError {
    EvalError::new(
        ExceptionKind::RedundantPatternFound,
        format!(
            "redundant pattern detected in '{function_name}': the pattern on line {winning_line} \
             will consume all matches for pattern on line {shadowed_line}"
        ),
    )
}

// Arithmetic / runtime-type errors

#[cold]
pub fn arithmetic_error(message: impl Into<String>) -> EvalError {
    EvalError::new(ExceptionKind::ArithmeticError, message.into())
}

#[cold]
pub fn division_by_zero() -> EvalError {
    arithmetic_error("division by zero")
}

#[cold]
pub fn invalid_binary_op(op: &str, left_ty: &str, right_ty: &str) -> EvalError {
    arithmetic_error(format!("operator {op} not supported between {left_ty} and {right_ty}"))
}

#[cold]
pub fn invalid_unary_op(op: &str, ty: &str) -> EvalError {
    arithmetic_error(format!("operator {op} not supported for {ty}"))
}

// System errors: undefined names, arity mismatches, indexing, and so on

#[cold]
pub fn system_error(message: impl Into<String>) -> EvalError {
    EvalError::new(ExceptionKind::SystemError, message.into())
}

#[cold]
pub fn undefined_symbol(name: &str) -> EvalError {
    system_error(format!("'{name}' is not defined"))
}

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    system_error(format!("{type_name} is not a function"))
}

#[cold]
pub fn not_indexable(type_name: &str) -> EvalError {
    system_error(format!("{type_name} is not indexable"))
}

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    system_error(format!("index {index} out of bounds for length {len}"))
}

#[cold]
pub fn arity_mismatch(expected: usize, found: usize) -> EvalError {
    system_error(format!("expected {expected} argument(s), found {found}"))
}

#[cold]
pub fn no_clause_matched(function_name: &str) -> EvalError {
    system_error(format!("actual argument not recognized by any clause of '{function_name}'"))
}

#[cold]
pub fn unknown_struct(name: &str) -> EvalError {
    system_error(format!("'{name}' does not name a struct"))
}

#[cold]
pub fn pattern_slicing_length_mismatch() -> EvalError {
    system_error("pattern slicing requires the right-hand side to be a list of the same length")
}

#[cold]
pub fn file_not_found(path: &str) -> EvalError {
    EvalError::new(ExceptionKind::FileNotFound, format!("file not found: {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_match_failed_has_the_right_kind() {
        let err = pattern_match_failed("term not a string");
        assert_eq!(err.kind, ExceptionKind::PatternMatchFailed);
        assert!(err.message.starts_with("pattern match failed:"));
    }

    #[test]
    fn return_carries_its_value_and_no_message() {
        let err = return_with(Term::Integer(1));
        assert!(matches!(err.as_return(), Some(Term::Integer(1))));
        assert!(!err.message.contains("integer"));
    }

    #[test]
    fn break_is_recognized() {
        assert!(break_loop().is_break());
        assert!(!pattern_match_failed("x").is_break());
    }

    #[test]
    fn redundant_pattern_message_names_both_lines() {
        let err = redundant_pattern_found("f", 10, 20);
        assert!(err.message.contains("line 10"));
        assert!(err.message.contains("line 20"));
        assert!(err.message.contains('f'));
    }
}
