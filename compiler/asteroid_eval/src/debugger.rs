//! Debugger notification hooks.
//!
//! The evaluator calls into a `Debugger` at a handful of points (entering
//! and leaving a function call, a redundant-pattern check firing) so a
//! front end can show a call stack or single-step through evaluation.
//! [`NullDebugger`] is the default: every hook is a no-op, so carrying a
//! debugger costs nothing when nobody is watching.

use asteroid_ir::{Name, SourceLoc};

pub trait Debugger {
    /// Called just before a function clause's body starts executing.
    fn on_call(&mut self, _function_name: Name, _loc: SourceLoc) {}

    /// Called after a function call returns, successfully or not.
    fn on_return(&mut self, _function_name: Name) {}

    /// Called when the redundancy checker is about to run over a
    /// function's clauses. Returning `false` suppresses the check for
    /// this call (used internally while the checker itself is unifying,
    /// to avoid recursing into itself).
    fn should_check_redundancy(&self) -> bool {
        true
    }
}

/// A `Debugger` that does nothing, for production evaluation.
#[derive(Default)]
pub struct NullDebugger;

impl Debugger for NullDebugger {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_debugger_allows_redundancy_checks() {
        assert!(NullDebugger.should_check_redundancy());
    }
}
