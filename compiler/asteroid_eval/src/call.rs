//! Call machinery: multi-clause dispatch, redundancy checking, and the
//! closure-swap that isolates a callee from its caller's scope stack.
//!
//! Calling a function runs through a fixed sequence:
//!
//! 1. Push the call site onto the trace stack (popped on every exit path,
//!    including an error return).
//! 2. If the function has more than one clause and this call did not
//!    itself originate from a redundancy check, verify no earlier clause
//!    already subsumes a later one (`in_redundancy_check` guards against
//!    the check's own pattern-vs-pattern unification recursing back in
//!    here).
//! 3. Build a fresh [`Environment`] rooted in the closure's captured
//!    bindings plus, for a method call, `this` bound to the receiver.
//! 4. Try each clause's pattern against the argument in turn; the first
//!    one that unifies runs its body.
//! 5. A `return` inside the body ends the call with that value; any other
//!    propagated error (an uncaught `throw`, a hard evaluation error)
//!    ends it too.
//! 6. If no clause matched, raise a system error naming the function.

use asteroid_ir::StringLookup;
use asteroid_patterns::{no_clause_matched, unify, EvalResult, FunctionVal, Term, UnifyMode};

use crate::environment::{Environment, Mutability};
use crate::interpreter::{BindCtx, Interpreter};

pub fn call_function(
    interp: &mut Interpreter,
    func: &FunctionVal,
    argument: Term,
    receiver: Option<Term>,
) -> EvalResult {
    interp.debugger.on_call(func.name, current_loc(func));
    tracing::debug!(
        function = interp.resolve(func.name),
        num_clauses = func.clauses.len(),
        "calling function"
    );
    if !interp.in_redundancy_check && func.clauses.len() > 1 {
        interp.in_redundancy_check = true;
        let check = check_redundancy(interp, func);
        interp.in_redundancy_check = false;
        check?;
    }

    let result = try_clauses(interp, func, &argument, receiver);
    interp.debugger.on_return(func.name);

    match result {
        Err(e) => match e.as_return() {
            Some(v) => Ok(v.clone()),
            None => Err(e),
        },
        ok => ok,
    }
}

fn current_loc(func: &FunctionVal) -> asteroid_ir::SourceLoc {
    func.clauses.first().map_or(asteroid_ir::SourceLoc::UNKNOWN, |c| c.loc)
}

fn try_clauses(
    interp: &mut Interpreter,
    func: &FunctionVal,
    argument: &Term,
    receiver: Option<Term>,
) -> EvalResult {
    for clause in func.clauses.iter() {
        let mut env = Environment::from_captures(&func.captures);
        if let Some(this) = &receiver {
            env.define(interp.this_name, this.clone(), Mutability::Immutable);
        }
        env.push_scope();

        let matched = {
            let mut ctx = BindCtx { interp: &mut *interp, env: &mut env };
            unify(&clause.pattern, argument, UnifyMode::Matching, &mut ctx)
        };

        match matched {
            Ok(()) => return interp.eval_block(std::slice::from_ref(&clause.body), &mut env),
            Err(e) if e.kind == asteroid_patterns::ExceptionKind::PatternMatchFailed => continue,
            Err(e) => return Err(e),
        }
    }
    Err(no_clause_matched(interp.resolve(func.name)))
}

/// Verify no earlier clause's pattern already subsumes a later one.
///
/// A bare variable (an `id` pattern) subsumes anything, so a clause list
/// like `f(x) = ...; f(0) = ...` is always redundant: the first clause
/// already matches every argument the second one would.
fn check_redundancy(
    interp: &mut Interpreter,
    func: &FunctionVal,
) -> Result<(), asteroid_patterns::EvalError> {
    for i in 0..func.clauses.len() {
        for j in (i + 1)..func.clauses.len() {
            let mut env = Environment::new();
            let mut ctx = BindCtx { interp: &mut *interp, env: &mut env };
            let subsumes = unify(
                &func.clauses[i].pattern,
                &func.clauses[j].pattern,
                UnifyMode::Subsuming,
                &mut ctx,
            );
            if subsumes.is_ok() {
                tracing::debug!(
                    function = interp.resolve(func.name),
                    earlier_line = func.clauses[i].loc.line,
                    later_line = func.clauses[j].loc.line,
                    "earlier clause subsumes later clause"
                );
                return Err(asteroid_patterns::redundant_pattern_found(
                    interp.resolve(func.name),
                    func.clauses[i].loc.line,
                    func.clauses[j].loc.line,
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteroid_ir::SharedInterner;
    use asteroid_patterns::Clause;
    use rustc_hash::FxHashMap;
    use std::rc::Rc;

    fn make_fn(interner: &SharedInterner, name: &str, clauses: Vec<Clause>) -> FunctionVal {
        FunctionVal {
            name: interner.intern(name),
            clauses: Rc::new(clauses),
            captures: Rc::new(FxHashMap::default()),
            is_method: false,
        }
    }

    #[test]
    fn first_matching_clause_wins() {
        let interner = SharedInterner::default();
        let mut interp = Interpreter::new(interner.clone());
        let x = interner.intern("x");
        let clauses = vec![
            Clause {
                pattern: Term::Integer(0),
                body: Term::Str("zero".into()),
                loc: asteroid_ir::SourceLoc::new(asteroid_ir::Name::EMPTY, 1),
            },
            Clause {
                pattern: Term::Id(x),
                body: Term::Str("other".into()),
                loc: asteroid_ir::SourceLoc::new(asteroid_ir::Name::EMPTY, 2),
            },
        ];
        let func = make_fn(&interner, "f", clauses);
        let r = call_function(&mut interp, &func, Term::Integer(0), None).unwrap();
        assert_eq!(r, Term::string("zero"));
        let r = call_function(&mut interp, &func, Term::Integer(5), None).unwrap();
        assert_eq!(r, Term::string("other"));
    }

    #[test]
    fn catch_all_before_specific_clause_is_redundant() {
        let interner = SharedInterner::default();
        let mut interp = Interpreter::new(interner.clone());
        let x = interner.intern("x");
        let clauses = vec![
            Clause {
                pattern: Term::Id(x),
                body: Term::Str("any".into()),
                loc: asteroid_ir::SourceLoc::new(asteroid_ir::Name::EMPTY, 10),
            },
            Clause {
                pattern: Term::Integer(0),
                body: Term::Str("zero".into()),
                loc: asteroid_ir::SourceLoc::new(asteroid_ir::Name::EMPTY, 20),
            },
        ];
        let func = make_fn(&interner, "f", clauses);
        let err = call_function(&mut interp, &func, Term::Integer(0), None).unwrap_err();
        assert_eq!(
            err.kind,
            asteroid_patterns::ExceptionKind::RedundantPatternFound
        );
        assert!(err.message.contains("line 10"));
        assert!(err.message.contains("line 20"));
    }

    #[test]
    fn no_clause_matched_names_the_function() {
        let interner = SharedInterner::default();
        let mut interp = Interpreter::new(interner.clone());
        let clauses = vec![Clause {
            pattern: Term::Integer(1),
            body: Term::Integer(1),
            loc: asteroid_ir::SourceLoc::UNKNOWN,
        }];
        let func = make_fn(&interner, "only_one", clauses);
        let err = call_function(&mut interp, &func, Term::Integer(2), None).unwrap_err();
        assert!(err.message.contains("only_one"));
    }
}
