//! Unification: the sole binding mechanism.
//!
//! Every binding occurrence in a program — a function call, a `let`, a
//! `for` loop, a `catch` clause — comes down to unifying a pattern term
//! against a value term. Unification runs in one of two modes:
//!
//! - [`UnifyMode::Matching`]: ordinary evaluation. Binds free pattern
//!   variables into `bindings` and succeeds or fails.
//! - [`UnifyMode::Subsuming`]: used only by the redundancy checker, to ask
//!   "would an earlier clause's pattern already have matched anything this
//!   pattern matches?". No bindings are meaningfully used; `id` still
//!   matches unconditionally (a bare variable subsumes everything), which
//!   is exactly what makes an earlier catch-all clause shadow a later one.
//!
//! Failure is routine control flow, not an exceptional condition: a failed
//! match inside multi-clause dispatch just means "try the next clause", so
//! it is threaded back as `Err(EvalError)` with
//! [`errors::ExceptionKind::PatternMatchFailed`] the same way any other
//! `Result` short-circuits, and the caller decides whether to swallow it
//! or propagate it.

use rustc_hash::FxHashMap;

use asteroid_ir::{Name, StringLookup};

use crate::errors::{self, EvalError};
use crate::term::Term;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnifyMode {
    Matching,
    Subsuming,
}

/// Receives the bindings unification produces, resolves names back to
/// strings for error messages, and evaluates the boolean condition of a
/// `%constraint` pattern.
///
/// Kept as a trait rather than a concrete type so this crate never needs
/// to depend on the evaluator: `asteroid_eval::Environment` implements
/// this directly, binding into the live scope stack.
pub trait Bindings: StringLookup {
    fn bind(&mut self, name: Name, value: Term);

    /// The interned name for the anonymous pattern `_`.
    fn anon(&self) -> Name;

    /// Evaluate `cond` (with whatever bindings have been produced so far
    /// visible) and report whether it is truthy. Constraint patterns are
    /// the only place unification needs to run user code.
    fn eval_condition(&mut self, cond: &Term) -> Result<bool, EvalError>;
}

/// Unify `pattern` against `term`, binding free pattern variables into
/// `bindings` as a side effect.
///
/// Returns `Ok(())` on success. On failure returns `Err` with
/// [`errors::ExceptionKind::PatternMatchFailed`] (matching mode) — routine,
/// expected to be caught by multi-clause dispatch — or a propagated error
/// if evaluating a constraint condition raised one.
pub fn unify(
    pattern: &Term,
    term: &Term,
    mode: UnifyMode,
    bindings: &mut dyn Bindings,
) -> Result<(), EvalError> {
    check_linearity(pattern, bindings.anon())?;
    unify_inner(pattern, term, mode, bindings)
}

fn fail(reason: impl Into<String>) -> EvalError {
    errors::pattern_match_failed(reason)
}

/// Whole-string (anchored) regex match: a string pattern only matches a
/// term whose printable form it covers start to end, not a substring.
fn anchored_is_match(pattern: &str, text: &str) -> Result<bool, regex::Error> {
    let anchored = format!("^(?:{pattern})$");
    Ok(regex::Regex::new(&anchored)?.is_match(text))
}

fn unify_inner(
    pattern: &Term,
    term: &Term,
    mode: UnifyMode,
    bindings: &mut dyn Bindings,
) -> Result<(), EvalError> {
    match pattern {
        // `name @ pattern`: bind the whole matched term, then recurse.
        Term::NamedPattern(name, inner) => {
            unify_inner(inner, term, mode, bindings)?;
            bindings.bind(*name, term.clone());
            Ok(())
        }

        // Bare identifier: always matches, binds unconditionally (in both
        // modes). `_` matches without binding.
        Term::Id(name) => {
            if *name != bindings.anon() {
                bindings.bind(*name, term.clone());
            }
            Ok(())
        }

        // `%typename`: matches by runtime type only, no structural check.
        Term::Typematch(ty) => {
            let ty_name = bindings.lookup(*ty);
            if term.type_name() == ty_name {
                Ok(())
            } else {
                Err(fail(format!(
                    "expected a value of type '{}', found {}",
                    ty_name,
                    term.type_name()
                )))
            }
        }

        Term::Constraint(inner, cond) => {
            unify_inner(inner, term, mode, bindings)?;
            if bindings.eval_condition(cond)? {
                Ok(())
            } else {
                Err(fail("constraint condition was false"))
            }
        }

        Term::QuotedPattern(inner) => {
            let stripped = match term {
                Term::QuotedPattern(t) => t.as_ref(),
                other => other,
            };
            unify_inner(inner, stripped, mode, bindings)
        }

        // `head | tail`: term must be a non-empty list.
        Term::HeadTail(head, tail) => {
            let Term::List(items) = term else {
                return Err(fail("head-tail pattern requires a list"));
            };
            let items = items.borrow();
            let Some((first, rest)) = items.split_first() else {
                return Err(fail("head-tail pattern requires a non-empty list"));
            };
            unify_inner(head, first, mode, bindings)?;
            unify_inner(tail, &Term::list(rest.to_vec()), mode, bindings)
        }

        Term::Tuple(pats) => {
            let Term::Tuple(vals) = term else {
                return Err(fail("expected a tuple"));
            };
            if pats.len() != vals.len() {
                return Err(fail(format!(
                    "tuple pattern of length {} does not match tuple of length {}",
                    pats.len(),
                    vals.len()
                )));
            }
            for (p, v) in pats.iter().zip(vals.iter()) {
                unify_inner(p, v, mode, bindings)?;
            }
            Ok(())
        }

        Term::List(pat_items) => {
            let Term::List(val_items) = term else {
                return Err(fail("expected a list"));
            };
            let pat_items = pat_items.borrow();
            let val_items = val_items.borrow();
            if pat_items.len() != val_items.len() {
                return Err(fail(format!(
                    "list pattern of length {} does not match list of length {}",
                    pat_items.len(),
                    val_items.len()
                )));
            }
            for (p, v) in pat_items.iter().zip(val_items.iter()) {
                unify_inner(p, v, mode, bindings)?;
            }
            Ok(())
        }

        // A raw string pattern matches any term by coercing it to its
        // printable form and running an anchored regex match — every
        // value is string-matchable, not just other strings.
        Term::Str(pat_re) => {
            let printed = term.to_string();
            match anchored_is_match(pat_re, &printed) {
                Ok(true) => Ok(()),
                Ok(false) => Err(fail(format!("'{printed}' does not match pattern /{pat_re}/"))),
                Err(e) => Err(fail(format!("invalid pattern string '{pat_re}': {e}"))),
            }
        }

        Term::Object(pat_obj) => {
            let Term::Object(val_obj) = term else {
                return Err(fail("expected an object"));
            };
            let pat_obj = pat_obj.borrow();
            let val_obj = val_obj.borrow();
            if pat_obj.layout.name != val_obj.layout.name {
                return Err(fail("expected an instance of a different struct"));
            }
            for (p, v) in pat_obj.members.iter().zip(val_obj.members.iter()) {
                unify_inner(p, v, mode, bindings)?;
            }
            Ok(())
        }

        // Scalars and anything without special pattern semantics: require
        // structural equality. This also covers the case where `pattern`
        // is itself a fully-evaluated value (a literal used as a pattern).
        other => {
            if other == term {
                Ok(())
            } else if mode == UnifyMode::Subsuming {
                Err(fail("pattern does not subsume term"))
            } else {
                Err(fail(format!(
                    "expected {}, found {}",
                    other.type_name(),
                    term.type_name()
                )))
            }
        }
    }
}

/// Ensure no variable is bound more than once by a single pattern.
///
/// A pattern like `[x, x]` can never succeed in a way that is meaningful
/// (the second `x` would have to simultaneously be a fresh binding and a
/// check against the first), so Asteroid rejects it outright rather than
/// giving it a surprising "first write wins" or "must be equal" semantics.
pub fn check_linearity(pattern: &Term, anon: Name) -> Result<(), EvalError> {
    let mut seen: FxHashMap<Name, ()> = FxHashMap::default();
    collect_vars(pattern, anon, &mut seen)
}

fn collect_vars(
    pattern: &Term,
    anon: Name,
    seen: &mut FxHashMap<Name, ()>,
) -> Result<(), EvalError> {
    match pattern {
        Term::Id(name) => {
            if *name == anon {
                return Ok(());
            }
            if seen.insert(*name, ()).is_some() {
                tracing::debug!(?name, "rejecting non-linear pattern");
                return Err(errors::non_linear_pattern(&format!("{name:?}")));
            }
            Ok(())
        }
        Term::NamedPattern(name, inner) => {
            if seen.insert(*name, ()).is_some() {
                tracing::debug!(?name, "rejecting non-linear pattern");
                return Err(errors::non_linear_pattern(&format!("{name:?}")));
            }
            collect_vars(inner, anon, seen)
        }
        Term::HeadTail(head, tail) => {
            collect_vars(head, anon, seen)?;
            collect_vars(tail, anon, seen)
        }
        Term::Constraint(inner, _) => collect_vars(inner, anon, seen),
        Term::QuotedPattern(inner) => collect_vars(inner, anon, seen),
        Term::Tuple(items) => {
            for item in items.iter() {
                collect_vars(item, anon, seen)?;
            }
            Ok(())
        }
        Term::List(items) => {
            for item in items.borrow().iter() {
                collect_vars(item, anon, seen)?;
            }
            Ok(())
        }
        Term::Object(obj) => {
            for member in &obj.borrow().members {
                collect_vars(member, anon, seen)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MapBindings {
        vars: FxHashMap<Name, Term>,
        anon: Name,
        strings: FxHashMap<Name, &'static str>,
    }

    impl MapBindings {
        fn new(anon: Name) -> Self {
            MapBindings {
                vars: FxHashMap::default(),
                anon,
                strings: FxHashMap::default(),
            }
        }

        fn with_type_name(mut self, name: Name, s: &'static str) -> Self {
            self.strings.insert(name, s);
            self
        }
    }

    impl StringLookup for MapBindings {
        fn lookup(&self, name: Name) -> &str {
            self.strings.get(&name).copied().unwrap_or("")
        }
    }

    impl Bindings for MapBindings {
        fn bind(&mut self, name: Name, value: Term) {
            self.vars.insert(name, value);
        }

        fn anon(&self) -> Name {
            self.anon
        }

        fn eval_condition(&mut self, cond: &Term) -> Result<bool, EvalError> {
            Ok(cond.is_truthy())
        }
    }

    fn name(n: u32) -> Name {
        Name::from_raw(n)
    }

    const ANON: Name = Name::EMPTY;

    #[test]
    fn bare_id_binds_unconditionally() {
        let mut b = MapBindings::new(ANON);
        let x = name(100);
        unify(&Term::Id(x), &Term::Integer(7), UnifyMode::Matching, &mut b).unwrap();
        assert_eq!(b.vars.get(&x), Some(&Term::Integer(7)));
    }

    #[test]
    fn scalar_mismatch_fails() {
        let mut b = MapBindings::new(ANON);
        let err = unify(
            &Term::Integer(1),
            &Term::Integer(2),
            UnifyMode::Matching,
            &mut b,
        )
        .unwrap_err();
        assert_eq!(err.kind, errors::ExceptionKind::PatternMatchFailed);
    }

    #[test]
    fn head_tail_splits_nonempty_list() {
        let mut b = MapBindings::new(ANON);
        let head = name(101);
        let tail = name(102);
        let pattern = Term::HeadTail(Box::new(Term::Id(head)), Box::new(Term::Id(tail)));
        let list = Term::list(vec![Term::Integer(1), Term::Integer(2), Term::Integer(3)]);
        unify(&pattern, &list, UnifyMode::Matching, &mut b).unwrap();
        assert_eq!(b.vars.get(&head), Some(&Term::Integer(1)));
        assert_eq!(
            b.vars.get(&tail),
            Some(&Term::list(vec![Term::Integer(2), Term::Integer(3)]))
        );
    }

    #[test]
    fn head_tail_rejects_empty_list() {
        let mut b = MapBindings::new(ANON);
        let pattern = Term::HeadTail(Box::new(Term::Id(name(1))), Box::new(Term::Id(name(2))));
        let empty = Term::list(vec![]);
        assert!(unify(&pattern, &empty, UnifyMode::Matching, &mut b).is_err());
    }

    #[test]
    fn repeated_variable_is_rejected() {
        let x = name(200);
        let pattern = Term::list(vec![Term::Id(x), Term::Id(x)]);
        assert!(check_linearity(&pattern, ANON).is_err());
    }

    #[test]
    fn anonymous_pattern_does_not_bind() {
        let mut b = MapBindings::new(ANON);
        unify(
            &Term::Id(ANON),
            &Term::Integer(9),
            UnifyMode::Matching,
            &mut b,
        )
        .unwrap();
        assert!(b.vars.is_empty());
    }

    #[test]
    fn id_subsumes_anything_in_subsuming_mode() {
        let mut b = MapBindings::new(ANON);
        let x = name(300);
        unify(
            &Term::Id(x),
            &Term::list(vec![Term::Integer(1)]),
            UnifyMode::Subsuming,
            &mut b,
        )
        .unwrap();
    }

    #[test]
    fn constraint_pattern_checks_condition() {
        let mut b = MapBindings::new(ANON);
        let x = name(400);
        let pattern = Term::Constraint(Box::new(Term::Id(x)), Box::new(Term::Boolean(false)));
        assert!(unify(&pattern, &Term::Integer(5), UnifyMode::Matching, &mut b).is_err());
    }

    #[test]
    fn tuple_length_mismatch_fails() {
        let mut b = MapBindings::new(ANON);
        let pattern = Term::tuple(vec![Term::Id(name(1))]);
        let value = Term::tuple(vec![Term::Integer(1), Term::Integer(2)]);
        assert!(unify(&pattern, &value, UnifyMode::Matching, &mut b).is_err());
    }

    #[test]
    fn list_aliasing_survives_unification() {
        let mut b = MapBindings::new(ANON);
        let x = name(500);
        let shared = Term::list(vec![Term::Integer(1)]);
        unify(&Term::Id(x), &shared, UnifyMode::Matching, &mut b).unwrap();
        if let Term::List(h) = &shared {
            h.borrow_mut().push(Term::Integer(2));
        }
        if let Some(Term::List(bound)) = b.vars.get(&x) {
            assert_eq!(bound.borrow().len(), 2);
        } else {
            panic!("expected a bound list");
        }
    }

    #[test]
    fn typematch_checks_runtime_type() {
        let ty = name(600);
        let mut b = MapBindings::new(ANON).with_type_name(ty, "integer");
        unify(
            &Term::Typematch(ty),
            &Term::Integer(1),
            UnifyMode::Matching,
            &mut b,
        )
        .unwrap();
        assert!(unify(
            &Term::Typematch(ty),
            &Term::Boolean(true),
            UnifyMode::Matching,
            &mut b,
        )
        .is_err());
    }

    #[test]
    fn string_pattern_is_an_anchored_regex_over_any_term() {
        let mut b = MapBindings::new(ANON);
        unify(
            &Term::string("a.c"),
            &Term::string("abc"),
            UnifyMode::Matching,
            &mut b,
        )
        .unwrap();
        assert!(unify(
            &Term::string("a.c"),
            &Term::string("a"),
            UnifyMode::Matching,
            &mut b,
        )
        .is_err());
    }

    #[test]
    fn string_pattern_matches_printable_form_of_non_string_term() {
        let mut b = MapBindings::new(ANON);
        unify(
            &Term::string("42"),
            &Term::Integer(42),
            UnifyMode::Matching,
            &mut b,
        )
        .unwrap();
    }
}
