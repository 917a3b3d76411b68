//! The tree-walking evaluator.
//!
//! `Interpreter::eval` recurses over a [`Term`] the same way the term tree
//! is shaped: a scalar evaluates to itself, a compound expression
//! evaluates its children and combines them, and a statement is executed
//! for effect and evaluates to `none`. Non-local exits (`return`, `break`,
//! `throw`) are threaded back as `Err(EvalError)` and unwound by whichever
//! construct is supposed to catch them — see [`crate::call`] for the
//! function-call boundary and the loop/`try` handling below.

use asteroid_ir::{Name, SharedInterner, SourceLoc, StringLookup};
use asteroid_patterns::{
    break_loop, pattern_match_failed, return_with, system_error, throw, undefined_symbol, unify,
    Bindings, EvalError, EvalResult, Term, UnifyMode,
};
use asteroid_stack::ensure_sufficient_stack;

use crate::debugger::{Debugger, NullDebugger};
use crate::environment::{Environment, Mutability};
use crate::operators::{self, BinOp, UnOp};
use crate::prelude;

/// Owns everything evaluation needs beyond the current [`Environment`]:
/// the interner (for error messages and resolving `Foreign`/`Typematch`
/// names), the call trace, and the debugger hooks.
pub struct Interpreter {
    pub(crate) interner: SharedInterner,
    pub(crate) anon: Name,
    pub(crate) this_name: Name,
    pub(crate) trace: Vec<SourceLoc>,
    pub(crate) debugger: Box<dyn Debugger>,
    pub(crate) in_redundancy_check: bool,
}

impl Interpreter {
    pub fn new(interner: SharedInterner) -> Self {
        Self::with_debugger(interner, Box::new(NullDebugger))
    }

    pub fn with_debugger(interner: SharedInterner, debugger: Box<dyn Debugger>) -> Self {
        let anon = interner.intern("_");
        let this_name = interner.intern("this");
        Interpreter {
            interner,
            anon,
            this_name,
            trace: Vec::new(),
            debugger,
            in_redundancy_check: false,
        }
    }

    /// The current call trace, most recent call last.
    pub fn trace(&self) -> &[SourceLoc] {
        &self.trace
    }

    pub(crate) fn resolve(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    /// Evaluate a single term to a value.
    pub fn eval(&mut self, term: &Term, env: &mut Environment) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(term, env))
    }

    fn eval_inner(&mut self, term: &Term, env: &mut Environment) -> EvalResult {
        match term {
            Term::Integer(_)
            | Term::Real(_)
            | Term::Boolean(_)
            | Term::Str(_)
            | Term::NoneVal
            | Term::List(_)
            | Term::Tuple(_)
            | Term::FunctionVal(_)
            | Term::Struct(_)
            | Term::Object(_) => Ok(term.clone()),

            Term::Id(name) => env
                .lookup(*name)
                .ok_or_else(|| undefined_symbol(self.resolve(*name))),

            Term::Block(stmts) => self.eval_block(stmts, env),

            Term::Global(names) => {
                // Rebind each name in the current scope to its global value,
                // so a subsequent assignment in this scope reaches the
                // global binding instead of shadowing it.
                for name in names {
                    let value = env
                        .lookup(*name)
                        .ok_or_else(|| undefined_symbol(self.resolve(*name)))?;
                    env.define(*name, value, Mutability::Mutable);
                }
                Ok(Term::NoneVal)
            }

            Term::Assert(cond, loc) => {
                let value = self.eval(cond, env)?;
                if value.is_truthy() {
                    Ok(Term::NoneVal)
                } else {
                    Err(pattern_match_failed(format!("assertion failed at {loc}")))
                }
            }

            Term::UnifyStmt(pattern, value, _loc) => {
                let evaluated = self.eval(value, env)?;
                let mut ctx = BindCtx { interp: &mut *self, env: &mut *env };
                unify(pattern, &evaluated, UnifyMode::Matching, &mut ctx)?;
                Ok(Term::NoneVal)
            }

            Term::Return(value) => {
                let v = self.eval(value, env)?;
                Err(return_with(v))
            }

            Term::Break => Err(break_loop()),

            Term::Throw(value, _loc) => {
                let v = self.eval(value, env)?;
                Err(throw(v))
            }

            Term::Try { body, catches } => self.eval_try(body, catches, env),

            Term::While(cond, body) => self.eval_while(cond, body, env),
            Term::Repeat(body, cond) => self.eval_repeat(body, cond, env),
            Term::For {
                pattern,
                iterable,
                body,
            } => self.eval_for(pattern, iterable, body, env),

            Term::IfStmt(arms, else_branch) => self.eval_if(arms, else_branch, env),
            Term::IfExp(cond, then_branch, else_branch) => {
                if self.eval(cond, env)?.is_truthy() {
                    self.eval(then_branch, env)
                } else {
                    self.eval(else_branch, env)
                }
            }

            Term::IsExp(subject, pattern) => {
                let value = self.eval(subject, env)?;
                let mut ctx = BindCtx { interp: &mut *self, env };
                match unify(pattern, &value, UnifyMode::Matching, &mut ctx) {
                    Ok(()) => Ok(Term::Boolean(true)),
                    Err(e) if e.kind == asteroid_patterns::ExceptionKind::PatternMatchFailed => {
                        Ok(Term::Boolean(false))
                    }
                    Err(e) => Err(e),
                }
            }

            Term::InExp(needle, haystack) => {
                let needle = self.eval(needle, env)?;
                let haystack = self.eval(haystack, env)?;
                let Term::List(items) = haystack else {
                    return Err(system_error("'in' requires a list on the right-hand side"));
                };
                Ok(Term::Boolean(items.borrow().iter().any(|v| *v == needle)))
            }

            Term::ToList { start, stop, stride } => self.eval_to_list(start, stop, stride, env),

            Term::StructDef(layout) => {
                env.define_global(layout.name, Term::Struct(layout.clone()));
                Ok(Term::NoneVal)
            }

            Term::Index(base, index) => self.eval_index(base, index, env),
            Term::Member(base, name) => self.eval_member(base, *name, env),
            Term::Apply(callee, arg) => self.eval_apply(callee, arg, env),

            Term::FunctionExp(name, clauses) => {
                let func = asteroid_patterns::FunctionVal {
                    name: name.unwrap_or(self.anon),
                    clauses: clauses.clone(),
                    captures: std::rc::Rc::new(env.capture()),
                    is_method: false,
                };
                Ok(Term::FunctionVal(std::rc::Rc::new(func)))
            }

            Term::Deref(inner) => self.eval(inner, env),

            // Pattern-only tags reaching the evaluator as expressions is a
            // host bug: the parser/caller should never produce them here.
            Term::HeadTail(..)
            | Term::NamedPattern(..)
            | Term::Typematch(_)
            | Term::Constraint(..)
            | Term::QuotedPattern(_)
            | Term::Foreign(_) => Err(system_error("pattern term used in expression position")),
        }
    }

    pub(crate) fn eval_block(&mut self, stmts: &[Term], env: &mut Environment) -> EvalResult {
        let mut result = Term::NoneVal;
        for stmt in stmts {
            result = self.eval(stmt, env)?;
        }
        Ok(result)
    }

    fn eval_if(
        &mut self,
        arms: &[(Term, Term)],
        else_branch: &Option<Box<Term>>,
        env: &mut Environment,
    ) -> EvalResult {
        for (cond, body) in arms {
            if self.eval(cond, env)?.is_truthy() {
                env.push_scope();
                let r = self.eval(body, env);
                env.pop_scope();
                return r;
            }
        }
        if let Some(else_branch) = else_branch {
            env.push_scope();
            let r = self.eval(else_branch, env);
            env.pop_scope();
            return r;
        }
        Ok(Term::NoneVal)
    }

    fn eval_while(&mut self, cond: &Term, body: &Term, env: &mut Environment) -> EvalResult {
        while self.eval(cond, env)?.is_truthy() {
            env.push_scope();
            let r = self.eval(body, env);
            env.pop_scope();
            match r {
                Err(e) if e.is_break() => break,
                Err(e) => return Err(e),
                Ok(_) => {}
            }
        }
        Ok(Term::NoneVal)
    }

    fn eval_repeat(&mut self, body: &Term, cond: &Term, env: &mut Environment) -> EvalResult {
        loop {
            env.push_scope();
            let r = self.eval(body, env);
            env.pop_scope();
            match r {
                Err(e) if e.is_break() => break,
                Err(e) => return Err(e),
                Ok(_) => {}
            }
            if self.eval(cond, env)?.is_truthy() {
                break;
            }
        }
        Ok(Term::NoneVal)
    }

    fn eval_for(
        &mut self,
        pattern: &Term,
        iterable: &Term,
        body: &Term,
        env: &mut Environment,
    ) -> EvalResult {
        let iterable = self.eval(iterable, env)?;
        let Term::List(items) = iterable else {
            return Err(system_error(format!(
                "'for' requires an iterable list, found {}",
                iterable.type_name()
            )));
        };
        let snapshot = items.borrow().clone();
        for item in snapshot {
            env.push_scope();
            let bound = {
                let mut ctx = BindCtx { interp: &mut *self, env: &mut *env };
                unify(pattern, &item, UnifyMode::Matching, &mut ctx)
            };
            let r = bound.and_then(|()| self.eval(body, env));
            env.pop_scope();
            match r {
                Err(e) if e.is_break() => break,
                Err(e) => return Err(e),
                Ok(_) => {}
            }
        }
        Ok(Term::NoneVal)
    }

    /// Expand `start to stop step stride` into a concrete, inclusive list.
    /// The stride's sign is taken from the direction of travel, not from
    /// its own sign, so `5 to 1` with stride `1` still counts down.
    fn eval_to_list(
        &mut self,
        start: &Term,
        stop: &Term,
        stride: &Term,
        env: &mut Environment,
    ) -> EvalResult {
        let (Term::Integer(start), Term::Integer(stop), Term::Integer(stride)) =
            (self.eval(start, env)?, self.eval(stop, env)?, self.eval(stride, env)?)
        else {
            return Err(system_error("range bounds and stride must be integers"));
        };
        if stride == 0 {
            return Err(system_error("range stride must not be zero"));
        }
        let direction: i64 = if start <= stop { 1 } else { -1 };
        let step = stride.abs().saturating_mul(direction);
        let mut items = Vec::new();
        let mut i = start;
        loop {
            items.push(Term::Integer(i));
            if i == stop {
                break;
            }
            i = i.saturating_add(step);
            if (direction > 0 && i > stop) || (direction < 0 && i < stop) {
                break;
            }
        }
        Ok(Term::list(items))
    }

    fn eval_try(
        &mut self,
        body: &Term,
        catches: &[(Term, Term)],
        env: &mut Environment,
    ) -> EvalResult {
        env.push_scope();
        let result = self.eval(body, env);
        env.pop_scope();

        let thrown = match result {
            Ok(v) => return Ok(v),
            Err(e) => {
                if e.is_control_flow() && e.as_throw().is_none() {
                    // `return`/`break` pass straight through a `try`.
                    return Err(e);
                }
                e.as_throw().cloned().unwrap_or_else(|| e.to_exception_term())
            }
        };
        tracing::debug!(num_catches = catches.len(), "caught exception, trying catch clauses");

        for (pattern, handler) in catches {
            env.push_scope();
            let matched = {
                let mut ctx = BindCtx { interp: &mut *self, env: &mut *env };
                unify(pattern, &thrown, UnifyMode::Matching, &mut ctx)
            };
            if matched.is_ok() {
                let r = self.eval(handler, env);
                env.pop_scope();
                return r;
            }
            env.pop_scope();
        }
        // No catch clause matched: the original exception propagates.
        Err(throw(thrown))
    }

    fn eval_index(&mut self, base: &Term, index: &Term, env: &mut Environment) -> EvalResult {
        let base_val = self.eval(base, env)?;
        let idx_val = self.eval(index, env)?;
        let Term::Integer(idx) = idx_val else {
            return Err(system_error(format!(
                "index must be an integer, found {}",
                idx_val.type_name()
            )));
        };
        match base_val {
            Term::List(items) => {
                let items = items.borrow();
                usize::try_from(idx)
                    .ok()
                    .and_then(|i| items.get(i).cloned())
                    .ok_or_else(|| asteroid_patterns::index_out_of_bounds(idx, items.len()))
            }
            Term::Tuple(items) => usize::try_from(idx)
                .ok()
                .and_then(|i| items.get(i).cloned())
                .ok_or_else(|| asteroid_patterns::index_out_of_bounds(idx, items.len())),
            other => Err(asteroid_patterns::not_indexable(other.type_name())),
        }
    }

    fn eval_member(&mut self, base: &Term, name: Name, env: &mut Environment) -> EvalResult {
        let base_val = self.eval(base, env)?;
        match &base_val {
            Term::Object(obj) => obj
                .borrow()
                .member(name)
                .cloned()
                .ok_or_else(|| undefined_symbol(self.resolve(name))),
            other => {
                let method = self.resolve(name).to_string();
                prelude::dispatch_builtin_method(other, &method, &[])
                    .unwrap_or_else(|| Err(undefined_symbol(&method)))
            }
        }
    }

    fn eval_apply(&mut self, callee: &Term, arg: &Term, env: &mut Environment) -> EvalResult {
        // A direct built-in operator application, e.g. the desugaring of
        // `a + b` into `Apply(Foreign(__plus__), Tuple([a, b]))`.
        if let Term::Foreign(name) = callee {
            let argument = self.eval(arg, env)?;
            return self.eval_foreign(*name, argument);
        }

        // `receiver.method(args...)`: dispatch against the receiver's
        // struct methods (bound as `this`) or, for lists/strings, the
        // built-in member functions in `prelude`.
        if let Term::Member(base, name) = callee {
            let receiver = self.eval(base, env)?;
            let argument = self.eval(arg, env)?;
            return self.eval_method_call(receiver, *name, argument);
        }

        let callee_val = self.eval(callee, env)?;
        let argument = self.eval(arg, env)?;
        match callee_val {
            Term::FunctionVal(func) => crate::call::call_function(self, &func, argument, None),
            Term::Struct(layout) => self.construct_object(layout, argument),
            other => Err(asteroid_patterns::not_callable(other.type_name())),
        }
    }

    /// `StructName(args...)`: build a zero-initialized instance, then either
    /// run its `__init__` method on it or assign `args` positionally into
    /// the data slots.
    fn construct_object(
        &mut self,
        layout: std::rc::Rc<asteroid_patterns::StructLayout>,
        argument: Term,
    ) -> EvalResult {
        let instance = Term::object(layout.clone(), vec![Term::NoneVal; layout.members.len()]);
        let Term::Object(heap) = instance.clone() else {
            unreachable!("Term::object always builds a Term::Object")
        };

        let init_name = self.interner.intern("__init__");
        if let Some(init) = layout.methods.get(&init_name).cloned() {
            crate::call::call_function(self, &init, argument, Some(instance.clone()))?;
            return Ok(instance);
        }

        let args: Vec<Term> = match &argument {
            Term::Tuple(items) => items.to_vec(),
            Term::NoneVal => Vec::new(),
            single => vec![single.clone()],
        };
        if args.is_empty() {
            return Ok(instance);
        }
        if args.len() != layout.members.len() {
            return Err(asteroid_patterns::arity_mismatch(layout.members.len(), args.len()));
        }
        heap.borrow_mut().members = args;
        Ok(instance)
    }

    fn eval_method_call(&mut self, receiver: Term, name: Name, argument: Term) -> EvalResult {
        match &receiver {
            Term::Object(obj) => {
                let method = obj.borrow().layout.methods.get(&name).cloned();
                match method {
                    Some(func) => crate::call::call_function(self, &func, argument, Some(receiver.clone())),
                    None => Err(undefined_symbol(self.resolve(name))),
                }
            }
            other => {
                let args: Vec<Term> = match &argument {
                    Term::Tuple(items) => items.to_vec(),
                    Term::NoneVal => Vec::new(),
                    single => vec![single.clone()],
                };
                let method = self.resolve(name).to_string();
                prelude::dispatch_builtin_method(other, &method, &args)
                    .unwrap_or_else(|| Err(undefined_symbol(&method)))
            }
        }
    }

    fn eval_foreign(&mut self, name: Name, argument: Term) -> EvalResult {
        let resolve = |n: Name| -> &'static str {
            // Operator symbols are pre-interned, so leaking a `'static`
            // str out of the interner's backing storage is sound here.
            let s = self.interner.lookup(n);
            Box::leak(s.to_string().into_boxed_str())
        };
        if let Some(op) = BinOp::from_name(name, resolve) {
            let Term::Tuple(args) = &argument else {
                return Err(system_error("binary operator requires a 2-tuple of operands"));
            };
            if args.len() != 2 {
                return Err(asteroid_patterns::arity_mismatch(2, args.len()));
            }
            return operators::evaluate_binary(&args[0], &args[1], op);
        }
        if let Some(op) = UnOp::from_name(name, resolve) {
            return operators::evaluate_unary(&argument, op);
        }
        Err(undefined_symbol(self.resolve(name)))
    }
}

/// Glue between the unifier's generic [`Bindings`] trait and a live
/// `(Interpreter, Environment)` pair, so `unify` can bind into the scope
/// stack and evaluate `%constraint` conditions without this crate's
/// `Term`/`Environment` leaking into `asteroid_patterns`.
pub(crate) struct BindCtx<'a> {
    pub(crate) interp: &'a mut Interpreter,
    pub(crate) env: &'a mut Environment,
}

impl StringLookup for BindCtx<'_> {
    fn lookup(&self, name: Name) -> &str {
        self.interp.interner.lookup(name)
    }
}

impl Bindings for BindCtx<'_> {
    fn bind(&mut self, name: Name, value: Term) {
        self.env.define(name, value, Mutability::Mutable);
    }

    fn anon(&self) -> Name {
        self.interp.anon
    }

    fn eval_condition(&mut self, cond: &Term) -> Result<bool, EvalError> {
        Ok(self.interp.eval(cond, self.env)?.is_truthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_interp() -> (Interpreter, SharedInterner) {
        let interner = SharedInterner::default();
        (Interpreter::new(interner.clone()), interner)
    }

    #[test]
    fn scalars_evaluate_to_themselves() {
        let (mut interp, _i) = new_interp();
        let mut env = Environment::new();
        assert_eq!(
            interp.eval(&Term::Integer(5), &mut env).unwrap(),
            Term::Integer(5)
        );
    }

    #[test]
    fn undefined_id_is_an_error() {
        let (mut interp, i) = new_interp();
        let mut env = Environment::new();
        let x = i.intern("x");
        assert!(interp.eval(&Term::Id(x), &mut env).is_err());
    }

    #[test]
    fn unify_stmt_binds_into_scope() {
        let (mut interp, i) = new_interp();
        let mut env = Environment::new();
        let x = i.intern("x");
        let stmt = Term::UnifyStmt(
            Box::new(Term::Id(x)),
            Box::new(Term::Integer(7)),
            SourceLoc::UNKNOWN,
        );
        interp.eval(&stmt, &mut env).unwrap();
        assert_eq!(env.lookup(x), Some(Term::Integer(7)));
    }

    #[test]
    fn if_exp_picks_the_true_branch() {
        let (mut interp, _i) = new_interp();
        let mut env = Environment::new();
        let expr = Term::IfExp(
            Box::new(Term::Boolean(true)),
            Box::new(Term::Integer(1)),
            Box::new(Term::Integer(2)),
        );
        assert_eq!(interp.eval(&expr, &mut env).unwrap(), Term::Integer(1));
    }

    #[test]
    fn while_loop_stops_on_break() {
        let (mut interp, i) = new_interp();
        let mut env = Environment::new();
        let x = i.intern("x");
        env.define(x, Term::Integer(0), Mutability::Mutable);
        let body = Term::Block(std::rc::Rc::new(vec![Term::Break]));
        let loop_stmt = Term::While(Box::new(Term::Boolean(true)), Box::new(body));
        interp.eval(&loop_stmt, &mut env).unwrap();
    }

    #[test]
    fn for_loop_binds_each_element() {
        let (mut interp, i) = new_interp();
        let mut env = Environment::new();
        let x = i.intern("x");
        let sum = i.intern("sum");
        env.define(sum, Term::Integer(0), Mutability::Mutable);
        let list = Term::list(vec![Term::Integer(1), Term::Integer(2), Term::Integer(3)]);
        let body = Term::UnifyStmt(
            Box::new(Term::Id(sum)),
            Box::new(Term::Apply(
                Box::new(Term::Foreign(i.intern("__plus__"))),
                Box::new(Term::tuple(vec![Term::Id(sum), Term::Id(x)])),
            )),
            SourceLoc::UNKNOWN,
        );
        let for_stmt = Term::For {
            pattern: Box::new(Term::Id(x)),
            iterable: Box::new(list),
            body: Box::new(body),
        };
        interp.eval(&for_stmt, &mut env).unwrap();
        assert_eq!(env.lookup(sum), Some(Term::Integer(6)));
    }

    #[test]
    fn try_catch_binds_exception_pattern() {
        let (mut interp, i) = new_interp();
        let mut env = Environment::new();
        let e = i.intern("e");
        let try_stmt = Term::Try {
            body: Box::new(Term::Throw(
                Box::new(Term::Integer(42)),
                SourceLoc::UNKNOWN,
            )),
            catches: vec![(Term::Id(e), Term::Id(e))],
        };
        assert_eq!(interp.eval(&try_stmt, &mut env).unwrap(), Term::Integer(42));
    }

    #[test]
    fn foreign_plus_dispatches_to_operators() {
        let (mut interp, i) = new_interp();
        let mut env = Environment::new();
        let plus = i.intern("__plus__");
        let apply = Term::Apply(
            Box::new(Term::Foreign(plus)),
            Box::new(Term::tuple(vec![Term::Integer(1), Term::Integer(2)])),
        );
        assert_eq!(interp.eval(&apply, &mut env).unwrap(), Term::Integer(3));
    }

    #[test]
    fn struct_application_assigns_positional_members() {
        let (mut interp, i) = new_interp();
        let mut env = Environment::new();
        let point = i.intern("Point");
        let layout = std::rc::Rc::new(asteroid_patterns::StructLayout {
            name: point,
            members: vec![i.intern("x"), i.intern("y")],
            methods: rustc_hash::FxHashMap::default(),
        });
        let apply = Term::Apply(
            Box::new(Term::Struct(layout.clone())),
            Box::new(Term::tuple(vec![Term::Integer(3), Term::Integer(4)])),
        );
        let obj = interp.eval(&apply, &mut env).unwrap();
        let Term::Object(heap) = obj else {
            panic!("expected an object");
        };
        assert_eq!(heap.borrow().members, vec![Term::Integer(3), Term::Integer(4)]);
    }

    #[test]
    fn struct_application_with_no_args_is_zero_initialized() {
        let (mut interp, i) = new_interp();
        let mut env = Environment::new();
        let layout = std::rc::Rc::new(asteroid_patterns::StructLayout {
            name: i.intern("Empty"),
            members: vec![i.intern("x")],
            methods: rustc_hash::FxHashMap::default(),
        });
        let apply = Term::Apply(Box::new(Term::Struct(layout)), Box::new(Term::NoneVal));
        let obj = interp.eval(&apply, &mut env).unwrap();
        let Term::Object(heap) = obj else {
            panic!("expected an object");
        };
        assert_eq!(heap.borrow().members, vec![Term::NoneVal]);
    }

    #[test]
    fn is_exp_binds_on_success_and_reports_a_boolean() {
        let (mut interp, i) = new_interp();
        let mut env = Environment::new();
        let x = i.intern("x");
        let expr = Term::IsExp(Box::new(Term::Integer(5)), Box::new(Term::Id(x)));
        assert_eq!(interp.eval(&expr, &mut env).unwrap(), Term::Boolean(true));
        assert_eq!(env.lookup(x), Some(Term::Integer(5)));
    }

    #[test]
    fn is_exp_reports_false_on_mismatch_without_erroring() {
        let (mut interp, _i) = new_interp();
        let mut env = Environment::new();
        let expr = Term::IsExp(Box::new(Term::Integer(5)), Box::new(Term::Integer(6)));
        assert_eq!(interp.eval(&expr, &mut env).unwrap(), Term::Boolean(false));
    }

    #[test]
    fn in_exp_checks_list_membership() {
        let (mut interp, _i) = new_interp();
        let mut env = Environment::new();
        let list = Term::list(vec![Term::Integer(1), Term::Integer(2)]);
        let expr = Term::InExp(Box::new(Term::Integer(2)), Box::new(list));
        assert_eq!(interp.eval(&expr, &mut env).unwrap(), Term::Boolean(true));
    }

    #[test]
    fn to_list_expands_an_ascending_range() {
        let (mut interp, _i) = new_interp();
        let mut env = Environment::new();
        let expr = Term::ToList {
            start: Box::new(Term::Integer(1)),
            stop: Box::new(Term::Integer(5)),
            stride: Box::new(Term::Integer(2)),
        };
        assert_eq!(
            interp.eval(&expr, &mut env).unwrap(),
            Term::list(vec![
                Term::Integer(1),
                Term::Integer(3),
                Term::Integer(5)
            ])
        );
    }

    #[test]
    fn to_list_counts_down_when_start_exceeds_stop() {
        let (mut interp, _i) = new_interp();
        let mut env = Environment::new();
        let expr = Term::ToList {
            start: Box::new(Term::Integer(3)),
            stop: Box::new(Term::Integer(1)),
            stride: Box::new(Term::Integer(1)),
        };
        assert_eq!(
            interp.eval(&expr, &mut env).unwrap(),
            Term::list(vec![Term::Integer(3), Term::Integer(2), Term::Integer(1)])
        );
    }
}
