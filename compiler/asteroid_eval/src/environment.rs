//! Environment for variable scoping in the interpreter.
//!
//! Uses a scope stack (not cloning) for efficient scope management.

// Rc is the intentional implementation detail of LocalScope<T>
#![expect(
    clippy::disallowed_types,
    reason = "Rc is the implementation of LocalScope<T>"
)]

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use asteroid_ir::Name;
use asteroid_patterns::Term;

/// Whether a variable binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// Binding can be reassigned.
    Mutable,
    /// Binding cannot be reassigned (a function parameter or loop variable
    /// bound by pattern match).
    Immutable,
}

/// Error returned by `Scope::assign` when assignment fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// Variable exists but is immutable.
    Immutable,
    /// Variable not found in any scope.
    Undefined,
}

impl Mutability {
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// A single-threaded scope wrapper for reference-counted interior mutability.
///
/// All scope allocations go through `LocalScope::new()`, never a bare
/// `Rc::new(RefCell::new(..))`, so it is obvious at every call site that
/// scopes are shared, mutable, and confined to one thread.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A single scope containing variable bindings.
#[derive(Clone, Debug)]
pub struct Scope {
    bindings: FxHashMap<Name, Binding>,
    parent: Option<LocalScope<Scope>>,
}

#[derive(Clone, Debug)]
struct Binding {
    value: Term,
    mutability: Mutability,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: None,
        }
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    #[inline]
    pub fn define(&mut self, name: Name, value: Term, mutability: Mutability) {
        self.bindings.insert(name, Binding { value, mutability });
    }

    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Term> {
        if let Some(binding) = self.bindings.get(&name) {
            return Some(binding.value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }

    #[inline]
    pub fn assign(&mut self, name: Name, value: Term) -> Result<(), AssignError> {
        if let Some(binding) = self.bindings.get_mut(&name) {
            if !binding.mutability.is_mutable() {
                return Err(AssignError::Immutable);
            }
            binding.value = value;
            return Ok(());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow_mut().assign(name, value);
        }
        Err(AssignError::Undefined)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment for the interpreter using a scope stack.
///
/// Instead of cloning environments, a stack of scopes is pushed and
/// popped as blocks and calls are entered and left.
pub struct Environment {
    scopes: Vec<LocalScope<Scope>>,
    global: LocalScope<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// Build an environment whose base scope is a closure's captured
    /// bindings rather than a fresh empty scope.
    ///
    /// Used at call time: `Term::FunctionVal::captures` is a flattened,
    /// already-copied-out snapshot, so the callee runs in a wholly separate
    /// `Environment` rooted in that snapshot and never touches the caller's
    /// own scope stack.
    pub fn from_captures(captures: &FxHashMap<Name, Term>) -> Self {
        let mut base = Scope::new();
        for (name, value) in captures {
            base.define(*name, value.clone(), Mutability::Immutable);
        }
        let global = LocalScope::new(base);
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        let new_scope = LocalScope::new(Scope::with_parent(parent));
        self.scopes.push(new_scope);
    }

    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    #[inline]
    fn current_scope(&self) -> LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global).clone()
    }

    #[inline]
    pub fn define(&mut self, name: Name, value: Term, mutability: Mutability) {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .define(name, value, mutability);
    }

    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Term> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow()
            .lookup(name)
    }

    #[inline]
    pub fn assign(&mut self, name: Name, value: Term) -> Result<(), AssignError> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .assign(name, value)
    }

    pub fn define_global(&mut self, name: Name, value: Term) {
        self.global
            .borrow_mut()
            .define(name, value, Mutability::Immutable);
    }

    /// Create a child environment for function calls that still need the
    /// top-level global bindings (builtins, struct definitions, imports).
    #[must_use]
    pub fn child(&self) -> Self {
        let global = self.global.clone();
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// Flatten every binding visible from the current scope into a single
    /// map, for a closure created at this point in evaluation.
    pub fn capture(&self) -> FxHashMap<Name, Term> {
        fn collect(scope: &Scope, captures: &mut FxHashMap<Name, Term>) {
            for (name, binding) in &scope.bindings {
                captures
                    .entry(*name)
                    .or_insert_with(|| binding.value.clone());
            }
            if let Some(parent) = &scope.parent {
                collect(&parent.borrow(), captures);
            }
        }
        let mut captures = FxHashMap::default();
        collect(&self.current_scope().borrow(), &mut captures);
        captures
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteroid_ir::SharedInterner;

    #[test]
    fn test_scope_define_lookup() {
        let interner = SharedInterner::default();
        let x = interner.intern("x");

        let mut scope = Scope::new();
        scope.define(x, Term::Integer(42), Mutability::Immutable);
        assert_eq!(scope.lookup(x), Some(Term::Integer(42)));
    }

    #[test]
    fn test_scope_shadowing() {
        let interner = SharedInterner::default();
        let x = interner.intern("x");

        let parent = LocalScope::new(Scope::new());
        parent
            .borrow_mut()
            .define(x, Term::Integer(1), Mutability::Immutable);

        let mut child = Scope::with_parent(parent);
        child.define(x, Term::Integer(2), Mutability::Immutable);

        assert_eq!(child.lookup(x), Some(Term::Integer(2)));
    }

    #[test]
    fn test_environment_push_pop() {
        let interner = SharedInterner::default();
        let x = interner.intern("x");

        let mut env = Environment::new();
        env.define(x, Term::Integer(1), Mutability::Immutable);

        env.push_scope();
        env.define(x, Term::Integer(2), Mutability::Immutable);
        assert_eq!(env.lookup(x), Some(Term::Integer(2)));

        env.pop_scope();
        assert_eq!(env.lookup(x), Some(Term::Integer(1)));
    }

    #[test]
    fn test_environment_mutable() {
        let interner = SharedInterner::default();
        let x = interner.intern("x");

        let mut env = Environment::new();
        env.define(x, Term::Integer(1), Mutability::Mutable);
        assert!(env.assign(x, Term::Integer(2)).is_ok());
        assert_eq!(env.lookup(x), Some(Term::Integer(2)));
    }

    #[test]
    fn test_environment_immutable() {
        let interner = SharedInterner::default();
        let x = interner.intern("x");

        let mut env = Environment::new();
        env.define(x, Term::Integer(1), Mutability::Immutable);
        assert!(env.assign(x, Term::Integer(2)).is_err());
    }

    #[test]
    fn test_environment_capture() {
        let interner = SharedInterner::default();
        let x = interner.intern("x");
        let y = interner.intern("y");

        let mut env = Environment::new();
        env.define(x, Term::Integer(1), Mutability::Immutable);
        env.push_scope();
        env.define(y, Term::Integer(2), Mutability::Immutable);

        let captures = env.capture();
        assert_eq!(captures.get(&x), Some(&Term::Integer(1)));
        assert_eq!(captures.get(&y), Some(&Term::Integer(2)));
    }

    #[test]
    fn test_environment_child_preserves_global_bindings() {
        let interner = SharedInterner::default();
        let x = interner.intern("x");
        let y = interner.intern("y");

        let mut env = Environment::new();
        env.define_global(x, Term::Integer(42));
        env.define_global(y, Term::string("hello"));

        let child = env.child();

        assert_eq!(child.lookup(x), Some(Term::Integer(42)));
        assert_eq!(child.lookup(y), Some(Term::string("hello")));
    }

    #[test]
    fn test_environment_from_captures_is_isolated_from_caller_scope() {
        let interner = SharedInterner::default();
        let x = interner.intern("x");
        let y = interner.intern("y");

        let mut caller = Environment::new();
        caller.define(x, Term::Integer(1), Mutability::Mutable);

        let mut captures = FxHashMap::default();
        captures.insert(x, Term::Integer(99));
        let mut callee = Environment::from_captures(&captures);
        callee.define(y, Term::Integer(2), Mutability::Immutable);

        callee.assign(x, Term::Integer(100)).unwrap();
        assert_eq!(caller.lookup(x), Some(Term::Integer(1)));
        assert_eq!(callee.lookup(y), Some(Term::Integer(2)));
    }
}
