//! The term tree: the single representation Asteroid uses for parsed
//! programs, patterns, and runtime values alike.
//!
//! A function clause's left-hand side is a `Term` used as a pattern, its
//! right-hand side is a `Term` evaluated for effect, and the value that
//! results from evaluating an expression is, again, a `Term` — there is no
//! separate `Value` type the way a typed language would need one. This
//! mirrors the closed tagged-variant shape used for runtime values
//! elsewhere in this codebase, just widened to also cover the handful of
//! statement and pattern-only tags a dynamically-typed, pattern-driven
//! language needs.
//!
//! Two variants carry observable identity ([`List`](Term::List) and
//! [`Object`](Term::Object)) and are heap-allocated through [`Heap`];
//! everything else is a plain value clone.

use std::fmt;
use std::rc::Rc;

use asteroid_ir::{Name, SourceLoc};
use rustc_hash::FxHashMap;

use crate::heap::Heap;

/// One `pattern -> body` clause of a (possibly multi-clause) function.
#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub pattern: Term,
    pub body: Term,
    pub loc: SourceLoc,
}

/// A closed-over function value: clauses plus a flattened snapshot of the
/// bindings visible where the function was defined.
///
/// `captures` is a plain map rather than a live reference to the defining
/// scope, so `Term` never needs to know about `asteroid_eval::Environment`.
/// Calling the function means building a fresh environment rooted in this
/// map, not reopening the original one.
#[derive(Clone, Debug)]
pub struct FunctionVal {
    pub name: Name,
    pub clauses: Rc<Vec<Clause>>,
    pub captures: Rc<FxHashMap<Name, Term>>,
    /// Set for a method pulled off an object: the receiver bound to `this`
    /// at call time instead of being part of the capture map.
    pub is_method: bool,
}

impl PartialEq for FunctionVal {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.clauses, &other.clauses) && self.name == other.name
    }
}

/// The shape of a struct: its declared member names in declaration order,
/// plus the multi-clause method table attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct StructLayout {
    pub name: Name,
    pub members: Vec<Name>,
    pub methods: FxHashMap<Name, FunctionVal>,
}

/// A live struct instance: one [`Term`] per declared member, in the same
/// order as the layout's `members`.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectVal {
    pub layout: Rc<StructLayout>,
    pub members: Vec<Term>,
}

impl ObjectVal {
    pub fn member(&self, name: Name) -> Option<&Term> {
        let idx = self.layout.members.iter().position(|m| *m == name)?;
        self.members.get(idx)
    }

    pub fn member_mut(&mut self, name: Name) -> Option<&mut Term> {
        let idx = self.layout.members.iter().position(|m| *m == name)?;
        self.members.get_mut(idx)
    }
}

/// The term tree.
///
/// Grouped below by role, though the boundaries are soft: an `Id` pattern
/// and an `Id` expression are the same variant, distinguished only by
/// whether the unifier is in matching or subsuming mode and by which side
/// of a clause it appears on.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    // --- scalars ---
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Str(Rc<str>),
    NoneVal,

    // --- aggregates ---
    /// A mutable, identity-bearing sequence.
    List(Heap<Vec<Term>>),
    /// An immutable fixed-size sequence.
    Tuple(Rc<[Term]>),

    // --- identifiers and access ---
    Id(Name),
    Index(Box<Term>, Box<Term>),
    /// Member access, `obj.name`.
    Member(Box<Term>, Name),
    Apply(Box<Term>, Box<Term>),

    // --- functions and structs ---
    FunctionVal(Rc<FunctionVal>),
    /// A parsed function literal, not yet closed over: `name` is the
    /// function's own name if bound with `let`/`unify` (used for
    /// recursion and error messages), `None` for an anonymous lambda.
    /// Evaluating this captures the current scope into a `FunctionVal`;
    /// it should never itself reach the evaluator already inside a
    /// `FunctionVal`'s body.
    FunctionExp(Option<Name>, Rc<Vec<Clause>>),
    Struct(Rc<StructLayout>),
    Object(Heap<ObjectVal>),

    // --- pattern-only tags ---
    /// `head | tail`: matches a non-empty list, binding `head` to the
    /// first element and `tail` to the remainder.
    HeadTail(Box<Term>, Box<Term>),
    /// `name @ pattern`: binds the whole matched term to `name` in
    /// addition to matching `pattern` against it.
    NamedPattern(Name, Box<Term>),
    /// `%typename`: matches any term of the given runtime type.
    Typematch(Name),
    /// `pattern %constraint condition`: matches `pattern` and additionally
    /// requires `condition` to evaluate true with its bindings in scope.
    Constraint(Box<Term>, Box<Term>),
    /// An explicit `pattern ...` expression wrapper, used on the
    /// right-hand side of a `let`/`unify`/`try`-catch to reinterpret an
    /// already-built term as a pattern rather than a value to compare.
    QuotedPattern(Box<Term>),

    // --- expressions ---
    IfExp(Box<Term>, Box<Term>, Box<Term>),
    /// `term is pattern`: test-only unification; on success, bindings are
    /// installed and the expression evaluates to `true`, otherwise `false`
    /// with no bindings.
    IsExp(Box<Term>, Box<Term>),
    /// `term in list`: structural membership test.
    InExp(Box<Term>, Box<Term>),
    /// `start to stop [step stride]`: an inclusive integer range,
    /// eagerly expanded into a list.
    ToList {
        start: Box<Term>,
        stop: Box<Term>,
        stride: Box<Term>,
    },
    /// `*expr`: evaluate `expr` at pattern-match time to obtain a
    /// concrete term to unify against, rather than treating it as a
    /// binding occurrence.
    Deref(Box<Term>),
    /// A reference to a built-in operator or library function by its
    /// interned name (e.g. `__plus__`), resolved through the prelude
    /// registry rather than user-defined bindings.
    Foreign(Name),

    // --- statements ---
    Block(Rc<Vec<Term>>),
    Global(Vec<Name>),
    Assert(Box<Term>, SourceLoc),
    /// `pattern = value`: unify `pattern` against the evaluated `value`,
    /// binding free variables in the enclosing scope.
    UnifyStmt(Box<Term>, Box<Term>, SourceLoc),
    Return(Box<Term>),
    Break,
    Throw(Box<Term>, SourceLoc),
    Try {
        body: Box<Term>,
        catches: Vec<(Term, Term)>,
    },
    While(Box<Term>, Box<Term>),
    Repeat(Box<Term>, Box<Term>),
    For {
        pattern: Box<Term>,
        iterable: Box<Term>,
        body: Box<Term>,
    },
    IfStmt(Vec<(Term, Term)>, Option<Box<Term>>),
    StructDef(Rc<StructLayout>),
}

impl Term {
    pub fn list(items: Vec<Term>) -> Term {
        Term::List(Heap::new(items))
    }

    pub fn tuple(items: Vec<Term>) -> Term {
        Term::Tuple(items.into())
    }

    pub fn string(s: impl Into<Rc<str>>) -> Term {
        Term::Str(s.into())
    }

    pub fn object(layout: Rc<StructLayout>, members: Vec<Term>) -> Term {
        Term::Object(Heap::new(ObjectVal { layout, members }))
    }

    /// Build the built-in `Exception(kind, message)` object raised for
    /// internal evaluation failures, the same shape a `catch` pattern
    /// unifies against.
    pub fn object_exception(kind: &str, message: &str) -> Term {
        let layout = Rc::new(StructLayout {
            name: Name::EMPTY,
            members: Vec::new(),
            methods: FxHashMap::default(),
        });
        Term::object(
            layout,
            vec![Term::string(kind), Term::string(message)],
        )
    }

    /// The runtime type name as Asteroid programs see it (for
    /// `%typename` matching and error messages).
    pub fn type_name(&self) -> &'static str {
        match self {
            Term::Integer(_) => "integer",
            Term::Real(_) => "real",
            Term::Boolean(_) => "boolean",
            Term::Str(_) => "string",
            Term::NoneVal => "none",
            Term::List(_) => "list",
            Term::Tuple(_) => "tuple",
            Term::FunctionVal(_) | Term::FunctionExp(..) => "function",
            Term::Struct(_) => "struct",
            Term::Object(_) => "object",
            Term::Id(_) => "id",
            _ => "term",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Term::Boolean(b) => *b,
            Term::NoneVal => false,
            Term::Integer(i) => *i != 0,
            _ => true,
        }
    }

    /// Structural equality for `__eq__`: two lists/objects compare by
    /// contents, not by identity. [`PartialEq`] on `Term` already does
    /// this (see `Heap`'s `PartialEq`, which borrows and compares
    /// contents), so this is just a readable alias at call sites.
    pub fn structurally_eq(&self, other: &Term) -> bool {
        self == other
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Integer(i) => write!(f, "{i}"),
            Term::Real(r) => write!(f, "{r}"),
            Term::Boolean(b) => write!(f, "{b}"),
            Term::Str(s) => write!(f, "{s}"),
            Term::NoneVal => write!(f, "none"),
            Term::List(items) => {
                write!(f, "[")?;
                for (i, t) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, "]")
            }
            Term::Tuple(items) => {
                write!(f, "(")?;
                for (i, t) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, ")")
            }
            Term::FunctionVal(fv) => write!(f, "<function {:?}>", fv.name),
            Term::FunctionExp(name, _) => write!(f, "<function expression {name:?}>"),
            Term::Struct(s) => write!(f, "<struct {:?}>", s.name),
            Term::Object(o) => write!(f, "<object {:?}>", o.borrow().layout.name),
            _ => write!(f, "<term>"),
        }
    }
}
