//! Asteroid IR - interned names and source locations.
//!
//! This crate holds the small set of types shared by every other Asteroid
//! crate: interned identifiers ([`Name`]), the string table that backs them
//! ([`StringInterner`]), and the two notions of "where in the source" the
//! evaluator cares about ([`Span`] for expression-level diagnostics,
//! [`SourceLoc`] for the file/line granularity the call machinery and
//! redundancy checker use).
//!
//! The abstract syntax tree itself is not defined here: Asteroid's evaluator
//! treats the AST as an opaque term tree handed to it from the outside (see
//! `asteroid_patterns::Term`), so there is no parser-facing `Expr`/`ExprArena`
//! pair to own in this crate the way a full compiler would have one.
//!
//! # Design Philosophy
//!
//! - **Intern identifiers**: variable names, struct ids, and member names
//!   become `Name(u32)` rather than `String`, so binding lookups and pattern
//!   comparisons are integer operations.
//! - **Interface segregation**: `StringLookup` lets downstream crates accept
//!   "anything that can resolve a `Name`" without depending on the concrete
//!   interner.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
mod span;

pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use span::{SourceLoc, Span, SpanError};
