//! Built-in member functions on lists and strings.
//!
//! Asteroid's lists and strings carry a small set of built-in methods
//! (`lst.length()`, `s.toupper()`, and so on) that are not expressible as
//! user-defined struct methods because there is no struct backing a list
//! or a string. Dispatch is a name lookup against these two fixed tables
//! rather than the general member-function mechanism used for structs.

use asteroid_patterns::{arity_mismatch, not_callable, system_error, EvalResult, Heap, Term};

/// Dispatch a built-in list method. Returns `None` if `method` does not
/// name one, so the caller can fall through to a "no such method" error
/// with full context.
pub fn dispatch_list_method(receiver: &Heap<Vec<Term>>, method: &str, args: &[Term]) -> Option<EvalResult> {
    Some(match method {
        "length" => {
            if !args.is_empty() {
                return Some(Err(arity_mismatch(0, args.len())));
            }
            Ok(Term::Integer(receiver.borrow().len() as i64))
        }
        "append" => {
            if args.len() != 1 {
                return Some(Err(arity_mismatch(1, args.len())));
            }
            receiver.borrow_mut().push(args[0].clone());
            Ok(Term::NoneVal)
        }
        "reverse" => {
            if !args.is_empty() {
                return Some(Err(arity_mismatch(0, args.len())));
            }
            let mut items = receiver.borrow().clone();
            items.reverse();
            Ok(Term::list(items))
        }
        "pop" => {
            if !args.is_empty() {
                return Some(Err(arity_mismatch(0, args.len())));
            }
            match receiver.borrow_mut().pop() {
                Some(v) => Ok(v),
                None => Err(system_error("pop from an empty list")),
            }
        }
        _ => return None,
    })
}

/// Dispatch a built-in string method.
pub fn dispatch_string_method(receiver: &str, method: &str, args: &[Term]) -> Option<EvalResult> {
    Some(match method {
        "length" => {
            if !args.is_empty() {
                return Some(Err(arity_mismatch(0, args.len())));
            }
            Ok(Term::Integer(receiver.chars().count() as i64))
        }
        "toupper" => {
            if !args.is_empty() {
                return Some(Err(arity_mismatch(0, args.len())));
            }
            Ok(Term::string(receiver.to_uppercase()))
        }
        "tolower" => {
            if !args.is_empty() {
                return Some(Err(arity_mismatch(0, args.len())));
            }
            Ok(Term::string(receiver.to_lowercase()))
        }
        "explode" => {
            if !args.is_empty() {
                return Some(Err(arity_mismatch(0, args.len())));
            }
            let chars = receiver
                .chars()
                .map(|c| Term::string(c.to_string()))
                .collect();
            Ok(Term::list(chars))
        }
        "trim" => {
            if !args.is_empty() {
                return Some(Err(arity_mismatch(0, args.len())));
            }
            Ok(Term::string(receiver.trim()))
        }
        _ => return None,
    })
}

/// Dispatch a built-in method by the receiver's runtime type.
pub fn dispatch_builtin_method(receiver: &Term, method: &str, args: &[Term]) -> Option<EvalResult> {
    match receiver {
        Term::List(items) => dispatch_list_method(items, method, args),
        Term::Str(s) => dispatch_string_method(s, method, args),
        _ => Some(Err(not_callable(receiver.type_name()))),
    }
}
