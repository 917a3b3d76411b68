//! Built-in operator dispatch.
//!
//! Asteroid desugars every infix and prefix operator into a call of a
//! fixed, interned operator symbol (`__plus__`, `__uminus__`, and so on —
//! see [`BinOp::from_name`]/[`UnOp::from_name`]). The operator set is not
//! user-extensible, so direct enum-based dispatch is preferred over a
//! method-lookup table: it is exhaustively checked and avoids a hash
//! lookup on every arithmetic expression.
//!
//! Type promotion follows the usual dynamically-typed-language rule: an
//! integer operand is promoted to real whenever its partner is real, and
//! every other type combination is a hard error rather than a silent
//! coercion.

use asteroid_ir::Name;
use asteroid_patterns::{invalid_binary_op, invalid_unary_op, division_by_zero, EvalResult, Term};

/// One of the twelve built-in binary operator symbols.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinOp {
    Plus,
    Minus,
    Times,
    Divide,
    Or,
    And,
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,
}

/// One of the three built-in unary operator symbols.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnOp {
    UMinus,
    UPlus,
    Not,
}

impl BinOp {
    /// Resolve an interned operator symbol (e.g. the name behind
    /// `__plus__`) to a `BinOp`, if it names one of the fixed twelve.
    pub fn from_name(name: Name, lookup: impl Fn(Name) -> &'static str) -> Option<BinOp> {
        Some(match lookup(name) {
            "__plus__" => BinOp::Plus,
            "__minus__" => BinOp::Minus,
            "__times__" => BinOp::Times,
            "__divide__" => BinOp::Divide,
            "__or__" => BinOp::Or,
            "__and__" => BinOp::And,
            "__eq__" => BinOp::Eq,
            "__ne__" => BinOp::Ne,
            "__le__" => BinOp::Le,
            "__lt__" => BinOp::Lt,
            "__ge__" => BinOp::Ge,
            "__gt__" => BinOp::Gt,
            _ => return None,
        })
    }
}

impl UnOp {
    pub fn from_name(name: Name, lookup: impl Fn(Name) -> &'static str) -> Option<UnOp> {
        Some(match lookup(name) {
            "__uminus__" => UnOp::UMinus,
            "__uplus__" => UnOp::UPlus,
            "__not__" => UnOp::Not,
            _ => return None,
        })
    }
}

/// Evaluate a binary operation by direct pattern matching on the operand
/// types.
pub fn evaluate_binary(left: &Term, right: &Term, op: BinOp) -> EvalResult {
    use Term::{Boolean, Integer, Real, Str};

    match (left, right) {
        (Integer(a), Integer(b)) => eval_int_binary(*a, *b, op),
        (Real(a), Real(b)) => eval_real_binary(*a, *b, op),
        (Integer(a), Real(b)) => eval_real_binary(*a as f64, *b, op),
        (Real(a), Integer(b)) => eval_real_binary(*a, *b as f64, op),
        (Boolean(a), Boolean(b)) => eval_bool_binary(*a, *b, op),
        (Str(a), Str(b)) => eval_string_binary(a, b, op),
        (Term::List(a), Term::List(b)) => eval_list_binary(a, b, op),
        _ => match op {
            // Structural equality is defined between any two terms.
            BinOp::Eq => Ok(Term::Boolean(left == right)),
            BinOp::Ne => Ok(Term::Boolean(left != right)),
            _ => Err(invalid_binary_op(
                op_symbol(op),
                left.type_name(),
                right.type_name(),
            )),
        },
    }
}

fn eval_int_binary(a: i64, b: i64, op: BinOp) -> EvalResult {
    match op {
        BinOp::Plus => Ok(Term::Integer(a.wrapping_add(b))),
        BinOp::Minus => Ok(Term::Integer(a.wrapping_sub(b))),
        BinOp::Times => Ok(Term::Integer(a.wrapping_mul(b))),
        // `__divide__` is true division: integer operands promote to
        // real rather than truncating, matching the operator's name.
        BinOp::Divide => {
            if b == 0 {
                Err(division_by_zero())
            } else {
                Ok(Term::Real(a as f64 / b as f64))
            }
        }
        BinOp::Eq => Ok(Term::Boolean(a == b)),
        BinOp::Ne => Ok(Term::Boolean(a != b)),
        BinOp::Lt => Ok(Term::Boolean(a < b)),
        BinOp::Le => Ok(Term::Boolean(a <= b)),
        BinOp::Gt => Ok(Term::Boolean(a > b)),
        BinOp::Ge => Ok(Term::Boolean(a >= b)),
        BinOp::Or | BinOp::And => Err(invalid_binary_op(op_symbol(op), "integer", "integer")),
    }
}

fn eval_real_binary(a: f64, b: f64, op: BinOp) -> EvalResult {
    match op {
        BinOp::Plus => Ok(Term::Real(a + b)),
        BinOp::Minus => Ok(Term::Real(a - b)),
        BinOp::Times => Ok(Term::Real(a * b)),
        BinOp::Divide => {
            if b == 0.0 {
                Err(division_by_zero())
            } else {
                Ok(Term::Real(a / b))
            }
        }
        BinOp::Eq => Ok(Term::Boolean(a == b)),
        BinOp::Ne => Ok(Term::Boolean(a != b)),
        BinOp::Lt => Ok(Term::Boolean(a < b)),
        BinOp::Le => Ok(Term::Boolean(a <= b)),
        BinOp::Gt => Ok(Term::Boolean(a > b)),
        BinOp::Ge => Ok(Term::Boolean(a >= b)),
        BinOp::Or | BinOp::And => Err(invalid_binary_op(op_symbol(op), "real", "real")),
    }
}

fn eval_bool_binary(a: bool, b: bool, op: BinOp) -> EvalResult {
    match op {
        BinOp::And => Ok(Term::Boolean(a && b)),
        BinOp::Or => Ok(Term::Boolean(a || b)),
        BinOp::Eq => Ok(Term::Boolean(a == b)),
        BinOp::Ne => Ok(Term::Boolean(a != b)),
        _ => Err(invalid_binary_op(op_symbol(op), "boolean", "boolean")),
    }
}

fn eval_string_binary(a: &str, b: &str, op: BinOp) -> EvalResult {
    match op {
        BinOp::Plus => Ok(Term::string(format!("{a}{b}"))),
        BinOp::Eq => Ok(Term::Boolean(a == b)),
        BinOp::Ne => Ok(Term::Boolean(a != b)),
        BinOp::Lt => Ok(Term::Boolean(a < b)),
        BinOp::Le => Ok(Term::Boolean(a <= b)),
        BinOp::Gt => Ok(Term::Boolean(a > b)),
        BinOp::Ge => Ok(Term::Boolean(a >= b)),
        _ => Err(invalid_binary_op(op_symbol(op), "string", "string")),
    }
}

fn eval_list_binary(a: &asteroid_patterns::Heap<Vec<Term>>, b: &asteroid_patterns::Heap<Vec<Term>>, op: BinOp) -> EvalResult {
    match op {
        BinOp::Plus => {
            let mut result = a.borrow().clone();
            result.extend(b.borrow().iter().cloned());
            Ok(Term::list(result))
        }
        BinOp::Eq => Ok(Term::Boolean(*a.borrow() == *b.borrow())),
        BinOp::Ne => Ok(Term::Boolean(*a.borrow() != *b.borrow())),
        _ => Err(invalid_binary_op(op_symbol(op), "list", "list")),
    }
}

/// Evaluate a unary operation.
pub fn evaluate_unary(operand: &Term, op: UnOp) -> EvalResult {
    match (op, operand) {
        (UnOp::UMinus, Term::Integer(i)) => Ok(Term::Integer(-i)),
        (UnOp::UMinus, Term::Real(r)) => Ok(Term::Real(-r)),
        (UnOp::UPlus, Term::Integer(_) | Term::Real(_)) => Ok(operand.clone()),
        (UnOp::Not, Term::Boolean(b)) => Ok(Term::Boolean(!b)),
        _ => Err(invalid_unary_op(unary_symbol(op), operand.type_name())),
    }
}

fn op_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Plus => "__plus__",
        BinOp::Minus => "__minus__",
        BinOp::Times => "__times__",
        BinOp::Divide => "__divide__",
        BinOp::Or => "__or__",
        BinOp::And => "__and__",
        BinOp::Eq => "__eq__",
        BinOp::Ne => "__ne__",
        BinOp::Le => "__le__",
        BinOp::Lt => "__lt__",
        BinOp::Ge => "__ge__",
        BinOp::Gt => "__gt__",
    }
}

fn unary_symbol(op: UnOp) -> &'static str {
    match op {
        UnOp::UMinus => "__uminus__",
        UnOp::UPlus => "__uplus__",
        UnOp::Not => "__not__",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_addition() {
        let r = evaluate_binary(&Term::Integer(2), &Term::Integer(3), BinOp::Plus).unwrap();
        assert_eq!(r, Term::Integer(5));
    }

    #[test]
    fn integer_division_promotes_to_real() {
        let r = evaluate_binary(&Term::Integer(7), &Term::Integer(2), BinOp::Divide).unwrap();
        assert_eq!(r, Term::Real(3.5));
    }

    #[test]
    fn division_by_zero_is_an_arithmetic_error() {
        let err = evaluate_binary(&Term::Integer(1), &Term::Integer(0), BinOp::Divide).unwrap_err();
        assert_eq!(err.kind, asteroid_patterns::ExceptionKind::ArithmeticError);
    }

    #[test]
    fn mixed_integer_real_promotes_to_real() {
        let r = evaluate_binary(&Term::Integer(1), &Term::Real(0.5), BinOp::Plus).unwrap();
        assert_eq!(r, Term::Real(1.5));
    }

    #[test]
    fn string_concatenation() {
        let r = evaluate_binary(&Term::string("a"), &Term::string("b"), BinOp::Plus).unwrap();
        assert_eq!(r, Term::string("ab"));
    }

    #[test]
    fn list_concatenation_does_not_alias_operands() {
        let a = Term::list(vec![Term::Integer(1)]);
        let b = Term::list(vec![Term::Integer(2)]);
        let r = evaluate_binary(&a, &b, BinOp::Plus).unwrap();
        assert_eq!(r, Term::list(vec![Term::Integer(1), Term::Integer(2)]));
        if let Term::List(h) = &a {
            assert_eq!(h.borrow().len(), 1);
        }
    }

    #[test]
    fn structural_equality_across_mismatched_types_is_false_not_an_error() {
        let r = evaluate_binary(&Term::Integer(1), &Term::string("1"), BinOp::Eq).unwrap();
        assert_eq!(r, Term::Boolean(false));
    }

    #[test]
    fn unary_not() {
        assert_eq!(
            evaluate_unary(&Term::Boolean(true), UnOp::Not).unwrap(),
            Term::Boolean(false)
        );
    }

    #[test]
    fn unary_minus_on_boolean_is_an_error() {
        assert!(evaluate_unary(&Term::Boolean(true), UnOp::UMinus).is_err());
    }
}
