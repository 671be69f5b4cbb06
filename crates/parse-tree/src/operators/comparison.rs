//! Comparison operators: `=`, `!=`, `>`, `<`, `>=`, `<=`.

use crate::value::Value;
use std::cmp::Ordering;

/// Loose equality, or a truthy left side compared against the text `true`.
///
/// The second clause lets a flag-like left operand match the literal
/// `true` written in an expression (`enabled = true` where `true` arrives
/// as text).
pub fn equals(l: &Value, r: &Value) -> Value {
    Value::Bool(l.loose_eq(r) || (l.truthy() && r.loose_eq(&Value::from("true"))))
}

pub fn not_equals(l: &Value, r: &Value) -> Value {
    Value::Bool(!l.loose_eq(r))
}

pub fn greater(l: &Value, r: &Value) -> Value {
    Value::Bool(l.compare(r) == Some(Ordering::Greater))
}

pub fn less(l: &Value, r: &Value) -> Value {
    Value::Bool(l.compare(r) == Some(Ordering::Less))
}

pub fn greater_or_equal(l: &Value, r: &Value) -> Value {
    Value::Bool(matches!(
        l.compare(r),
        Some(Ordering::Greater | Ordering::Equal)
    ))
}

pub fn less_or_equal(l: &Value, r: &Value) -> Value {
    Value::Bool(matches!(l.compare(r), Some(Ordering::Less | Ordering::Equal)))
}
