//! Arithmetic operators: `*`, `/`, `+`, `-` and the numeric prefixes `+x`, `-x`.
//!
//! Operands are coerced with [`Value::to_number`]; division by zero follows
//! IEEE 754 and yields an infinity or `NaN`.

use crate::value::Value;

pub fn multiply(l: &Value, r: &Value) -> Value {
    Value::Number(l.to_number() * r.to_number())
}

pub fn divide(l: &Value, r: &Value) -> Value {
    Value::Number(l.to_number() / r.to_number())
}

pub fn add(l: &Value, r: &Value) -> Value {
    Value::Number(l.to_number() + r.to_number())
}

/// Numeric difference. A list on the left instead loses every element
/// loosely equal to `r`.
pub fn subtract(l: &Value, r: &Value) -> Value {
    match l {
        Value::List(items) => Value::List(
            items
                .iter()
                .filter(|item| !item.loose_eq(r))
                .cloned()
                .collect(),
        ),
        _ => Value::Number(l.to_number() - r.to_number()),
    }
}

pub fn to_number(operand: &Value) -> Value {
    Value::Number(operand.to_number())
}

/// Negation. Zero negates to `-0`, which keeps the sign of `-0.5` when
/// `.` later joins the digits.
pub fn negate(operand: &Value) -> Value {
    Value::Number(-operand.to_number())
}
