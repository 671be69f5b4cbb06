//! Logical operators: `&`, `|` and the prefix `!`.
//!
//! `&` and `|` return one of their operands rather than a boolean.

use crate::value::Value;

pub fn and(l: &Value, r: &Value) -> Value {
    if l.truthy() {
        r.clone()
    } else {
        l.clone()
    }
}

pub fn or(l: &Value, r: &Value) -> Value {
    if l.truthy() {
        l.clone()
    } else {
        r.clone()
    }
}

/// Logical not. The text `false` counts as false.
pub fn not(operand: &Value) -> Value {
    match operand {
        Value::String(s) if s == "false" => Value::Bool(true),
        _ => Value::Bool(!operand.truthy()),
    }
}
