//! Lookup and collection operators: `.`, `@`, `in`, `,` and the prefix `sl`.

use crate::value::{parse_number, Value};

/// Joins two operands as the integer and fractional digits of a decimal
/// number when that forms a number (`1` and `5` give `1.5`). Otherwise looks
/// up `r` as a property of `l`, see [`Value::get`].
pub fn dot(l: &Value, r: &Value) -> Value {
    let whole = match l {
        Value::Number(n) if *n == 0.0 && n.is_sign_negative() => "-0".to_string(),
        _ => l.to_string(),
    };
    let n = parse_number(&format!("{whole}.{r}"));
    if n.is_nan() {
        l.get(r)
    } else {
        Value::Number(n)
    }
}

/// Concatenation: a list gains `r` (spliced when `r` is a list), a string
/// gains the text of `r`. Other left operands have nothing to extend.
pub fn concat(l: &Value, r: &Value) -> Value {
    match l {
        Value::List(items) => {
            let mut out = items.clone();
            append(&mut out, r);
            Value::List(out)
        }
        Value::String(s) => Value::String(format!("{s}{r}")),
        _ => Value::Absent,
    }
}

/// Membership: strict element equality for lists, key presence for maps.
pub fn contains(l: &Value, r: &Value) -> Value {
    Value::Bool(match r {
        Value::List(items) => items.iter().any(|item| item.strict_eq(l)),
        Value::Map(map) => map.contains_key(&l.to_string()),
        _ => false,
    })
}

/// `[l]` followed by `r`, spliced when `r` is a list, so `a,b,c` is a
/// three-element list.
pub fn cons(l: &Value, r: &Value) -> Value {
    let mut out = vec![l.clone()];
    append(&mut out, r);
    Value::List(out)
}

pub fn singleton(operand: &Value) -> Value {
    Value::List(vec![operand.clone()])
}

fn append(out: &mut Vec<Value>, r: &Value) {
    match r {
        Value::List(items) => out.extend(items.iter().cloned()),
        other => out.push(other.clone()),
    }
}
