//! The built-in operator set.
//!
//! Binary operators are listed tightest first; a caller's own binary
//! operators are appended after them and bind more loosely.
//!
//! | #  | Token | Meaning                                  | Folds |
//! |----|-------|------------------------------------------|-------|
//! | 1  | `.`   | decimal join or property lookup          | no    |
//! | 2  | `*`   | product                                  | yes   |
//! | 3  | `/`   | quotient                                 | yes   |
//! | 4  | `+`   | sum                                      | yes   |
//! | 5  | `-`   | difference, or list without `r`          | yes   |
//! | 6  | `^`   | text concatenation                       | yes   |
//! | 7  | `@`   | list or text concatenation               | yes   |
//! | 8  | `in`  | membership                               | yes   |
//! | 9  | `=`   | equality (or truthy vs. `true`)          | yes   |
//! | 10 | `!=`  | inequality                               | yes   |
//! | 11 | `>`   |                                          | yes   |
//! | 12 | `<`   |                                          | yes   |
//! | 13 | `>=`  |                                          | yes   |
//! | 14 | `<=`  |                                          | yes   |
//! | 15 | `&`   | `l` when falsy, else `r`                 | yes   |
//! | 16 | `\|`  | `l` when truthy, else `r`                | yes   |
//! | 17 | `,`   | list building                            | yes   |
//!
//! Unary: `!`, `+`, `-`, `sl` (one-element list), `JSON`.
//! Constants: `false`, `true`, `null`, `undefined`.

pub mod arithmetic;
pub mod collection;
pub mod comparison;
pub mod logical;
pub mod string;

use crate::types::Operator;
use crate::value::Value;

pub fn binary<C: ?Sized>() -> Vec<Operator<C>> {
    vec![
        Operator::binary(".", |_, l, r, _| collection::dot(l, r)),
        Operator::binary("*", |_, l, r, _| arithmetic::multiply(l, r)).foldable(true),
        Operator::binary("/", |_, l, r, _| arithmetic::divide(l, r)).foldable(true),
        Operator::binary("+", |_, l, r, _| arithmetic::add(l, r)).foldable(true),
        Operator::binary("-", |_, l, r, _| arithmetic::subtract(l, r)).foldable(true),
        Operator::binary("^", |_, l, r, _| string::join(l, r)).foldable(true),
        Operator::binary("@", |_, l, r, _| collection::concat(l, r)).foldable(true),
        Operator::binary("in", |_, l, r, _| collection::contains(l, r)).foldable(true),
        Operator::binary("=", |_, l, r, _| comparison::equals(l, r)).foldable(true),
        Operator::binary("!=", |_, l, r, _| comparison::not_equals(l, r)).foldable(true),
        Operator::binary(">", |_, l, r, _| comparison::greater(l, r)).foldable(true),
        Operator::binary("<", |_, l, r, _| comparison::less(l, r)).foldable(true),
        Operator::binary(">=", |_, l, r, _| comparison::greater_or_equal(l, r)).foldable(true),
        Operator::binary("<=", |_, l, r, _| comparison::less_or_equal(l, r)).foldable(true),
        Operator::binary("&", |_, l, r, _| logical::and(l, r)).foldable(true),
        Operator::binary("|", |_, l, r, _| logical::or(l, r)).foldable(true),
        Operator::binary(",", |_, l, r, _| collection::cons(l, r)).foldable(true),
    ]
}

pub fn unary<C: ?Sized>() -> Vec<Operator<C>> {
    vec![
        Operator::unary("!", |_, v, _| logical::not(v)).foldable(true),
        Operator::unary("+", |_, v, _| arithmetic::to_number(v)).foldable(true),
        Operator::unary("-", |_, v, _| arithmetic::negate(v)).foldable(true),
        Operator::unary("sl", |_, v, _| collection::singleton(v)).foldable(true),
        Operator::unary("JSON", |_, v, _| string::parse_json(v)).foldable(true),
    ]
}

pub fn constants<C: ?Sized>() -> Vec<Operator<C>> {
    vec![
        Operator::constant("false", |_, _| Value::Bool(false)).foldable(true),
        Operator::constant("true", |_, _| Value::Bool(true)).foldable(true),
        Operator::constant("null", |_, _| Value::Null).foldable(true),
        Operator::constant("undefined", |_, _| Value::Absent).foldable(true),
    ]
}
