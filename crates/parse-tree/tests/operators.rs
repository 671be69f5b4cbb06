//! Integration tests for the built-in operators.

use parse_tree::{Compiler, Value};
use serde_json::json;

fn check(text: &str, expected: impl Into<Value>) {
    let compiler: Compiler = Compiler::default();
    let tree = compiler
        .compile(text)
        .unwrap_or_else(|e| panic!("compile({text:?}) failed: {e}"));
    assert_eq!(tree.eval(None), expected.into(), "expression: {text:?}");
}

fn list(items: &[f64]) -> Value {
    Value::List(items.iter().copied().map(Value::Number).collect())
}

// ---------------------------------------------------------------- Arithmetic

#[test]
fn test_arithmetic() {
    check("6 * 7", 42);
    check("7 / 2", 3.5);
    check("1 / 0", f64::INFINITY);
    check("'2' + '3'", 5);
    check("5 - 8", -3);
    check("x * 2", f64::NAN);
    check("true + true", 2);
    check("null + 1", 1);
}

#[test]
fn test_subtract_from_list() {
    check("(1, 2, 3) - 2", list(&[1.0, 3.0]));
    check("(1, '1', 2) - 1", list(&[2.0]));
}

// ---------------------------------------------------------------------- Text

#[test]
fn test_join() {
    check("'a' ^ 1", "a1");
    check("1 ^ 2", "12");
    check("(1, 2) ^ '!'", "1,2!");
}

#[test]
fn test_concat() {
    check("(1, 2) @ 3", list(&[1.0, 2.0, 3.0]));
    check("(1, 2) @ (3, 4)", list(&[1.0, 2.0, 3.0, 4.0]));
    check("'ab' @ 'c'", "abc");
    check("1 @ 2", Value::Absent);
}

#[test]
fn test_json() {
    check("JSON '[1, 2]'", list(&[1.0, 2.0]));
    check(
        "JSON '{\"a\": {\"b\": true}}'",
        json!({"a": {"b": true}}),
    );
    check("JSON '{oops'", json!({}));
}

// ------------------------------------------------------------------- Lookups

#[test]
fn test_dot_lookup() {
    check("(JSON '{\"a\": 3}').a", 3);
    check("(1, 2, 3).length", 3);
    check("(5, 6).1", 6);
    check("abc.length", 3);
    check("(JSON '{}').missing", Value::Absent);
    check("undefined.x", Value::Absent);
}

#[test]
fn test_membership() {
    check("2 in (1, 2)", true);
    check("'2' in (1, 2)", false);
    check("a in (JSON '{\"a\": 1}')", true);
    check("b in (JSON '{\"a\": 1}')", false);
    check("a in abc", false);
}

// ---------------------------------------------------------------- Comparison

#[test]
fn test_equality() {
    check("1 = 1", true);
    check("1 = '1'", true);
    check("1 = 2", false);
    check("yes = 'true'", true);
    check("0 = 'true'", false);
    check("null = undefined", true);
    check("1 != 2", true);
    check("1 != '1'", false);
}

#[test]
fn test_ordering() {
    check("2 > 1", true);
    check("'b' > 'a'", true);
    check("'10' < '9'", true);
    check("10 < 9", false);
    check("2 >= 2", true);
    check("3 <= 2", false);
    check("x < 1", false);
    check("x >= 1", false);
}

// ------------------------------------------------------------------- Logical

#[test]
fn test_and_or() {
    check("0 & 5", 0);
    check("1 & 5", 5);
    check("0 | 5", 5);
    check("'' | 'd'", "d");
    check("'c' | 'd'", "c");
}

#[test]
fn test_not() {
    check("!'false'", true);
    check("!''", true);
    check("!1", false);
    check("!null", true);
}

// --------------------------------------------------------------------- Lists

#[test]
fn test_list_building() {
    check("1, 2, 3", list(&[1.0, 2.0, 3.0]));
    check("sl 1", list(&[1.0]));
    check("sl (1, 2)", Value::List(vec![list(&[1.0, 2.0])]));
    check(
        "(1, 2), 3",
        Value::List(vec![list(&[1.0, 2.0]), Value::from(3)]),
    );
}
