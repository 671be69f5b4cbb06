//! Integration tests for caller-supplied operators and context.

use parse_tree::{Compiler, CompilerOptions, Operator, Value, Whitespace};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Unit {
    hp: f64,
    tags: Vec<&'static str>,
}

fn unit(hp: f64, tags: &[&'static str]) -> Unit {
    Unit {
        hp,
        tags: tags.to_vec(),
    }
}

fn game() -> Compiler<Unit> {
    Compiler::new(CompilerOptions {
        constants: vec![Operator::constant("hp", |_, unit: Option<&Unit>| {
            unit.map_or(Value::Absent, |unit| Value::Number(unit.hp))
        })],
        unary: vec![Operator::unary("tag", |_, name, unit: Option<&Unit>| {
            let name = name.to_string();
            Value::Bool(unit.is_some_and(|unit| unit.tags.iter().any(|tag| *tag == name)))
        })],
        binary: vec![Operator::binary("max", |_, l, r, _| {
            Value::Number(l.to_number().max(r.to_number()))
        })
        .foldable(true)],
        ..CompilerOptions::default()
    })
}

#[test]
fn test_context_constants() {
    let compiler = game();
    let tree = compiler.compile("hp * 2").unwrap();
    assert!(tree.is_binary());
    assert!(!tree.is_foldable());
    assert_eq!(tree.eval(Some(&unit(10.0, &[]))), Value::from(20));
    assert_eq!(tree.eval(None), Value::Number(f64::NAN));
}

#[test]
fn test_context_unary() {
    let compiler = game();
    let tree = compiler.compile("tag boss & hp > 5").unwrap();
    assert_eq!(tree.eval(Some(&unit(10.0, &["boss"]))), Value::Bool(true));
    assert_eq!(tree.eval(Some(&unit(3.0, &["boss"]))), Value::Bool(false));
    assert_eq!(tree.eval(Some(&unit(10.0, &["minion"]))), Value::Bool(false));
}

#[test]
fn test_caller_binary_operators_bind_loosest() {
    let compiler = game();
    let tree = compiler.compile("2 * 3 max 5").unwrap();
    assert!(tree.is_leaf());
    assert_eq!(tree.eval(None), Value::from(6));
    assert_eq!(tree.priority(), 0);

    let tree = compiler.compile("hp max 1, 2").unwrap();
    assert_eq!(tree.token(), Some("max"));
    assert_eq!(tree.priority(), 18);
}

#[test]
fn test_word_operators_need_boundaries() {
    let compiler = game();
    assert_eq!(compiler.compile("maximum").unwrap().eval(None), Value::from("maximum"));
    assert_eq!(compiler.compile("window").unwrap().eval(None), Value::from("window"));
    assert_eq!(compiler.compile("hpx").unwrap().eval(None), Value::from("hpx"));
    assert_eq!(
        compiler.compile("tagged").unwrap().eval(Some(&unit(1.0, &[]))),
        Value::from("tagged")
    );
}

#[test]
fn test_folding_ignores_context() {
    let compiler = game();
    let tree = compiler.compile("hp max 1").unwrap();
    assert!(tree.is_binary());

    // A foldable operator that reads the context is folded without one.
    let compiler = Compiler::new(CompilerOptions {
        constants: vec![Operator::constant("level", |_, unit: Option<&Unit>| {
            unit.map_or(Value::Absent, |unit| Value::Number(unit.hp))
        })
        .foldable(true)],
        ..CompilerOptions::default()
    });
    let tree = compiler.compile("level").unwrap();
    assert!(tree.is_leaf());
    assert_eq!(tree.eval(Some(&unit(9.0, &[]))), Value::Absent);
}

#[test]
fn test_longest_token_dispatch() {
    let counter = |calls: &Arc<AtomicUsize>, result: &'static str| {
        let calls = Arc::clone(calls);
        move |_: &str, _: &Value, _: &Value, _: Option<&()>| {
            calls.fetch_add(1, Ordering::SeqCst);
            Value::from(result)
        }
    };
    let lt = Arc::new(AtomicUsize::new(0));
    let le = Arc::new(AtomicUsize::new(0));
    let tables = [
        vec![
            Operator::binary("<", counter(&lt, "lt")),
            Operator::binary("<=", counter(&le, "le")),
        ],
        vec![
            Operator::binary("<=", counter(&le, "le")),
            Operator::binary("<", counter(&lt, "lt")),
        ],
    ];
    for binary in tables {
        let compiler: Compiler = Compiler::new(CompilerOptions {
            binary,
            builtins: false,
            ..CompilerOptions::default()
        });
        assert_eq!(compiler.compile("a <= b").unwrap().eval(None), Value::from("le"));
        assert_eq!(compiler.compile("a<b").unwrap().eval(None), Value::from("lt"));
    }
    assert_eq!(lt.load(Ordering::SeqCst), 2);
    assert_eq!(le.load(Ordering::SeqCst), 2);
}

#[test]
fn test_without_builtins() {
    let compiler: Compiler = Compiler::new(CompilerOptions {
        builtins: false,
        ..CompilerOptions::default()
    });
    assert_eq!(compiler.compile("1 + 2").unwrap().eval(None), Value::from("1 + 2"));
    assert_eq!(compiler.compile("true").unwrap().eval(None), Value::from("true"));
    assert_eq!(compiler.compile("(1)").unwrap().eval(None), Value::from(1));
}

#[test]
fn test_whitespace_policies() {
    let always: Compiler = Compiler::new(CompilerOptions {
        whitespace: Whitespace::Always,
        ..CompilerOptions::default()
    });
    assert_eq!(always.compile("1+2").unwrap().eval(None), Value::from("1+2"));
    assert_eq!(always.compile("1 + 2").unwrap().eval(None), Value::from(3));

    let optional: Compiler = Compiler::new(CompilerOptions {
        whitespace: Whitespace::Optional,
        ..CompilerOptions::default()
    });
    assert_eq!(optional.compile("2in(1,2)").unwrap().eval(None), Value::Bool(true));
}

#[test]
fn test_map_accessor_lookup() {
    let mut stats = Value::from(json!({"str": 4}));
    if let Value::Map(map) = &mut stats {
        map.insert(
            "get".to_string(),
            Value::callable(|args| Value::from(format!("computed {}", args[0]))),
        );
    }
    let compiler = Compiler::new(CompilerOptions {
        constants: vec![Operator::constant("stats", move |_, _: Option<&()>| stats.clone())],
        ..CompilerOptions::default()
    });
    assert_eq!(compiler.compile("stats.str").unwrap().eval(None), Value::from(4));
    assert_eq!(
        compiler.compile("stats.dex").unwrap().eval(None),
        Value::from("computed dex")
    );
}
