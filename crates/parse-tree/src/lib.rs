//! Embeddable expression compiler.
//!
//! # Overview
//!
//! Expressions are plain infix text such as `hp * 2 > max | flag`. The
//! language has no fixed vocabulary: every constant, prefix operator and
//! infix operator comes from tables supplied when the [`Compiler`] is built,
//! optionally on top of a small built-in set (see [`operators`]). A binary
//! operator's position in its table is its precedence.
//!
//! Compiled trees fold constant subexpressions, evaluate against an
//! optional caller context, render back to fully bracketed text, and can
//! be turned into closures. Trees and closures are memoized by source text.
//!
//! # Example
//!
//! ```
//! use parse_tree::{Compiler, CompilerOptions, Operator, Value};
//!
//! struct Unit {
//!     hp: f64,
//! }
//!
//! let compiler = Compiler::new(CompilerOptions {
//!     constants: vec![Operator::constant("hp", |_, unit: Option<&Unit>| {
//!         unit.map_or(Value::Absent, |unit| Value::Number(unit.hp))
//!     })],
//!     ..CompilerOptions::default()
//! });
//!
//! let tree = compiler.compile("hp * 2 >= 10").unwrap();
//! assert_eq!(tree.eval(Some(&Unit { hp: 7.0 })), Value::Bool(true));
//! assert_eq!(tree.eval(Some(&Unit { hp: 4.0 })), Value::Bool(false));
//!
//! let folded = compiler.compile("1 + 2 * 3").unwrap();
//! assert!(folded.is_leaf());
//! assert_eq!(folded.eval(None), Value::Number(7.0));
//! ```

mod cache;
pub mod codegen;
pub mod compiler;
pub mod error;
pub mod node;
pub mod operators;
mod reader;
pub mod types;
pub mod value;

pub use codegen::CompiledFn;
pub use compiler::{Compiler, CompilerOptions};
pub use error::CompileError;
pub use node::Node;
pub use types::{Arity, EvalFn, Operator, Whitespace};
pub use value::Value;
