use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

/// The function an operator node calls when it is evaluated.
///
/// Receives the operator token, the evaluated operands (none, one or two,
/// depending on the [`Arity`]) and the caller's context. Context is `None`
/// when a tree is folded or run through a compiled closure.
pub type EvalFn<C> = Arc<dyn Fn(&str, &[Value], Option<&C>) -> Value + Send + Sync>;

/// Number of operands an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No operands, e.g. `true`.
    Constant,
    /// One operand following the token, e.g. `!x`.
    Unary,
    /// One operand on each side of the token, e.g. `a + b`.
    Binary,
}

/// An operator definition.
pub struct Operator<C: ?Sized = ()> {
    pub token: String,
    pub arity: Arity,
    pub eval: EvalFn<C>,
    /// Whether a node of this operator may be replaced by its value when
    /// all of its operands are constant.
    pub foldable: bool,
}

impl<C: ?Sized> Clone for Operator<C> {
    fn clone(&self) -> Self {
        Operator {
            token: self.token.clone(),
            arity: self.arity,
            eval: Arc::clone(&self.eval),
            foldable: self.foldable,
        }
    }
}

impl<C: ?Sized> fmt::Debug for Operator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("token", &self.token)
            .field("arity", &self.arity)
            .field("foldable", &self.foldable)
            .finish_non_exhaustive()
    }
}

impl<C: ?Sized> Operator<C> {
    /// A zero-argument operator.
    pub fn constant(
        token: impl Into<String>,
        eval: impl Fn(&str, Option<&C>) -> Value + Send + Sync + 'static,
    ) -> Self {
        Operator {
            token: token.into(),
            arity: Arity::Constant,
            eval: Arc::new(move |token: &str, _: &[Value], context: Option<&C>| {
                eval(token, context)
            }),
            foldable: false,
        }
    }

    /// A prefix operator.
    pub fn unary(
        token: impl Into<String>,
        eval: impl Fn(&str, &Value, Option<&C>) -> Value + Send + Sync + 'static,
    ) -> Self {
        Operator {
            token: token.into(),
            arity: Arity::Unary,
            eval: Arc::new(move |token: &str, operands: &[Value], context: Option<&C>| {
                eval(token, operand(operands, 0), context)
            }),
            foldable: false,
        }
    }

    /// An infix operator.
    pub fn binary(
        token: impl Into<String>,
        eval: impl Fn(&str, &Value, &Value, Option<&C>) -> Value + Send + Sync + 'static,
    ) -> Self {
        Operator {
            token: token.into(),
            arity: Arity::Binary,
            eval: Arc::new(move |token: &str, operands: &[Value], context: Option<&C>| {
                eval(token, operand(operands, 0), operand(operands, 1), context)
            }),
            foldable: false,
        }
    }

    /// Marks the operator as constant-foldable (or not).
    pub fn foldable(mut self, foldable: bool) -> Self {
        self.foldable = foldable;
        self
    }
}

static ABSENT: Value = Value::Absent;

fn operand(operands: &[Value], index: usize) -> &Value {
    operands.get(index).unwrap_or(&ABSENT)
}

/// Whether operator tokens must be separated from their surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Whitespace {
    /// Only word operators (`in`, `sl`) need boundaries.
    #[default]
    OnlyWordChars,
    /// Every operator needs boundaries.
    Always,
    /// No operator needs boundaries.
    Optional,
}

impl Whitespace {
    /// Whether a token of the given kind must sit on a boundary.
    pub fn needs_boundary(self, word: bool) -> bool {
        match self {
            Whitespace::Always => true,
            Whitespace::OnlyWordChars => word,
            Whitespace::Optional => false,
        }
    }
}

/// An operator together with what the scanner precomputes about it.
pub(crate) struct Entry<C: ?Sized> {
    pub op: Operator<C>,
    /// The token is made of ASCII letters and digits only.
    pub word: bool,
    /// Longer tokens of the same table that end with this token.
    pub suffixed_by: Vec<String>,
    /// Longer tokens of the same table that start with this token.
    pub prefixed_by: Vec<String>,
}

/// One ordered operator list; an operator's index is its precedence.
pub(crate) struct OperatorTable<C: ?Sized> {
    entries: Vec<Entry<C>>,
}

impl<C: ?Sized> OperatorTable<C> {
    pub fn new(ops: Vec<Operator<C>>) -> Self {
        let tokens: Vec<String> = ops.iter().map(|op| op.token.clone()).collect();
        let entries = ops
            .into_iter()
            .map(|op| {
                let token = op.token.as_str();
                let longer: Vec<&String> = tokens
                    .iter()
                    .filter(|other| other.len() > token.len())
                    .collect();
                let suffixed_by = longer
                    .iter()
                    .filter(|other| other.ends_with(token))
                    .map(|other| (*other).clone())
                    .collect();
                let prefixed_by = longer
                    .iter()
                    .filter(|other| other.starts_with(token))
                    .map(|other| (*other).clone())
                    .collect();
                let word = is_word(token);
                Entry {
                    op,
                    word,
                    suffixed_by,
                    prefixed_by,
                }
            })
            .collect();
        OperatorTable { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<C>> {
        self.entries.iter()
    }
}

impl<C: ?Sized> Index<usize> for OperatorTable<C> {
    type Output = Entry<C>;

    fn index(&self, index: usize) -> &Entry<C> {
        &self.entries[index]
    }
}

/// A word token consists of ASCII letters and digits only.
pub fn is_word(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_alphanumeric())
}
