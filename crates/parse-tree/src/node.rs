//! Parse tree nodes.

use crate::types::{EvalFn, Operator};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Token recorded on the node that wraps a bracketed group.
pub const BRACKET_GUARD: &str = "()";

const QUOTES: [char; 2] = ['"', '\''];

/// A node of a compiled expression.
///
/// A leaf carries a literal value. An operator node carries the operator's
/// token as its value, the operator's evaluation function, and up to two
/// children: constants have none, unary operators and bracket guards only
/// `lhs`, binary operators both.
pub struct Node<C: ?Sized = ()> {
    pub(crate) value: Value,
    pub(crate) priority: usize,
    pub(crate) exec: Option<EvalFn<C>>,
    pub(crate) lhs: Option<Box<Node<C>>>,
    pub(crate) rhs: Option<Box<Node<C>>>,
    pub(crate) foldable: bool,
}

impl<C: ?Sized> Node<C> {
    pub fn leaf(value: Value) -> Self {
        Node {
            value,
            priority: 0,
            exec: None,
            lhs: None,
            rhs: None,
            foldable: true,
        }
    }

    /// A leaf for operand text. Quoted text is a string with its quotes
    /// removed; unquoted text goes through [`Value::from_literal`].
    pub(crate) fn literal(text: &str) -> Self {
        let body = text.strip_prefix(QUOTES).unwrap_or(text);
        let body = body.strip_suffix(QUOTES).unwrap_or(body);
        if text.starts_with(QUOTES) {
            Node::leaf(Value::String(body.to_string()))
        } else {
            Node::leaf(Value::from_literal(body))
        }
    }

    pub(crate) fn operator(op: &Operator<C>, priority: usize, lhs: Option<Node<C>>) -> Self {
        Node {
            value: Value::String(op.token.clone()),
            priority,
            exec: Some(Arc::clone(&op.eval)),
            lhs: lhs.map(Box::new),
            rhs: None,
            foldable: op.foldable,
        }
    }

    /// Wraps a bracketed group so that later operators treat it as one
    /// operand.
    pub(crate) fn guard(inner: Node<C>) -> Self {
        Node {
            value: Value::String(BRACKET_GUARD.to_string()),
            priority: 0,
            exec: Some(Arc::new(|_: &str, operands: &[Value], _: Option<&C>| {
                operands.first().cloned().unwrap_or_default()
            })),
            lhs: Some(Box::new(inner)),
            rhs: None,
            foldable: true,
        }
    }

    /// The literal of a leaf, or the token of an operator node.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The operator token; `None` for leaves.
    pub fn token(&self) -> Option<&str> {
        match (&self.exec, &self.value) {
            (Some(_), Value::String(token)) => Some(token.as_str()),
            _ => None,
        }
    }

    /// Binding priority. Binary operators count from 1 (tightest); leaves,
    /// constants, unary operators and bracket guards are 0.
    pub fn priority(&self) -> usize {
        self.priority
    }

    pub fn lhs(&self) -> Option<&Node<C>> {
        self.lhs.as_deref()
    }

    pub fn rhs(&self) -> Option<&Node<C>> {
        self.rhs.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.exec.is_none()
    }

    pub fn is_constant(&self) -> bool {
        self.exec.is_some() && self.lhs.is_none()
    }

    pub fn is_unary(&self) -> bool {
        self.exec.is_some() && self.lhs.is_some() && self.rhs.is_none()
    }

    pub fn is_binary(&self) -> bool {
        self.exec.is_some() && self.rhs.is_some()
    }

    /// True when this node and all of its descendants are foldable, so the
    /// whole subtree has a context-independent value.
    pub fn is_foldable(&self) -> bool {
        self.foldable && self.lhs.iter().chain(&self.rhs).all(|child| child.is_foldable())
    }

    /// Evaluates the tree.
    pub fn eval(&self, context: Option<&C>) -> Value {
        let Some(exec) = &self.exec else {
            return self.value.clone();
        };
        let token = self.token().unwrap_or_default();
        match (&self.lhs, &self.rhs) {
            (None, _) => exec(token, &[], context),
            (Some(lhs), None) => exec(token, &[lhs.eval(context)], context),
            (Some(lhs), Some(rhs)) => exec(token, &[lhs.eval(context), rhs.eval(context)], context),
        }
    }

    /// Replaces every maximal foldable subtree with a leaf holding its
    /// value. Folding evaluates without a context.
    pub fn collapse(&mut self) -> &mut Self {
        if self.is_foldable() {
            if self.exec.is_some() {
                self.value = self.eval(None);
                self.exec = None;
                self.lhs = None;
                self.rhs = None;
                self.priority = 0;
            }
        } else {
            if let Some(lhs) = &mut self.lhs {
                lhs.collapse();
            }
            if let Some(rhs) = &mut self.rhs {
                rhs.collapse();
            }
        }
        self
    }

    /// Renders the tree as fully bracketed source text that compiles back
    /// to an equivalent tree.
    pub fn to_expr(&self) -> String {
        let Some(token) = self.token() else {
            return literal_expr(&self.value);
        };
        match (self.lhs(), self.rhs()) {
            (None, _) => token.to_string(),
            (Some(inner), None) if token == BRACKET_GUARD => format!("({})", inner.to_expr()),
            (Some(operand), None) => format!("({token} {})", operand.to_expr()),
            (Some(lhs), Some(rhs)) => format!("({} {token} {})", lhs.to_expr(), rhs.to_expr()),
        }
    }

    /// Debug dump, one node per line, children indented by four spaces.
    pub fn to_tree_string(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let label = match &self.value {
            Value::String(s) if s.is_empty() => "empty".to_string(),
            value => value.to_string(),
        };
        let con = if self.is_foldable() { " CON" } else { "" };
        if self.is_leaf() {
            return format!("{pad}[node {label}:{}{con}]\n", self.priority);
        }
        let child = |node: Option<&Node<C>>| match node {
            Some(node) => node.to_tree_string(indent + 4),
            None => format!("{pad}    null\n"),
        };
        format!(
            "{pad}[node {label}:{}{con}\n{}{}{pad}]\n",
            self.priority,
            child(self.lhs()),
            child(self.rhs()),
        )
    }
}

impl<C: ?Sized> fmt::Display for Node<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_tree_string(0))
    }
}

impl<C: ?Sized> fmt::Debug for Node<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("expr", &self.to_expr())
            .field("priority", &self.priority)
            .finish()
    }
}

fn literal_expr(value: &Value) -> String {
    match value {
        Value::Number(n) if *n == 0.0 && n.is_sign_negative() => "(- 0)".to_string(),
        Value::Number(n) => {
            let text = value.to_string();
            let plain = n.is_infinite()
                || text
                    .trim_start_matches('-')
                    .chars()
                    .all(|c| c.is_ascii_digit() || c == '.');
            if plain {
                text
            } else {
                format!("(+ '{text}')")
            }
        }
        Value::String(s) => quote(s),
        Value::List(_) | Value::Map(_) => match value.to_json() {
            Some(json) => format!("(JSON {})", quote(&json.to_string())),
            None => value.to_string(),
        },
        Value::Absent | Value::Null | Value::Bool(_) | Value::Callable(_) => value.to_string(),
    }
}

fn quote(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    // Neither quote fits: join single-quoted runs and "'" with `^`.
    let mut pieces = Vec::new();
    for (i, run) in text.split('\'').enumerate() {
        if i > 0 {
            pieces.push("\"'\"".to_string());
        }
        if !run.is_empty() {
            pieces.push(format!("'{run}'"));
        }
    }
    format!("({})", pieces.join(" ^ "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus() -> Operator {
        Operator::binary("+", |_, l, r, _| Value::Number(l.to_number() + r.to_number()))
            .foldable(true)
    }

    fn lookup() -> Operator {
        Operator::unary("val", |_, v, _| v.clone())
    }

    fn binary(op: &Operator, lhs: Node, rhs: Node) -> Node {
        let mut node = Node::operator(op, 1, Some(lhs));
        node.rhs = Some(Box::new(rhs));
        node
    }

    #[test]
    fn test_literals() {
        assert_eq!(Node::<()>::literal("42").value, Value::from(42));
        assert_eq!(Node::<()>::literal("'42'").value, Value::from("42"));
        assert_eq!(Node::<()>::literal("\"a b\"").value, Value::from("a b"));
        assert_eq!(Node::<()>::literal("05").value, Value::from("05"));
        assert_eq!(Node::<()>::literal("").value, Value::from(""));
    }

    #[test]
    fn test_eval_and_shape() {
        let tree = binary(&plus(), Node::leaf(Value::from(1)), Node::leaf(Value::from(2)));
        assert!(tree.is_binary());
        assert_eq!(tree.token(), Some("+"));
        assert_eq!(tree.eval(None), Value::from(3));
        assert_eq!(tree.lhs().map(Node::value), Some(&Value::from(1)));
    }

    #[test]
    fn test_collapse_folds_maximal_subtrees() {
        let inner = binary(&plus(), Node::leaf(Value::from(1)), Node::leaf(Value::from(2)));
        let unfoldable = Node::operator(&lookup(), 0, Some(Node::leaf(Value::from("x"))));
        let mut tree = binary(&plus(), inner, unfoldable);
        assert!(!tree.is_foldable());
        tree.collapse();
        assert!(tree.is_binary());
        assert!(tree.lhs().is_some_and(Node::is_leaf));
        assert_eq!(tree.lhs().map(Node::value), Some(&Value::from(3)));
        assert!(tree.rhs().is_some_and(Node::is_unary));
    }

    #[test]
    fn test_constant_shape() {
        let yes: Operator = Operator::constant("yes", |_, _| Value::Bool(true));
        let node = Node::operator(&yes, 0, None);
        assert!(node.is_constant());
        assert!(!node.is_leaf() && !node.is_unary() && !node.is_binary());
        assert_eq!(node.eval(None), Value::Bool(true));
        assert_eq!(node.to_expr(), "yes");
        assert!(!Node::<()>::leaf(Value::from(1)).is_constant());
        assert!(!Node::guard(node).is_constant());
    }

    #[test]
    fn test_guard_passes_value_through() {
        let guard: Node = Node::guard(Node::leaf(Value::from(7)));
        assert!(guard.is_unary());
        assert_eq!(guard.token(), Some(BRACKET_GUARD));
        assert_eq!(guard.eval(None), Value::from(7));
        assert_eq!(guard.to_expr(), "(7)");
    }

    #[test]
    fn test_literal_expr() {
        assert_eq!(literal_expr(&Value::from(1.5)), "1.5");
        assert_eq!(literal_expr(&Value::from(-3)), "-3");
        assert_eq!(literal_expr(&Value::Number(f64::NAN)), "(+ 'NaN')");
        assert_eq!(literal_expr(&Value::Number(-0.0)), "(- 0)");
        assert_eq!(literal_expr(&Value::Number(1e21)), "(+ '1e+21')");
        assert_eq!(literal_expr(&Value::from("it's")), "\"it's\"");
        assert_eq!(literal_expr(&Value::from("a")), "'a'");
        assert_eq!(
            literal_expr(&Value::from("a\" + \"b'")),
            "('a\" + \"b' ^ \"'\")"
        );
        assert_eq!(literal_expr(&Value::from("'x\"")), "(\"'\" ^ 'x\"')");
        assert_eq!(literal_expr(&Value::Null), "null");
        assert_eq!(
            literal_expr(&Value::from(vec![Value::from(1), Value::from("a")])),
            "(JSON '[1,\"a\"]')"
        );
    }

    #[test]
    fn test_tree_string() {
        let tree = binary(&plus(), Node::leaf(Value::from(1)), Node::leaf(Value::from("")));
        assert_eq!(
            tree.to_string(),
            "[node +:1 CON\n    [node 1:0 CON]\n    [node empty:0 CON]\n]\n"
        );
    }
}
