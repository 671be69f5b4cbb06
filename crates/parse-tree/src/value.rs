//! The runtime value flowing through evaluation.
//!
//! Every operator consumes and produces [`Value`]. Coercions between the
//! variants follow JavaScript's loose rules so that expressions written
//! against loosely typed data behave predictably: nothing here can fail,
//! a value that makes no sense as a number is `NaN` and a lookup that finds
//! nothing is [`Value::Absent`].

use indexmap::IndexMap;
use regex::Regex;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A value that can be invoked by operators, e.g. a `get` accessor on a map.
pub type Callable = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Any value an expression can produce.
#[derive(Clone, Default)]
pub enum Value {
    /// No value, the result of a lookup that found nothing (`undefined`).
    #[default]
    Absent,
    /// An explicit empty value (`null`).
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Callable(Callable),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("Absent"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// Structural equality. `NaN` equals `NaN`, callables compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// The text form of a value, as JavaScript's `String(value)` renders it.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Map(_) => f.write_str("[object Object]"),
            Value::Callable(_) => f.write_str("function"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Value {
    /// Interprets unquoted operand text.
    ///
    /// Text that is the canonical rendering of a number (`42`, `1.5`) is a
    /// [`Value::Number`]; anything else, including non-canonical numerals
    /// such as `05` or `1e3`, stays a [`Value::String`].
    pub fn from_literal(text: &str) -> Value {
        let n = parse_number(text);
        if !n.is_nan() && format_number(n) == text {
            Value::Number(n)
        } else {
            Value::String(text.to_string())
        }
    }

    /// Wraps a closure as a [`Value::Callable`].
    pub fn callable(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Value {
        Value::Callable(Arc::new(f))
    }

    /// True for [`Value::Absent`] and [`Value::Null`].
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Absent | Value::Null)
    }

    fn is_object(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_) | Value::Callable(_))
    }

    /// JavaScript truthiness.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Absent | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Map(_) | Value::Callable(_) => true,
        }
    }

    /// Numeric coercion (JavaScript's unary `+`). Never fails; yields `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Absent | Value::Map(_) | Value::Callable(_) => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
            Value::List(_) => parse_number(&self.to_string()),
        }
    }

    /// Property lookup, `self[key]`.
    ///
    /// Maps are searched for the key first; when it is missing and the map
    /// carries a callable `get` entry, that accessor is called with the key.
    /// Lists and strings answer `length` and in-range indices. Everything
    /// else is [`Value::Absent`].
    pub fn get(&self, key: &Value) -> Value {
        let name = key.to_string();
        match self {
            Value::Map(map) => match map.get(&name) {
                Some(value) => value.clone(),
                None => match map.get("get") {
                    Some(Value::Callable(accessor)) => accessor(std::slice::from_ref(key)),
                    _ => Value::Absent,
                },
            },
            Value::List(items) => match name.as_str() {
                "length" => Value::Number(items.len() as f64),
                _ => array_index(&name)
                    .and_then(|i| items.get(i))
                    .cloned()
                    .unwrap_or_default(),
            },
            Value::String(s) => match name.as_str() {
                "length" => Value::Number(s.chars().count() as f64),
                _ => array_index(&name)
                    .and_then(|i| s.chars().nth(i))
                    .map(|c| Value::String(c.to_string()))
                    .unwrap_or_default(),
            },
            _ => Value::Absent,
        }
    }

    /// Loose equality, JavaScript's `==`.
    ///
    /// Containers are compared structurally with each other rather than by
    /// identity.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Absent | Value::Null, Value::Absent | Value::Null) => true,
            (Value::Absent | Value::Null, _) | (_, Value::Absent | Value::Null) => false,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
                *n == parse_number(s)
            }
            (Value::Bool(b), _) => Value::Number(f64::from(u8::from(*b))).loose_eq(other),
            (_, Value::Bool(b)) => self.loose_eq(&Value::Number(f64::from(u8::from(*b)))),
            (a, b) if a.is_object() && b.is_object() => a == b,
            (a, b) if a.is_object() => Value::String(a.to_string()).loose_eq(b),
            (a, b) => a.loose_eq(&Value::String(b.to_string())),
        }
    }

    /// Strict equality, JavaScript's `===` (`NaN` is unequal to itself).
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            _ => self == other,
        }
    }

    /// Relational ordering used by `<`, `>`, `<=` and `>=`.
    ///
    /// Two string-like operands compare lexicographically, anything else
    /// numerically. `None` means the operands are unordered (a `NaN` side).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        let left = self.to_primitive();
        let right = other.to_primitive();
        match (left.as_ref(), right.as_ref()) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (a, b) => a.to_number().partial_cmp(&b.to_number()),
        }
    }

    fn to_primitive(&self) -> Cow<'_, Value> {
        if self.is_object() {
            Cow::Owned(Value::String(self.to_string()))
        } else {
            Cow::Borrowed(self)
        }
    }

    /// Converts to JSON. `Absent` and callables have no JSON form; inside a
    /// list they become `null` and inside a map their entries are dropped.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        Some(match self {
            Value::Absent | Value::Callable(_) => return None,
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => json_number(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| item.to_json().unwrap_or(serde_json::Value::Null))
                    .collect(),
            ),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .filter_map(|(k, v)| v.to_json().map(|v| (k.clone(), v)))
                    .collect(),
            ),
        })
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn json_number(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::Number(serde_json::Number::from(n as i64))
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

fn array_index(name: &str) -> Option<usize> {
    name.parse::<usize>().ok().filter(|i| i.to_string() == name)
}

fn decimal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").unwrap()
    })
}

/// Parses text the way JavaScript's `Number(text)` does.
///
/// Surrounding whitespace is ignored and empty text is `0`. Decimal and
/// exponent notation, `Infinity` and `0x`/`0o`/`0b` integers are accepted;
/// anything else is `NaN`.
pub fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let radix = match text.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => 10,
    };
    if radix != 10 {
        return parse_radix(&text[2..], radix);
    }
    if decimal_regex().is_match(text) {
        text.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0, |acc, c| {
            c.to_digit(radix)
                .map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

/// Renders a number the way JavaScript's `String(n)` does.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&n.abs()) {
        return format!("{n}");
    }
    let text = format!("{n:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}
