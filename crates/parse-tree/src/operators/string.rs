//! Text operators: `^` and the prefix `JSON`.

use crate::value::Value;
use indexmap::IndexMap;

pub fn join(l: &Value, r: &Value) -> Value {
    Value::String(format!("{l}{r}"))
}

/// Parses the text of the operand as JSON. Malformed text is logged and
/// yields an empty map.
pub fn parse_json(operand: &Value) -> Value {
    let text = operand.to_string();
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(json) => Value::from(json),
        Err(error) => {
            tracing::warn!(%error, %text, "JSON operator received malformed input");
            Value::Map(IndexMap::new())
        }
    }
}
