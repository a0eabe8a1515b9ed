//! Best-effort recovery of a stored value's original type.
//!
//! Stored text goes through these steps, in order:
//! 1. JSON decode; text that is not JSON is returned as is, with no upgrades
//! 2. the strings `"true"` and `"false"` become booleans
//! 3. a string that reads as a finite number becomes that number
//!
//! Objects and arrays never reach step 3, so they come back structurally intact.
//! Text like `007` or `+1555` is not JSON and so keeps its leading zeros and signs.

use serde_json::{Number, Value};

/// Coerce a text value (raw stored text or a serialized envelope).
pub(crate) fn coerce(text: &str) -> Value {
  match serde_json::from_str::<Value>(text) {
    Ok(decoded) => upgrade(decoded),
    Err(_) => Value::String(text.to_string()),
  }
}

/// Coerce the `v` field of a decoded envelope.
///
/// A string payload is treated as stored text and decoded again; any other JSON
/// kind is already typed and only goes through the upgrade rules.
pub(crate) fn coerce_payload(value: Value) -> Value {
  match value {
    Value::String(text) => coerce(&text),
    other => upgrade(other),
  }
}

fn upgrade(value: Value) -> Value {
  match value {
    Value::String(s) => match s.as_str() {
      "true" => Value::Bool(true),
      "false" => Value::Bool(false),
      _ => parse_number(&s).unwrap_or(Value::String(s)),
    },
    other => other,
  }
}

fn parse_number(s: &str) -> Option<Value> {
  if let Ok(int) = s.parse::<i64>() {
    return Some(Value::Number(int.into()));
  }
  let float = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
  Number::from_f64(float).map(Value::Number)
}

/// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy.
pub(crate) fn is_falsy(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) => true,
    Some(Value::Bool(b)) => !b,
    Some(Value::Number(n)) => n.as_f64() == Some(0.0),
    Some(Value::String(s)) => s.is_empty(),
    Some(Value::Array(_)) | Some(Value::Object(_)) => false,
  }
}
