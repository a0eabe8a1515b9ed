//! The record written under each key in local storage.
//!
//! ```text
//! {"v": <value>}                 # no expiry
//! {"v": <value>, "e": <millis>}  # expires at epoch milliseconds `e`
//! ```

use std::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
  pub v: Value,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub e: Option<i64>,
}

impl Envelope {
  /// Wrap `value`, expiring `expires` after `now_millis`.
  ///
  /// A zero duration means no expiry. Lifetimes too long to represent clamp to
  /// the largest timestamp.
  pub fn new(value: Value, expires: Option<Duration>, now_millis: i64) -> Self {
    let e = expires
      .filter(|d| !d.is_zero())
      .map(|d| now_millis.saturating_add(i64::try_from(d.as_millis()).unwrap_or(i64::MAX)));
    Self { v: value, e }
  }

  /// An envelope is expired once the clock has moved strictly past `e`.
  pub fn is_expired(&self, now_millis: i64) -> bool {
    self.e.is_some_and(|e| now_millis > e)
  }

  pub fn to_text(&self) -> serde_json::Result<String> {
    serde_json::to_string(self)
  }

  /// Parse stored text. Only a JSON object with a `v` field is an envelope.
  pub fn from_text(text: &str) -> serde_json::Result<Self> {
    match serde_json::from_str::<Value>(text)? {
      object @ Value::Object(_) => serde_json::from_value(object),
      _ => Err(serde_json::Error::custom("envelope must be a JSON object")),
    }
  }
}
