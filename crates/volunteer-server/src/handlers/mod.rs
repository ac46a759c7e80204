//! HTTP handlers

pub mod auth;
pub mod events;
pub mod health;
pub mod hours;
pub mod volunteers;

pub use health::health;

use serde_json::Value;

/// Form-ish fields may arrive as JSON numbers or strings; the store parses
/// the text form either way.
pub(crate) fn raw_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
