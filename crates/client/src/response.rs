use reqwest::StatusCode;
use serde_json::{json, Value};

pub const UNPARSEABLE_BODY_DETAIL: &str = "Could not parse response as JSON";

pub fn unparseable_payload() -> Value {
    json!({ "detail": UNPARSEABLE_BODY_DETAIL })
}

/// Decode a response body. Never fails: undecodable input (including an
/// empty body) yields [`unparseable_payload`].
pub fn decode_payload(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| unparseable_payload())
}

/// Human-readable message for a failed response.
///
/// A truthy `detail` field decides the message: a list renders one
/// `"<loc>: <msg> (<type>)"` line per entry, a string is used verbatim and
/// anything else is serialized. Without one the message is `"API Error: <code>"`.
pub fn error_message(status: StatusCode, payload: &Value) -> String {
    match payload.get("detail") {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(validation_line)
            .collect::<Vec<_>>()
            .join("\n"),
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(detail) if is_truthy(detail) => detail.to_string(),
        _ => format!("API Error: {}", status.as_u16()),
    }
}

fn validation_line(entry: &Value) -> String {
    let location = match entry.get("loc") {
        Some(Value::Array(parts)) => parts.iter().map(render).collect::<Vec<_>>().join("."),
        Some(loc) if is_truthy(loc) => render(loc),
        _ => "unknown".to_string(),
    };
    let message = entry
        .get("msg")
        .filter(|v| is_truthy(v))
        .map(render)
        .unwrap_or_else(|| "validation error".to_string());
    let kind = entry
        .get("type")
        .filter(|v| is_truthy(v))
        .map(render)
        .unwrap_or_default();
    format!("{location}: {message} ({kind})")
}

// strings bare, null as empty
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
