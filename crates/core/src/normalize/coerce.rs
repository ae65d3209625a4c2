//! Shape-coercion helpers for loosely structured validator payloads.
//!
//! The external workflow engine does not guarantee a payload schema, so
//! every accessor here is total: malformed input degrades to an empty or
//! default value and is never surfaced as an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Keys tried, in order, when reducing an object to display text.
const TEXT_KEYS: &[&str] = &["text", "description", "summary", "details", "reason", "message"];

/// Regex matching the first integer or decimal substring of a score value.
static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid regex"));

/// Decode the raw `result_details` value into a navigable document.
///
/// Strings are treated as embedded JSON; a string that fails to decode
/// degrades to an empty object so downstream lookups simply find nothing.
pub fn parse_details(raw: Option<&Value>) -> Value {
    match raw {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(Value::String(s)) => serde_json::from_str(s).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "result details string is not valid JSON");
            Value::Object(Default::default())
        }),
        Some(other) => other.clone(),
    }
}

/// Extract an integer score from a number or free-text value.
///
/// Numbers are rounded to the nearest integer. Strings are scanned for the
/// first decimal-or-integer substring (`"Score: 87.6%"` yields `88`).
/// Anything else yields `None`. The result is deliberately unclamped;
/// clamping to `[0, 100]` happens at the presentation boundary.
pub fn extract_numeric_score(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => {
            let f = n.as_f64()?;
            f.is_finite().then(|| f.round() as i64)
        }
        Value::String(s) => {
            let m = SCORE_RE.find(s)?;
            m.as_str().parse::<f64>().ok().map(|f| f.round() as i64)
        }
        _ => None,
    }
}

/// Coerce an arbitrary value into a sequence.
///
/// - `null`/absent: empty
/// - array: itself
/// - string holding a JSON array: the decoded array
/// - other string: split on newline or semicolon, trimmed, empties dropped
/// - object: its values
/// - any other scalar: a one-element sequence
pub fn to_array(value: Option<&Value>) -> Vec<Value> {
    let value = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(v) => v,
    };

    match value {
        Value::Array(items) => items.clone(),
        Value::String(s) => {
            if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(s) {
                return items;
            }
            s.split(['\n', ';'])
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| Value::String(part.to_string()))
                .collect()
        }
        Value::Object(map) => map.values().cloned().collect(),
        other => vec![other.clone()],
    }
}

/// Coerce a value into a sequence of non-empty trimmed strings.
///
/// Object items are reduced through the ordered text accessors
/// (`text`, `description`, `summary`, `details`, `reason`, `message`).
pub fn to_string_array(value: Option<&Value>) -> Vec<String> {
    to_array(value)
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => first_text(map, TEXT_KEYS),
            other => scalar_to_string(other),
        })
        .collect()
}

/// Evaluate an ordered list of keys against an object, returning the first
/// one that yields non-empty text. Keeps fallback precedence explicit
/// instead of burying it in chained expressions.
pub fn first_text(map: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find_map(scalar_to_string)
}

/// Render a scalar as trimmed display text; `None` for empty strings,
/// nulls, and composite values.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Look up `key` on a value, returning `None` unless the value is an object.
pub fn get<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value.get(key) {
        Some(Value::Null) | None => None,
        Some(v) => Some(v),
    }
}

/// Look up the first present key of `keys` on an object-valued `value`.
pub fn get_first<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| get(value, key))
}

/// Look up `key` and reduce it to display text.
pub fn get_text(value: &Value, key: &str) -> Option<String> {
    get(value, key).and_then(scalar_to_string)
}
