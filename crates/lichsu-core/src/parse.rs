//! Serialized-record decoding

use serde_json::{Map, Value};

use crate::model::Cell;

/// Decode one cell's serialized-object text into a key-value record.
///
/// Takes the substring from the first `{` onward and parses it as a JSON
/// object; Python-style single-quoted literals are retried after quote
/// normalization. Anything that fails to decode yields `None` - malformed
/// rows are excluded, never surfaced as errors. Non-textual and brace-free
/// cells also yield `None`.
///
/// Decoding is purely structural; cell content is never executed.
pub fn record(cell: &Cell) -> Option<Map<String, Value>> {
    let text = cell.as_text()?;
    let start = text.find('{')?;
    let body = &text[start..];

    match serde_json::from_str(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => from_quoted_literal(body),
    }
}

/// Retry with `'` swapped for `"`. Good enough for the flat, apostrophe-free
/// records this data carries.
fn from_quoted_literal(body: &str) -> Option<Map<String, Value>> {
    let normalized = body.replace('\'', "\"");
    match serde_json::from_str(&normalized) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Flatten nested objects into dotted key paths: `{"a": {"b": 1}}` becomes
/// `{"a.b": 1}`. Non-object values are kept as-is.
pub fn flatten(map: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(&mut out, "", map);
    out
}

fn flatten_into(out: &mut Map<String, Value>, prefix: &str, map: &Map<String, Value>) {
    for (key, value) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) => flatten_into(out, &name, inner),
            other => {
                out.insert(name, other.clone());
            }
        }
    }
}
