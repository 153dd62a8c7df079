//! JSON array canonicalization.
//!
//! Array-type fields are stored as JSON text in JSON-typed backend columns;
//! these helpers guarantee the text is always syntactically valid JSON.

use serde_json::Value;

fn looks_like_json(text: &str) -> bool {
    (text.starts_with('[') && text.ends_with(']'))
        || (text.starts_with('{') && text.ends_with('}'))
}

/// Converts a value to a JSON array string suitable for storage.
///
/// A string that already looks like a JSON array or object is parsed and
/// re-serialized to validate it, falling back to normal handling when the
/// parse fails. Arrays serialize directly; null and blank strings collapse
/// to `[]`; any other scalar is wrapped in a one-element array.
pub fn to_json_array_string(value: &Value) -> String {
    if let Value::String(text) = value {
        if looks_like_json(text)
            && let Ok(parsed) = serde_json::from_str::<Value>(text)
        {
            return parsed.to_string();
        }
        if text.trim().is_empty() {
            return "[]".to_string();
        }
    }
    match value {
        Value::Array(_) => value.to_string(),
        Value::Null => "[]".to_string(),
        other => Value::Array(vec![other.clone()]).to_string(),
    }
}

/// Parses a JSON array string from storage.
///
/// Empty or invalid input yields an empty vec; a valid non-array value is
/// wrapped in a one-element vec.
pub fn from_json_array_string(raw: &str) -> Vec<Value> {
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(other) => vec![other],
        Err(_) => Vec::new(),
    }
}

/// Display-string items of a stored JSON array.
pub fn string_items(raw: &str) -> Vec<String> {
    from_json_array_string(raw)
        .into_iter()
        .map(|item| match item {
            Value::String(text) => text,
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn valid_json_array_text_is_reserialized() {
        let value = Value::String("[\"a\", \"b\"]".to_string());
        assert_eq!(to_json_array_string(&value), "[\"a\",\"b\"]");
    }

    #[test]
    fn invalid_bracketed_text_falls_through_to_wrapping() {
        let value = Value::String("[not json".to_string());
        assert_eq!(to_json_array_string(&value), "[\"[not json\"]");
        let value = Value::String("[broken]".to_string());
        assert_eq!(to_json_array_string(&value), "[\"[broken]\"]");
    }

    #[test]
    fn null_and_blank_collapse_to_empty_array() {
        assert_eq!(to_json_array_string(&Value::Null), "[]");
        assert_eq!(to_json_array_string(&Value::String("   ".to_string())), "[]");
        assert_eq!(to_json_array_string(&Value::String(String::new())), "[]");
    }

    #[test]
    fn scalar_is_wrapped() {
        assert_eq!(
            to_json_array_string(&Value::String("solo".to_string())),
            "[\"solo\"]"
        );
        assert_eq!(to_json_array_string(&Value::from(7)), "[7]");
    }

    #[test]
    fn from_json_array_string_handles_bad_input() {
        assert!(from_json_array_string("").is_empty());
        assert!(from_json_array_string("not json").is_empty());
        assert_eq!(from_json_array_string("\"x\"").len(), 1);
    }

    proptest! {
        // Encoding a list of names and decoding it back preserves content
        // and order for arbitrary strings.
        #[test]
        fn round_trip_preserves_items(items in prop::collection::vec(".*", 0..6)) {
            let value = Value::Array(items.iter().cloned().map(Value::String).collect());
            let encoded = to_json_array_string(&value);
            prop_assert_eq!(string_items(&encoded), items);
        }
    }
}
