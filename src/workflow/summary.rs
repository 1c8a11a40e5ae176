//! Best-effort extraction of a summary from the workflow's `data` field.
//!
//! Workflows answer with `data` as an object, as a JSON document encoded in a
//! string, or as free text. Whatever comes back, something gets written.

use serde_json::{Map, Value};

const SUMMARY_KEY: &str = "summary";

/// Pull the summary text out of a workflow `data` value.
///
/// Falls back to the stringified `data` when no non-empty summary is found.
pub fn extract_summary(data: &Value) -> String {
    let summary = match data {
        Value::Object(map) => summary_field(map),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => summary_field(&map),
            Ok(_) => None,
            Err(_) => Some(raw.clone()),
        },
        other => Some(other.to_string()),
    };

    summary
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| value_text(data))
}

/// A `summary` key holding null counts as absent.
fn summary_field(map: &Map<String, Value>) -> Option<String> {
    map.get(SUMMARY_KEY)
        .filter(|value| !value.is_null())
        .map(value_text)
}

/// Strings are used as-is, anything else is rendered as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_with_summary() {
        let data = json!({"summary": "# Notes\n\n- point", "tokens": 42});
        assert_eq!(extract_summary(&data), "# Notes\n\n- point");
    }

    #[test]
    fn test_json_encoded_string_with_summary() {
        let data = json!("{\"summary\": \"short version\"}");
        assert_eq!(extract_summary(&data), "short version");
    }

    #[test]
    fn test_json_encoded_string_without_summary_keeps_raw() {
        let data = json!("{\"output\": \"x\"}");
        assert_eq!(extract_summary(&data), "{\"output\": \"x\"}");
    }

    #[test]
    fn test_plain_text() {
        let data = json!("just some text");
        assert_eq!(extract_summary(&data), "just some text");
    }

    #[test]
    fn test_object_without_summary_is_stringified() {
        let data = json!({"output": "x"});
        assert_eq!(extract_summary(&data), "{\"output\":\"x\"}");
    }

    #[test]
    fn test_empty_summary_falls_back_to_data() {
        let data = json!({"summary": ""});
        assert_eq!(extract_summary(&data), "{\"summary\":\"\"}");
    }

    #[test]
    fn test_null_summary_falls_back_to_data() {
        let data = json!({"summary": null, "other": 1});
        assert_eq!(extract_summary(&data), data.to_string());
    }

    #[test]
    fn test_null_summary_in_encoded_string_keeps_raw() {
        let data = json!("{\"summary\": null}");
        assert_eq!(extract_summary(&data), "{\"summary\": null}");
    }

    #[test]
    fn test_non_string_summary_is_rendered() {
        let data = json!({"summary": ["a", "b"]});
        assert_eq!(extract_summary(&data), "[\"a\",\"b\"]");
    }

    #[test]
    fn test_other_shapes() {
        assert_eq!(extract_summary(&json!(3)), "3");
        assert_eq!(extract_summary(&json!(null)), "null");
    }
}
