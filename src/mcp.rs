use serde_json::Value;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

// Build an MCP-compliant result envelope for tools/call outputs.
// - content: always a single text block so clients can render something.
// - structuredContent: the full result record(s), omitted on errors.
// - isError: always present; false on success.
fn wrap(text: String, structured: Option<Value>, is_error: bool) -> Value {
    let mut obj = serde_json::json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    });
    if let Some(structured) = structured {
        if let Some(map) = obj.as_object_mut() {
            map.insert("structuredContent".to_string(), structured);
        }
    }
    obj
}

/// Success envelope: human-readable confirmation plus the structured payload.
pub fn tool_success(text: String, structured: Value) -> Value {
    wrap(text, Some(structured), false)
}

/// Error envelope: human-readable explanation, no structured payload.
pub fn tool_error(text: String) -> Value {
    wrap(text, None, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let v = tool_success("done".into(), serde_json::json!({"id": 7}));
        assert_eq!(v["content"][0]["type"], "text");
        assert_eq!(v["content"][0]["text"], "done");
        assert_eq!(v["structuredContent"]["id"], 7);
        assert_eq!(v["isError"], false);
    }

    #[test]
    fn error_envelope_has_no_structured_payload() {
        let v = tool_error("boom".into());
        assert_eq!(v["isError"], true);
        assert!(v.get("structuredContent").is_none());
    }
}
