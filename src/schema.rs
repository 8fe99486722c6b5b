use serde_json::{json, Value};

/// Coerce an arbitrary tool input schema into a well-formed object schema.
///
/// Host registries report schemas in whatever shape the tool author wrote;
/// MCP clients expect `type: "object"` with a `properties` map at the root.
/// The mapping:
///
/// - absent or JSON null → a default one-field schema (`input: string`);
/// - an object already typed `"object"` → passed through unchanged;
/// - any other object → nested under a synthetic `input` key, keeping the
///   original `properties`/`required` fragments;
/// - anything else (primitive, array) → the default schema.
///
/// Total function: never fails, no side effects, idempotent on the
/// pass-through case.
pub fn normalize(raw: Option<&Value>) -> Value {
    let Some(raw) = raw else {
        return default_schema();
    };

    match raw {
        Value::Null => default_schema(),
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("object") {
                return raw.clone();
            }
            json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "object",
                        "description": "Tool input parameters",
                        "properties": map.get("properties").cloned().unwrap_or_else(|| json!({})),
                        "required": map.get("required").cloned().unwrap_or_else(|| json!([])),
                    }
                }
            })
        }
        _ => default_schema(),
    }
}

fn default_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "input": {
                "type": "string",
                "description": "Input for the tool"
            }
        }
    })
}
