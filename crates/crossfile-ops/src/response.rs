//! The reply envelope.
//!
//! Success replies merge a typed payload into
//! `{"success": true, "operation": <name>}`; failures are
//! `{"success": false, "error": <message>}`. The engine never lets
//! anything escape in another shape.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crossfile_core::EngineError;

/// Build a success reply from a serializable payload.
///
/// The payload must serialize to a JSON object; its fields are merged
/// beside `success` and `operation`.
pub fn success_reply(operation: &str, payload: impl Serialize) -> Value {
    let mut object = match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            let mut map = Map::new();
            map.insert("result".to_string(), other);
            map
        }
        Err(e) => return failure_reply(&EngineError::other(e.to_string())),
    };
    object.insert("success".to_string(), Value::Bool(true));
    object.insert("operation".to_string(), Value::String(operation.to_string()));
    Value::Object(object)
}

/// Build a failure reply carrying the error message.
pub fn failure_reply(error: &EngineError) -> Value {
    json!({
        "success": false,
        "error": error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        files_added: usize,
        cancelled: bool,
    }

    #[test]
    fn success_merges_payload_fields() {
        let reply = success_reply(
            "zip",
            Payload {
                files_added: 3,
                cancelled: false,
            },
        );
        assert_eq!(reply["success"], true);
        assert_eq!(reply["operation"], "zip");
        assert_eq!(reply["filesAdded"], 3);
        assert_eq!(reply["cancelled"], false);
    }

    #[test]
    fn failure_carries_only_the_message() {
        let reply = failure_reply(&EngineError::MissingParam { field: "folderPath" });
        assert_eq!(reply["success"], false);
        assert_eq!(reply["error"], "folderPath is required");
        assert!(reply.get("operation").is_none());
    }
}
