use crate::protocol::error::Result;
use crate::protocol::BridgeMessage;

/// JSON codec for bridge messages.
///
/// JSON keeps the wire format compatible with the `serde_json::Value`
/// payloads carried in call requests and results.
pub struct JsonCodec;

impl JsonCodec {
    /// Encodes a message to bytes.
    pub fn encode(message: &BridgeMessage) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(message)?)
    }

    /// Decodes a message from bytes.
    pub fn decode(data: &[u8]) -> Result<BridgeMessage> {
        Ok(serde_json::from_slice(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CallRequest, CallResult, ObjectRegistration};
    use serde_json::json;

    #[test]
    fn encode_decode_call_request() {
        let message = BridgeMessage::CallRequest(CallRequest {
            call_id: 9,
            object: "window_api".into(),
            method: "query".into(),
            args: json!({"selector": "main"}),
        });

        let encoded = JsonCodec::encode(&message).unwrap();
        let decoded = JsonCodec::decode(&encoded).unwrap();

        assert_eq!(message, decoded);
    }

    #[test]
    fn encode_decode_registration() {
        let message = BridgeMessage::Registration(ObjectRegistration::new("calc", ["add"]));

        let encoded = JsonCodec::encode(&message).unwrap();
        let decoded = JsonCodec::decode(&encoded).unwrap();

        assert_eq!(message, decoded);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(JsonCodec::decode(b"not json").is_err());
    }

    #[test]
    fn encode_decode_result_with_nested_payload() {
        let message = BridgeMessage::CallResult(CallResult::success(
            3,
            json!({
                "nested": {
                    "array": [1, 2, 3, "four", null],
                    "boolean": true,
                    "number": 42.5
                }
            }),
        ));

        let encoded = JsonCodec::encode(&message).unwrap();
        let decoded = JsonCodec::decode(&encoded).unwrap();

        assert_eq!(message, decoded);
    }
}
