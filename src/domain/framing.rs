//! Application-level framing envelope for persistent connections.
//!
//! A framed route wraps every logical payload in
//! `{ "tag": <string>, "payload": <json-value> }`. Inbound frames must carry the
//! route's request tag, outbound replies carry its response tag, and error
//! frames carry its error tag. The handler never sees the envelope.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::foundation::{ErrorBody, ValidationError};

/// Tag used for error frames when a route does not configure one.
pub const DEFAULT_ERROR_TAG: &str = "ERROR";

/// Errors raised while decoding or encoding an envelope.
///
/// Codec errors never close the connection; they are reported back to the
/// caller as an error frame.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed frame: {0}")]
    Malformed(String),

    #[error("Unexpected frame tag '{actual}', expected '{expected}'")]
    TagMismatch { expected: String, actual: String },

    #[error("Failed to encode frame: {0}")]
    Encode(String),
}

/// Wire encoding of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameEncoding {
    /// UTF-8 JSON, carried in text frames (binary frames holding UTF-8 JSON
    /// are accepted on receive).
    #[default]
    Json,
}

impl fmt::Display for FrameEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameEncoding::Json => write!(f, "json"),
        }
    }
}

impl FromStr for FrameEncoding {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(FrameEncoding::Json),
            other => Err(ValidationError::invalid_format(
                "frame_encoding",
                format!("unsupported encoding '{}'", other),
            )),
        }
    }
}

/// Per-route framing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramingConfig {
    pub request_tag: String,
    pub response_tag: String,
    pub error_tag: String,
    pub encoding: FrameEncoding,
}

impl FramingConfig {
    /// JSON framing with the given request/response tags.
    pub fn json(request_tag: impl Into<String>, response_tag: impl Into<String>) -> Self {
        Self {
            request_tag: request_tag.into(),
            response_tag: response_tag.into(),
            error_tag: DEFAULT_ERROR_TAG.to_string(),
            encoding: FrameEncoding::Json,
        }
    }

    /// Overrides the tag used for error frames.
    pub fn with_error_tag(mut self, error_tag: impl Into<String>) -> Self {
        self.error_tag = error_tag.into();
        self
    }

    /// Rejects empty tags.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_tag.trim().is_empty() {
            return Err(ValidationError::empty_field("framing.request_tag"));
        }
        if self.response_tag.trim().is_empty() {
            return Err(ValidationError::empty_field("framing.response_tag"));
        }
        if self.error_tag.trim().is_empty() {
            return Err(ValidationError::empty_field("framing.error_tag"));
        }
        Ok(())
    }
}

/// The envelope as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    pub tag: String,
    #[serde(default)]
    pub payload: Value,
}

/// Wraps and unwraps envelopes for one route.
#[derive(Debug, Clone)]
pub struct FramingCodec {
    config: FramingConfig,
}

impl FramingCodec {
    pub fn new(config: FramingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    /// Decodes an inbound frame, requiring the request tag.
    pub fn decode(&self, frame: &[u8]) -> Result<Value, CodecError> {
        self.decode_tagged(frame, &self.config.request_tag)
    }

    /// Decodes a frame produced by [`FramingCodec::encode`], requiring the
    /// response tag. Clients of a framed route use this side of the codec.
    pub fn decode_response(&self, frame: &[u8]) -> Result<Value, CodecError> {
        self.decode_tagged(frame, &self.config.response_tag)
    }

    /// Wraps a handler result under the response tag.
    pub fn encode(&self, payload: &Value) -> Result<String, CodecError> {
        self.encode_tagged(&self.config.response_tag, payload.clone())
    }

    /// Wraps a request payload under the request tag (client side).
    pub fn encode_request(&self, payload: &Value) -> Result<String, CodecError> {
        self.encode_tagged(&self.config.request_tag, payload.clone())
    }

    /// Wraps an error body under the error tag.
    pub fn encode_error(&self, body: &ErrorBody) -> Result<String, CodecError> {
        let payload =
            serde_json::to_value(body).map_err(|e| CodecError::Encode(e.to_string()))?;
        self.encode_tagged(&self.config.error_tag, payload)
    }

    fn decode_tagged(&self, frame: &[u8], expected: &str) -> Result<Value, CodecError> {
        let envelope = match self.config.encoding {
            FrameEncoding::Json => serde_json::from_slice::<Envelope>(frame)
                .map_err(|e| CodecError::Malformed(e.to_string()))?,
        };

        if envelope.tag != expected {
            return Err(CodecError::TagMismatch {
                expected: expected.to_string(),
                actual: envelope.tag,
            });
        }

        Ok(envelope.payload)
    }

    fn encode_tagged(&self, tag: &str, payload: Value) -> Result<String, CodecError> {
        let envelope = Envelope {
            tag: tag.to_string(),
            payload,
        };
        match self.config.encoding {
            FrameEncoding::Json => {
                serde_json::to_string(&envelope).map_err(|e| CodecError::Encode(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn codec() -> FramingCodec {
        FramingCodec::new(FramingConfig::json("REQUEST", "RESPONSE"))
    }

    #[test]
    fn decode_extracts_payload_for_request_tag() {
        let frame = br#"{"tag":"REQUEST","payload":{"hello":"world"}}"#;
        assert_eq!(codec().decode(frame).unwrap(), json!({"hello": "world"}));
    }

    #[test]
    fn decode_defaults_missing_payload_to_null() {
        let frame = br#"{"tag":"REQUEST"}"#;
        assert_eq!(codec().decode(frame).unwrap(), Value::Null);
    }

    #[test]
    fn decode_rejects_wrong_tag() {
        let frame = br#"{"tag":"RESPONSE","payload":1}"#;
        let err = codec().decode(frame).unwrap_err();
        assert_eq!(
            err,
            CodecError::TagMismatch {
                expected: "REQUEST".to_string(),
                actual: "RESPONSE".to_string(),
            }
        );
    }

    #[test]
    fn decode_rejects_non_json() {
        let err = codec().decode(b"not json").unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn decode_rejects_envelope_without_tag() {
        let err = codec().decode(br#"{"payload":1}"#).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn decode_rejects_unknown_envelope_fields() {
        let err = codec()
            .decode(br#"{"tag":"REQUEST","payload":1,"extra":true}"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn encode_uses_response_tag() {
        let frame = codec().encode(&json!({"at": "framed"})).unwrap();
        let envelope: Envelope = serde_json::from_str(&frame).unwrap();
        assert_eq!(envelope.tag, "RESPONSE");
        assert_eq!(envelope.payload, json!({"at": "framed"}));
    }

    #[test]
    fn encode_error_uses_error_tag() {
        let codec = FramingCodec::new(FramingConfig::json("REQ", "RES").with_error_tag("FAIL"));
        let body = ErrorBody {
            status_code: 400,
            error_code: "FRAME_REJECTED".to_string(),
            message: "bad".to_string(),
        };
        let envelope: Envelope = serde_json::from_str(&codec.encode_error(&body).unwrap()).unwrap();
        assert_eq!(envelope.tag, "FAIL");
        assert_eq!(envelope.payload["statusCode"], 400);
    }

    #[test]
    fn request_encoding_decodes_as_inbound() {
        let codec = codec();
        let frame = codec.encode_request(&json!([1, 2, 3])).unwrap();
        assert_eq!(codec.decode(frame.as_bytes()).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn config_validation_rejects_empty_tags() {
        assert!(FramingConfig::json("", "RESPONSE").validate().is_err());
        assert!(FramingConfig::json("REQUEST", " ").validate().is_err());
        assert!(FramingConfig::json("REQUEST", "RESPONSE")
            .with_error_tag("")
            .validate()
            .is_err());
        assert!(FramingConfig::json("REQUEST", "RESPONSE").validate().is_ok());
    }

    #[test]
    fn encoding_parses_case_insensitively() {
        assert_eq!("JSON".parse::<FrameEncoding>().unwrap(), FrameEncoding::Json);
        assert!("cbor".parse::<FrameEncoding>().is_err());
        assert_eq!(FrameEncoding::Json.to_string(), "json");
    }

    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-zA-Z0-9 _-]{0,16}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::hash_map("[a-z]{1,8}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn response_round_trip_preserves_value(value in json_value()) {
            let codec = codec();
            let frame = codec.encode(&value).unwrap();
            prop_assert_eq!(codec.decode_response(frame.as_bytes()).unwrap(), value);
        }
    }
}
