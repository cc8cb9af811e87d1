//! Body serialization.

use bytes::Bytes;
use serde_json::Value;

use crate::metadata::ResultType;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("encode error: {message}")]
    Encode { message: String },

    #[error("decode error ({type_hint}): {message}")]
    Decode { type_hint: String, message: String },
}

/// Converts request and response bodies to and from bytes.
///
/// Codecs work on `serde_json::Value`; the executor maps values onto the
/// caller's Rust types with serde.
pub trait Codec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<Bytes, CodecError>;

    fn decode(&self, bytes: &[u8], type_hint: &ResultType) -> Result<Value, CodecError>;

    /// Content type announced for encoded bodies.
    fn content_type(&self) -> &'static str;
}

/// A codec that handles JSON encoding/decoding.
///
/// This is the default codec. A body that is not valid JSON decodes as a
/// JSON string when the route expects text, so plain-text endpoints work.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<Bytes, CodecError> {
        let bytes = serde_json::to_vec(value).map_err(|e| CodecError::Encode {
            message: e.to_string(),
        })?;
        Ok(Bytes::from(bytes))
    }

    fn decode(&self, bytes: &[u8], type_hint: &ResultType) -> Result<Value, CodecError> {
        let type_name = match type_hint {
            ResultType::Unit => return Ok(Value::Null),
            ResultType::Value(name) => name,
        };

        match serde_json::from_slice(bytes) {
            Ok(value) => Ok(value),
            Err(e) if is_text(type_name) => match std::str::from_utf8(bytes) {
                Ok(text) => Ok(Value::String(text.to_string())),
                Err(_) => Err(CodecError::Decode {
                    type_hint: type_name.clone(),
                    message: e.to_string(),
                }),
            },
            Err(e) => Err(CodecError::Decode {
                type_hint: type_name.clone(),
                message: e.to_string(),
            }),
        }
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

fn is_text(type_name: &str) -> bool {
    matches!(type_name, "String" | "str" | "&str")
}
