//! Response envelope codec
//!
//! Every control-plane response is wrapped as `{"data": ..., "error": ...}`.
//! Error bodies come in several shapes: the structured
//! `{"error": {"type", "message", "code"}}`, a bare `{"error": "text"}`, or
//! an object that only carries `message`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, DecodeStage, Result};

/// Outer response wrapper
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// Decode a successful response body into `T`.
///
/// A missing or null `data` is decoded as JSON `null`, so `Option` and
/// unit destinations accept it and struct destinations report a data error.
pub fn decode_data<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    let data = open(status, body)?.unwrap_or(Value::Null);
    serde_json::from_value(data).map_err(|source| ClientError::Decode {
        stage: DecodeStage::Data,
        source,
    })
}

/// Check a successful response body without decoding its payload.
pub fn decode_empty(status: u16, body: &[u8]) -> Result<()> {
    open(status, body).map(|_| ())
}

/// Build the error for a response with status >= 400.
pub fn decode_error(status: u16, body: &[u8]) -> ClientError {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(|e| api_error(status, e)))
        .unwrap_or(ClientError::UnexpectedStatus(status))
}

/// Open the envelope, returning `data` when no error is present.
fn open(status: u16, body: &[u8]) -> Result<Option<Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|source| ClientError::Decode {
            stage: DecodeStage::Envelope,
            source,
        })?;

    match envelope.error {
        Some(error) if !error.is_null() => Err(api_error(status, &error).unwrap_or_else(|| {
            ClientError::Api {
                status,
                kind: None,
                message: error.to_string(),
                code: None,
            }
        })),
        _ => Ok(envelope.data),
    }
}

/// Interpret an `error` value in any of the accepted shapes.
fn api_error(status: u16, error: &Value) -> Option<ClientError> {
    match error {
        Value::String(message) => Some(ClientError::Api {
            status,
            kind: None,
            message: message.clone(),
            code: None,
        }),
        Value::Object(fields) => {
            let message = fields.get("message")?.as_str()?.to_string();
            let kind = fields
                .get("type")
                .and_then(Value::as_str)
                .filter(|k| !k.is_empty())
                .map(str::to_string);
            let code = fields.get("code").and_then(|code| match code {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
            Some(ClientError::Api {
                status,
                kind,
                message,
                code,
            })
        }
        _ => None,
    }
}
