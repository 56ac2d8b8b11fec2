//! Response classification
//!
//! Poloniex reports business failures (insufficient balance, invalid pair,
//! bad nonce) inside a JSON body with an `error` field, usually with an HTTP
//! 200. A successful HTTP exchange is therefore necessary but not sufficient
//! for a successful call.

use crate::error::{RestError, RestResult};
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of inspecting a raw response body
#[derive(Debug)]
pub enum Classification {
    /// Parsed JSON without an error marker
    Success(Value),
    /// Parsed JSON whose `error` field is set
    ApplicationError(String),
    /// Body is not JSON
    Malformed {
        /// Body exactly as received
        raw: Vec<u8>,
        /// Parse diagnostic
        cause: serde_json::Error,
    },
}

impl Classification {
    /// Convert into the call result
    pub fn into_result(self) -> RestResult<Value> {
        match self {
            Self::Success(value) => Ok(value),
            Self::ApplicationError(message) => Err(RestError::Application(message)),
            Self::Malformed { raw, cause } => Err(RestError::MalformedResponse { raw, cause }),
        }
    }
}

/// Classify a raw response body
pub fn classify(raw: &[u8]) -> Classification {
    let value: Value = match serde_json::from_slice(raw) {
        Ok(value) => value,
        Err(cause) => {
            warn!(
                len = raw.len(),
                body = %String::from_utf8_lossy(&raw[..raw.len().min(256)]),
                "Response is not valid JSON: {}",
                cause
            );
            return Classification::Malformed {
                raw: raw.to_vec(),
                cause,
            };
        }
    };

    if let Some(message) = error_message(&value) {
        warn!(error = %message, "API returned an error");
        return Classification::ApplicationError(message);
    }

    debug!("Response classified as success");
    Classification::Success(value)
}

/// Extract the error message if the payload carries a set `error` field
fn error_message(value: &Value) -> Option<String> {
    let error = value.as_object()?.get("error")?;
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
