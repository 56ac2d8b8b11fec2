//! Error types for REST API operations

use crate::transport::TransportError;
use poloniex_auth::AuthError;

/// Errors that can occur during REST API operations
///
/// None of these are retried by the client. Each call settles exactly once
/// with either a value or one of these errors.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Method name is not in the registry; no request was made
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// Private method requested without usable credentials; no request was made
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection, TLS, DNS, I/O or timeout failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Transport succeeded but the body is not valid JSON
    #[error("Malformed response ({len} bytes): {cause}", len = .raw.len())]
    MalformedResponse {
        /// Body exactly as received
        raw: Vec<u8>,
        /// JSON parse diagnostic
        #[source]
        cause: serde_json::Error,
    },

    /// The exchange reported a business error in the `error` field
    #[error("API error: {0}")]
    Application(String),

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A successful payload did not match the expected model
    #[error("Failed to decode {method} response: {source}")]
    Decode {
        /// Remote method name
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// Credential handling failed
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl RestError {
    /// Check if this error was raised by the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this error is a transport timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout(_)))
    }

    /// Check if this error was detected before any network I/O
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::UnknownMethod(_) | Self::Configuration(_) | Self::InvalidParameter(_) | Self::Auth(_)
        )
    }

    /// Raw response body, for malformed responses
    pub fn raw_body(&self) -> Option<&[u8]> {
        match self {
            Self::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Exchange-provided error message, for application errors
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Application(message) => Some(message),
            _ => None,
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
