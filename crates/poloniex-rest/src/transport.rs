//! HTTP transport abstraction
//!
//! The client performs exactly one HTTP exchange per call through the
//! [`Transport`] trait. [`HttpTransport`] is the reqwest-backed
//! implementation; [`MockTransport`] replays canned responses and records
//! what was sent, so routing and signing can be tested without a network.

use crate::error::{RestError, RestResult};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// Request did not complete within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection could not be established (DNS, TCP, TLS)
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    /// Failure while writing the request or reading the response
    #[error("I/O error: {0}")]
    Io(#[source] BoxError),
}

/// HTTP verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Public methods
    Get,
    /// Private methods
    Post,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A fully built outbound request
///
/// For private methods this carries the signed body and the `Key`/`Sign`
/// headers; it is built once per call and never reused.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP verb
    pub verb: Verb,
    /// Absolute URL, including the query string for GET
    pub url: String,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
    /// URL-encoded body for POST
    pub body: Option<String>,
}

impl HttpRequest {
    /// Get a header value by (case-insensitive) name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response as received from the wire
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Undecoded body
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Create a 200 response with the given body
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Trait for HTTP transport abstraction
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one HTTP exchange
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError>;
}

/// Options for building an [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Upper bound on the whole exchange
    pub timeout: Duration,
    /// Keep idle connections for reuse
    pub keep_alive: bool,
    /// `User-Agent` header
    pub user_agent: String,
}

/// Real HTTP transport using reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// Fails with [`RestError::Configuration`] when reqwest rejects the
    /// options or the TLS backend cannot initialize.
    pub fn new(options: &TransportOptions) -> RestResult<Self> {
        let mut builder = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str());

        if !options.keep_alive {
            builder = builder.pool_max_idle_per_host(0);
        }

        let client = builder
            .build()
            .map_err(|e| RestError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: options.timeout,
        })
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_connect() {
            TransportError::Connect(Box::new(err))
        } else {
            TransportError::Io(Box::new(err))
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(verb = %request.verb))]
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        let mut builder = match request.verb {
            Verb::Get => self.client.get(&request.url),
            Verb::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        if status.is_success() {
            debug!(status = status.as_u16(), len = body.len(), "Received response");
        } else {
            warn!(status = status.as_u16(), len = body.len(), "Non-success HTTP status");
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

/// Mock transport for testing
///
/// Allows injecting predefined responses and capturing sent requests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct MockTransport {
    responses: parking_lot::Mutex<std::collections::VecDeque<Result<RawResponse, TransportError>>>,
    requests: parking_lot::Mutex<Vec<HttpRequest>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a 200 response with the given body
    pub fn push_response(&self, body: impl Into<Vec<u8>>) {
        self.responses.lock().push_back(Ok(RawResponse::ok(body)));
    }

    /// Add a response with an explicit status
    pub fn push_status(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.responses.lock().push_back(Ok(RawResponse {
            status,
            body: body.into(),
        }));
    }

    /// Simulate a transport failure
    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Requests captured so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of times `send` was invoked
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().push(request);
        self.responses.lock().pop_front().unwrap_or_else(|| {
            Err(TransportError::Io(
                "mock transport has no queued response".into(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest {
            verb: Verb::Post,
            url: "https://example.invalid/tradingApi".to_string(),
            headers: vec![("Key".to_string(), "abc".to_string())],
            body: Some("command=returnBalances".to_string()),
        }
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = request();
        assert_eq!(req.header("key"), Some("abc"));
        assert_eq!(req.header("Sign"), None);
    }

    #[test]
    fn test_http_transport_builds() {
        let options = TransportOptions {
            timeout: Duration::from_secs(1),
            keep_alive: false,
            user_agent: "poloniex-rest-test".to_string(),
        };
        assert!(HttpTransport::new(&options).is_ok());
    }

    #[test]
    fn test_http_transport_build_failure_is_configuration() {
        let options = TransportOptions {
            timeout: Duration::from_secs(1),
            keep_alive: false,
            user_agent: "bad\nagent".to_string(),
        };
        let result = HttpTransport::new(&options);
        assert!(matches!(result, Err(RestError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_mock_replays_in_order_and_records() {
        let mock = MockTransport::new();
        mock.push_response("first");
        mock.push_error(TransportError::Timeout(Duration::from_secs(1)));

        let first = mock.send(request()).await.unwrap();
        assert_eq!(first.body, b"first");

        let second = mock.send(request()).await;
        assert!(matches!(second, Err(TransportError::Timeout(_))));

        let third = mock.send(request()).await;
        assert!(matches!(third, Err(TransportError::Io(_))));

        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.requests()[0], request());
    }
}
