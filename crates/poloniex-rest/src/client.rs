//! Main REST client implementation

use crate::classify::classify;
use crate::endpoints::{MarketEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::params::RequestParams;
use crate::registry::{self, MethodKind, MethodSpec};
use crate::transport::{HttpRequest, HttpTransport, Transport, TransportOptions, Verb};
use poloniex_auth::{Credentials, NonceGenerator};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Public (unauthenticated) endpoint
pub const PUBLIC_URL: &str = "https://poloniex.com/public";

/// Private (trading) endpoint
pub const PRIVATE_URL: &str = "https://poloniex.com/tradingApi";

const DEFAULT_USER_AGENT: &str = concat!("poloniex-rest/", env!("CARGO_PKG_VERSION"));

/// Poloniex REST API client
///
/// Routes a method name to the public or private surface, attaches the
/// command (and for private methods the nonce and signature), performs the
/// HTTP exchange and classifies the response.
///
/// Cloning is cheap. Clones share the transport, the credentials and the
/// nonce generator, so concurrent calls through any clone still see strictly
/// increasing nonces.
///
/// # Example
///
/// ```no_run
/// use poloniex_rest::{Credentials, PoloniexClient, RequestParams};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public methods only
///     let client = PoloniexClient::new()?;
///     let ticker = client.call("returnTicker", None).await?;
///
///     // With authentication for private methods
///     let creds = Credentials::from_env()?;
///     let auth_client = PoloniexClient::with_credentials(creds)?;
///     let params = RequestParams::new().with("currencyPair", "BTC_ETH");
///     let orders = auth_client.call("returnOpenOrders", Some(params)).await?;
///
///     Ok(())
/// }
/// ```
pub struct PoloniexClient<T: Transport = HttpTransport> {
    transport: Arc<T>,
    credentials: Option<Arc<Credentials>>,
    nonces: Arc<NonceGenerator>,
    public_url: Arc<str>,
    private_url: Arc<str>,
}

impl PoloniexClient<HttpTransport> {
    /// Create a new client without authentication
    ///
    /// Only public methods will succeed; private methods fail with
    /// [`RestError::Configuration`].
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::default().with_credentials(credentials))
    }

    /// Create a new client from a raw key and secret
    ///
    /// An empty key or secret leaves the client without credentials rather
    /// than failing construction.
    pub fn with_keys(api_key: impl Into<String>, secret: impl AsRef<[u8]>) -> RestResult<Self> {
        Self::with_config(ClientConfig::default().with_keys(api_key, secret))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let transport = HttpTransport::new(&config.transport_options())?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> PoloniexClient<T> {
    /// Create a client on top of a custom transport
    ///
    /// Timeout, keep-alive and user agent are transport concerns and are
    /// ignored here; endpoints and credentials are taken from `config`.
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        info!(
            has_credentials = config.credentials.is_some(),
            "Created Poloniex REST client"
        );

        Self {
            transport: Arc::new(transport),
            credentials: config.credentials.map(Arc::new),
            nonces: Arc::new(NonceGenerator::new()),
            public_url: config.public_url.into(),
            private_url: config.private_url.into(),
        }
    }

    /// Check if the client has credentials for private methods
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Call a remote method by name
    ///
    /// The registry decides whether the call is public or private. Names
    /// outside the registry fail with [`RestError::UnknownMethod`] without
    /// any network I/O.
    #[instrument(skip(self, params))]
    pub async fn call(&self, method: &str, params: Option<RequestParams>) -> RestResult<Value> {
        let spec = registry::resolve(method)
            .ok_or_else(|| RestError::UnknownMethod(method.to_string()))?;
        self.dispatch(spec, params).await
    }

    /// Call a method on the public surface
    #[instrument(skip(self, params))]
    pub async fn call_public(
        &self,
        method: &str,
        params: Option<RequestParams>,
    ) -> RestResult<Value> {
        let spec = registry::lookup(method, MethodKind::Public)
            .ok_or_else(|| RestError::UnknownMethod(method.to_string()))?;
        self.dispatch(spec, params).await
    }

    /// Call a method on the private surface
    #[instrument(skip(self, params))]
    pub async fn call_private(
        &self,
        method: &str,
        params: Option<RequestParams>,
    ) -> RestResult<Value> {
        let spec = registry::lookup(method, MethodKind::Private)
            .ok_or_else(|| RestError::UnknownMethod(method.to_string()))?;
        self.dispatch(spec, params).await
    }

    /// Call a remote method and decode the success payload
    pub async fn call_as<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<RequestParams>,
    ) -> RestResult<R> {
        let value = self.call(method, params).await?;
        decode(method, value)
    }

    pub(crate) async fn public_as<R: DeserializeOwned>(
        &self,
        method: &str,
        params: RequestParams,
    ) -> RestResult<R> {
        let value = self.call_public(method, Some(params)).await?;
        decode(method, value)
    }

    pub(crate) async fn private_as<R: DeserializeOwned>(
        &self,
        method: &str,
        params: RequestParams,
    ) -> RestResult<R> {
        let value = self.call_private(method, Some(params)).await?;
        decode(method, value)
    }

    async fn dispatch(
        &self,
        spec: &MethodSpec,
        params: Option<RequestParams>,
    ) -> RestResult<Value> {
        let request = self.build_request(spec, params.unwrap_or_default())?;

        debug!(method = spec.name, kind = %spec.kind, verb = %request.verb, "Dispatching request");

        let response = self.transport.send(request).await?;
        classify(&response.body).into_result()
    }

    /// Build the outbound request for a method
    ///
    /// Private requests draw a fresh nonce here, so a built request must be
    /// sent at most once.
    pub(crate) fn build_request(
        &self,
        spec: &MethodSpec,
        mut params: RequestParams,
    ) -> RestResult<HttpRequest> {
        params.remove("command");
        params.remove("nonce");

        let mut wire = RequestParams::new().with("command", spec.name);
        for (key, value) in params.iter() {
            wire.insert(key, value.clone());
        }

        match spec.kind {
            MethodKind::Public => {
                let query = wire.encode()?;
                Ok(HttpRequest {
                    verb: Verb::Get,
                    url: format!("{}?{}", self.public_url, query),
                    headers: Vec::new(),
                    body: None,
                })
            }
            MethodKind::Private => {
                let credentials = self.credentials.as_ref().ok_or_else(|| {
                    RestError::Configuration(format!(
                        "method {} requires API credentials",
                        spec.name
                    ))
                })?;

                wire.insert("nonce", self.nonces.generate().as_u64());
                let body = wire.encode()?;
                let signature = credentials.sign(&body);

                Ok(HttpRequest {
                    verb: Verb::Post,
                    url: self.private_url.to_string(),
                    headers: vec![
                        ("Key".to_string(), credentials.api_key().to_string()),
                        ("Sign".to_string(), signature),
                        (
                            "Content-Type".to_string(),
                            "application/x-www-form-urlencoded".to_string(),
                        ),
                    ],
                    body: Some(body),
                })
            }
        }
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    /// Get public market endpoints
    pub fn market(&self) -> MarketEndpoints<'_, T> {
        MarketEndpoints::new(self)
    }

    /// Get trading endpoints (requires credentials)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_, T>> {
        if !self.has_credentials() {
            return Err(RestError::Configuration(
                "trading endpoints require API credentials".to_string(),
            ));
        }
        Ok(TradingEndpoints::new(self))
    }
}

impl<T: Transport> Clone for PoloniexClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            credentials: self.credentials.clone(),
            nonces: Arc::clone(&self.nonces),
            public_url: Arc::clone(&self.public_url),
            private_url: Arc::clone(&self.private_url),
        }
    }
}

impl<T: Transport> std::fmt::Debug for PoloniexClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoloniexClient")
            .field("has_credentials", &self.has_credentials())
            .field("public_url", &self.public_url)
            .field("private_url", &self.private_url)
            .finish()
    }
}

pub(crate) fn decode<R: DeserializeOwned>(method: &str, value: Value) -> RestResult<R> {
    serde_json::from_value(value).map_err(|source| RestError::Decode {
        method: method.to_string(),
        source,
    })
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Upper bound on each outbound call
    pub timeout: Duration,
    /// Reuse connections between calls
    pub keep_alive: bool,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Public endpoint URL
    pub public_url: String,
    /// Private endpoint URL
    pub private_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            keep_alive: false,
            user_agent: None,
            public_url: PUBLIC_URL.to_string(),
            private_url: PRIVATE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set credentials from a raw key and secret
    ///
    /// Empty values leave the configuration without credentials.
    pub fn with_keys(mut self, api_key: impl Into<String>, secret: impl AsRef<[u8]>) -> Self {
        match Credentials::new(api_key, secret) {
            Ok(credentials) => self.credentials = Some(credentials),
            Err(e) => {
                debug!("No usable credentials: {}", e);
                self.credentials = None;
            }
        }
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable connection reuse
    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the public endpoint
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = url.into();
        self
    }

    /// Override the private endpoint
    pub fn with_private_url(mut self, url: impl Into<String>) -> Self {
        self.private_url = url.into();
        self
    }

    pub(crate) fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            timeout: self.timeout,
            keep_alive: self.keep_alive,
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}
