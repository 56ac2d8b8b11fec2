//! Common test utilities and fixtures for integration tests
//!
//! Payloads follow the shapes returned by the Poloniex public and trading APIs.

use poloniex_rest::{ClientConfig, Credentials, PoloniexClient};
use std::time::Duration;
use wiremock::MockServer;

pub const API_KEY: &str = "TEST-API-KEY-0001";
pub const API_SECRET: &str = "test-api-secret";

/// Sample ticker response
pub const TICKER_RESPONSE: &str = r#"{"BTC_ETH":{"last":"0.03"}}"#;

/// Sample balances response
pub const BALANCES_RESPONSE: &str = r#"{"BTC":"0.59098578","LTC":"3.31117268"}"#;

/// Sample business error
pub const INVALID_ORDER_RESPONSE: &str = r#"{"error":"Invalid order number."}"#;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Install a tracing subscriber honoring `RUST_LOG`
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Configuration pointing both endpoints at the mock server
pub fn mock_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new()
        .with_public_url(format!("{}/public", server.uri()))
        .with_private_url(format!("{}/tradingApi", server.uri()))
        .with_timeout(Duration::from_secs(2))
}

/// Authenticated client against the mock server
pub fn auth_client(server: &MockServer) -> PoloniexClient {
    let creds = Credentials::new(API_KEY, API_SECRET).expect("valid test credentials");
    PoloniexClient::with_config(mock_config(server).with_credentials(creds))
        .expect("client should build")
}
