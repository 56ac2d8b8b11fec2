//! REST API client for the Poloniex cryptocurrency exchange
//!
//! The client turns a named remote method plus parameters into either a
//! decoded JSON value or a typed [`RestError`].
//!
//! # Features
//!
//! - **Routing**: a closed registry decides whether a method is public
//!   (GET, unsigned) or private (POST, signed)
//! - **Signing**: strictly increasing nonces and HMAC-SHA512 over the exact
//!   body that is sent
//! - **Classification**: an `error` field in a 200 response is still a
//!   failure, and a non-JSON body keeps its raw bytes
//! - **Endpoints**: market data, balances, orders, withdrawals and a total
//!   balance aggregation on top of the generic dispatcher
//!
//! # Example
//!
//! ```no_run
//! use poloniex_rest::{Credentials, PoloniexClient};
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = PoloniexClient::new()?;
//!     let ticker = client.market().get_ticker("BTC_ETH").await?;
//!     println!("BTC/ETH: {:?}", ticker);
//!
//!     // Private endpoints (auth required)
//!     let creds = Credentials::from_env()?;
//!     let auth_client = PoloniexClient::with_credentials(creds)?;
//!     let balances = auth_client.trading()?.get_balances().await?;
//!     println!("Balances: {:?}", balances);
//!
//!     let total: Decimal = auth_client.get_total_btc_balance().await?;
//!     println!("Total (BTC): {}", total);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Retries
//!
//! The client never retries. Every error is returned to the caller as-is.

pub mod balance;
pub mod classify;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod params;
pub mod registry;
pub mod transport;
pub mod types;

// Re-export main types
pub use classify::{classify, Classification};
pub use client::{ClientConfig, PoloniexClient, PRIVATE_URL, PUBLIC_URL};
pub use error::{RestError, RestResult};
pub use params::{ParamValue, RequestParams};
pub use poloniex_auth::{AuthError, Credentials, Nonce, NonceGenerator};
pub use registry::{MethodKind, MethodSpec};
pub use transport::{HttpRequest, HttpTransport, RawResponse, Transport, TransportError, Verb};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;

// Re-export endpoint-specific types
pub use types::{
    // Market data
    BookLevel, OrderBook, PublicTrade, Ticker,
    // Account
    AccountTrade, Balances, OpenOrder,
    // Trading
    CancelOrderResult, OrderResponse, OrderSide, ResultingTrade, WithdrawResult,
};
