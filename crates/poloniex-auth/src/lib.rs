//! Authentication primitives for the Poloniex trading API
//!
//! Private Poloniex methods are sent as a URL-encoded POST body that carries a
//! strictly increasing nonce, and are authenticated with two headers:
//!
//! - `Key`: the API key
//! - `Sign`: base64(HMAC-SHA512(secret, body))
//!
//! This crate provides the three pieces needed to build such a request:
//! [`Credentials`], [`NonceGenerator`] and [`sign`].
//!
//! # Example
//!
//! ```no_run
//! use poloniex_auth::{Credentials, NonceGenerator};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::from_env()?;
//!     let nonces = NonceGenerator::new();
//!
//!     let body = format!("command=returnBalances&nonce={}", nonces.generate());
//!     let signature = creds.sign(&body);
//!     println!("Key: {}\nSign: {}", creds.api_key(), signature);
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod nonce;
mod signer;

pub use credentials::{Credentials, API_KEY_ENV, API_SECRET_ENV};
pub use error::{AuthError, AuthResult};
pub use nonce::{Nonce, NonceGenerator, COUNTER_WIDTH, MAX_PER_MILLISECOND};
pub use signer::sign;
