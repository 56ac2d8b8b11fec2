//! Authentication credentials for the Poloniex trading API
//!
//! # Security
//!
//! The API secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use secrecy::{ExposeSecret, SecretBox};

use crate::error::{AuthError, AuthResult};
use crate::signer;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "POLONIEX_API_KEY";

/// Environment variable holding the API secret
pub const API_SECRET_ENV: &str = "POLONIEX_API_SECRET";

/// API credentials for authenticated requests
///
/// The secret is used verbatim (its UTF-8 bytes) as the HMAC key and is
/// zeroized when the Credentials are dropped.
pub struct Credentials {
    /// API key (sent as the `Key` header)
    api_key: String,
    /// API secret (zeroized on drop)
    secret: SecretBox<Vec<u8>>,
}

impl Credentials {
    /// Create new credentials from an API key and secret
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] if either value is empty.
    /// Signing with an empty secret would only produce requests the
    /// exchange rejects.
    pub fn new(api_key: impl Into<String>, secret: impl AsRef<[u8]>) -> AuthResult<Self> {
        let api_key = api_key.into();
        let secret = secret.as_ref();

        if api_key.is_empty() {
            return Err(AuthError::InvalidCredentials("API key is empty".to_string()));
        }
        if secret.is_empty() {
            return Err(AuthError::InvalidCredentials("API secret is empty".to_string()));
        }

        Ok(Self {
            api_key,
            secret: SecretBox::new(Box::new(secret.to_vec())),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `POLONIEX_API_KEY` and `POLONIEX_API_SECRET` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_KEY_ENV.to_string()))?;
        let secret = std::env::var(API_SECRET_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_SECRET_ENV.to_string()))?;

        Self::new(api_key, secret)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a URL-encoded request body
    ///
    /// # Returns
    /// Base64-encoded HMAC-SHA512 signature, the value of the `Sign` header.
    pub fn sign(&self, body: &str) -> String {
        signer::sign(self.secret.expose_secret(), body.as_bytes())
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates new SecretBox with same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret: SecretBox::new(Box::new(self.secret.expose_secret().clone())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let visible = self
            .api_key
            .char_indices()
            .nth(8)
            .map_or(self.api_key.as_str(), |(idx, _)| &self.api_key[..idx]);

        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", visible))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("ABCDEFGH-IJKLMNOP", "my_private_secret").unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("my_private_secret"));
        assert!(!debug.contains("IJKLMNOP"));
        assert!(debug.contains("ABCDEFGH..."));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_empty_values_rejected() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(AuthError::InvalidCredentials(_))
        ));
        assert!(matches!(
            Credentials::new("key", ""),
            Err(AuthError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_sign_uses_raw_secret_bytes() {
        let creds = Credentials::new("key", "secret").unwrap();
        let body = "command=returnBalances&nonce=16164923765940000";
        assert_eq!(creds.sign(body), signer::sign(b"secret", body.as_bytes()));
    }

    #[test]
    fn test_clone_signs_identically() {
        let creds = Credentials::new("key", "secret").unwrap();
        let cloned = creds.clone();
        assert_eq!(cloned.api_key(), "key");
        assert_eq!(cloned.sign("nonce=1"), creds.sign("nonce=1"));
    }
}
