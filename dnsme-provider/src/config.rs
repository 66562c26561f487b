//! Credentials, endpoints and environment loading

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::mask_secret;

/// Production endpoint of the V1.2 REST API.
pub const DNSME_API_URL: &str = "https://api.dnsmadeeasy.com/V1.2";
/// Sandbox endpoint of the V1.2 REST API.
pub const DNSME_SANDBOX_API_URL: &str = "https://api.sandbox.dnsmadeeasy.com/V1.2";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "DNSME_API_KEY";
/// Environment variable holding the secret key.
pub const SECRET_KEY_ENV: &str = "DNSME_SECRET_KEY";
/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "DNSME_API_URL";

/// API key / secret key pair issued by DNS Made Easy.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub api_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Read credentials from `DNSME_API_KEY` and `DNSME_SECRET_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(require_env(API_KEY_ENV)?, require_env(SECRET_KEY_ENV)?))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask_secret(&self.api_key))
            .field("secret_key", &"****")
            .finish()
    }
}

/// Base URL from `DNSME_API_URL`, falling back to production.
pub fn api_url_from_env() -> String {
    env::var(API_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DNSME_API_URL.to_string())
}

fn require_env(variable: &str) -> Result<String> {
    match env::var(variable) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ProviderError::MissingCredentials {
            variable: variable.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secret() {
        let creds = Credentials::new("1c1a3c91-4770", "c9b5625f-9834");
        let debug = format!("{creds:?}");
        assert!(debug.contains("1c1a****"));
        assert!(!debug.contains("c9b5625f"));
        assert!(!debug.contains("4770"));
    }

    #[test]
    fn serde_uses_camel_case() {
        let creds: Credentials =
            serde_json::from_str(r#"{"apiKey":"key","secretKey":"secret"}"#).unwrap();
        assert_eq!(creds, Credentials::new("key", "secret"));
    }

    #[test]
    fn missing_variable_is_reported_by_name() {
        let err = require_env("DNSME_TEST_SURELY_UNSET_VARIABLE").unwrap_err();
        assert!(matches!(
            err,
            ProviderError::MissingCredentials { ref variable }
                if variable == "DNSME_TEST_SURELY_UNSET_VARIABLE"
        ));
    }
}
