//! # dnsme-provider
//!
//! Client library for the [DNS Made Easy](https://dnsmadeeasy.com/) REST API (V1.2):
//! managed domains and their DNS records.
//!
//! Every call flows through one request executor which
//!
//! - signs the request right before it is sent (`x-dnsme-apiKey`, `x-dnsme-requestDate`,
//!   `x-dnsme-hmac` = hex HMAC-SHA1 of the date keyed by the secret key),
//! - records the `x-dnsme-requestsRemaining` header in a shared [`RateLimitState`],
//! - waits a fixed cooldown (30 s by default) and retries when that header reports zero,
//!   for at most 10 attempts,
//! - maps HTTP 403 to [`ProviderError::Forbidden`] and HTTP 404 to
//!   [`ProviderError::NotFound`].
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dnsme_provider::{DnsApi, DnsMadeEasyClient, RecordFilter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // DNSME_API_KEY / DNSME_SECRET_KEY / DNSME_API_URL
//!     let client = DnsMadeEasyClient::from_env()?;
//!
//!     for domain in client.list_domains().await? {
//!         let records = client.list_records(&domain, &RecordFilter::default()).await?;
//!         for record in &records {
//!             println!("{domain}: {} {} {}", record.name, record.record_type, record.data);
//!         }
//!     }
//!
//!     println!("{} requests left", client.requests_remaining());
//!     Ok(())
//! }
//! ```
//!
//! ## Creating Records
//!
//! ```rust,no_run
//! # use dnsme_provider::*;
//! # async fn example(client: &DnsMadeEasyClient) -> Result<()> {
//! let record = ApiRecord {
//!     name: "www".to_string(),
//!     record_type: "A".to_string(),
//!     data: "192.0.2.1".to_string(),
//!     gtd_location: "DEFAULT".to_string(),
//!     ttl: 1800,
//!     ..ApiRecord::default()
//! };
//! let created = client.create_record("example.com", &record).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). A non-empty `error`
//! list in a response body surfaces as [`ProviderError::ApiError`]. Quota exhaustion is not
//! an error: once all attempts are used, the last response is handed back as is.
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade and are discarded unless
//! the application installs a logger. Each quota cooldown emits a `warn` record such as
//!
//! ```text
//! [dnsmadeeasy] API rate-limit exceeded, sleeping for 30.0s (attempt 1 of 10)
//! ```
//!
//! To get these lines on stderr, initialise a logger such as `env_logger` at startup and
//! enable at least `warn` for this crate, e.g. `RUST_LOG=dnsme_provider=warn`.

mod client;
mod config;
mod error;
mod http_client;
mod rate_limit;
mod sign;
mod traits;
mod types;
mod utils;

pub use client::{DnsMadeEasyClient, DnsMadeEasyClientBuilder};
pub use config::{
    API_KEY_ENV, API_URL_ENV, Credentials, DNSME_API_URL, DNSME_SANDBOX_API_URL,
    SECRET_KEY_ENV, api_url_from_env,
};
pub use error::{ProviderError, Result};
pub use http_client::{
    ApiResponse, DEFAULT_COOLDOWN, DEFAULT_MAX_ATTEMPTS, RequestExecutor, RetrySettings,
    TransportSettings,
};
pub use rate_limit::{MissingQuotaPolicy, RateLimitState};
pub use sign::{Authenticator, format_request_date};
pub use traits::DnsApi;
pub use types::{ApiDomain, ApiDomainList, ApiRecord, RecordFilter};
