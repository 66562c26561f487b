//! DNS Made Easy API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{Credentials, DNSME_API_URL, DNSME_SANDBOX_API_URL, api_url_from_env};
use crate::error::{ProviderError, Result};
use crate::http_client::{
    ApiResponse, PROVIDER_NAME, RequestExecutor, RetrySettings, TransportSettings,
    create_http_client,
};
use crate::rate_limit::{MissingQuotaPolicy, RateLimitState};
use crate::sign::Authenticator;
use crate::traits::DnsApi;
use crate::types::{ApiDomain, ApiDomainList, ApiRecord, RecordFilter};
use crate::utils::log_sanitizer::{mask_secret, truncate_for_log};

/// Bare `{"error": [...]}` envelope returned alongside failing statuses.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Vec<String>,
}

/// DNS Made Easy API client
pub struct DnsMadeEasyClient {
    executor: RequestExecutor,
    api_url: String,
}

/// `DnsMadeEasyClient` Builder
pub struct DnsMadeEasyClientBuilder {
    credentials: Credentials,
    api_url: String,
    retry: RetrySettings,
    transport: TransportSettings,
    rate_limit: Option<RateLimitState>,
}

impl DnsMadeEasyClientBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_url: DNSME_API_URL.to_string(),
            retry: RetrySettings::default(),
            transport: TransportSettings::default(),
            rate_limit: None,
        }
    }

    /// Base URL, e.g. [`DNSME_SANDBOX_API_URL`] or a mock server.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn sandbox(self) -> Self {
        self.api_url(DNSME_SANDBOX_API_URL)
    }

    /// Total attempts per request (initial try + retries), at least 1.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.retry.max_attempts = attempts;
        self
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.retry.cooldown = cooldown;
        self
    }

    pub fn missing_quota_policy(mut self, policy: MissingQuotaPolicy) -> Self {
        self.retry.missing_quota_policy = policy;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.transport.connect_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.transport.request_timeout = timeout;
        self
    }

    /// Share a quota view with other clients using the same API key.
    pub fn rate_limit(mut self, state: RateLimitState) -> Self {
        self.rate_limit = Some(state);
        self
    }

    pub fn build(self) -> Result<DnsMadeEasyClient> {
        let api_url = self.api_url.trim_end_matches('/').to_string();
        if api_url.is_empty() {
            return Err(ProviderError::InvalidParameter {
                param: "api_url".to_string(),
                detail: "must not be empty".to_string(),
            });
        }

        let authenticator = Authenticator::new(&self.credentials)?;
        let executor = RequestExecutor::new(
            create_http_client(self.transport)?,
            authenticator,
            self.rate_limit.unwrap_or_default(),
            self.retry,
        );

        log::debug!(
            "[{PROVIDER_NAME}] Client ready: {api_url}, api key {}",
            mask_secret(&self.credentials.api_key)
        );

        Ok(DnsMadeEasyClient { executor, api_url })
    }
}

impl DnsMadeEasyClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> DnsMadeEasyClientBuilder {
        DnsMadeEasyClientBuilder::new(credentials)
    }

    /// Client configured from `DNSME_API_KEY`, `DNSME_SECRET_KEY` and `DNSME_API_URL`.
    pub fn from_env() -> Result<Self> {
        Self::builder(Credentials::from_env()?)
            .api_url(api_url_from_env())
            .build()
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Remaining quota reported by the most recent response.
    pub fn requests_remaining(&self) -> u32 {
        self.executor.rate_limit().requests_remaining()
    }

    pub fn rate_limit(&self) -> &RateLimitState {
        self.executor.rate_limit()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.executor
            .client()
            .request(method, format!("{}{path}", self.api_url))
    }

    fn json_request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<RequestBuilder> {
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                detail: e.to_string(),
            })?;

        log::debug!("[{PROVIDER_NAME}] Request Body: {}", truncate_for_log(&payload));

        Ok(self
            .request(method, path)
            .header(CONTENT_TYPE, "application/json")
            .body(payload))
    }
}

/// Turn non-2xx statuses into errors, preferring the provider's own messages.
fn check_status(response: &ApiResponse) -> Result<()> {
    if response.status.is_success() {
        return Ok(());
    }

    let envelope: ErrorEnvelope = serde_json::from_str(&response.body).unwrap_or_default();
    if !envelope.error.is_empty() {
        return api_errors(envelope.error);
    }

    Err(ProviderError::UnexpectedStatus {
        status: response.status.as_u16(),
        body: truncate_for_log(&response.body),
    })
}

fn ensure_no_errors(errors: &[String]) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        api_errors(errors.to_vec())
    }
}

fn api_errors(messages: Vec<String>) -> Result<()> {
    log::warn!("[{PROVIDER_NAME}] API error: {}", messages.join(" "));
    Err(ProviderError::ApiError { messages })
}

fn parse_json<T: DeserializeOwned>(response: &ApiResponse) -> Result<T> {
    serde_json::from_str(&response.body).map_err(|e| {
        log::error!("[{PROVIDER_NAME}] JSON parse failed: {e}");
        log::error!(
            "[{PROVIDER_NAME}] Raw response: {}",
            truncate_for_log(&response.body)
        );
        ProviderError::ParseError {
            detail: e.to_string(),
        }
    })
}

fn domain_path(domain: &str) -> String {
    format!("/domains/{}", urlencoding::encode(domain))
}

fn record_path(domain: &str, record_id: u64) -> String {
    format!("{}/records/{record_id}", domain_path(domain))
}

#[async_trait]
impl DnsApi for DnsMadeEasyClient {
    async fn list_domains(&self) -> Result<Vec<String>> {
        let response = self
            .executor
            .execute(self.request(Method::GET, "/domains/"))
            .await?;
        check_status(&response)?;

        let domains: ApiDomainList = parse_json(&response)?;
        Ok(domains.list)
    }

    async fn get_domain(&self, domain: &str) -> Result<ApiDomain> {
        let response = self
            .executor
            .execute(self.request(Method::GET, &domain_path(domain)))
            .await?;
        check_status(&response)?;

        let info: ApiDomain = parse_json(&response)?;
        ensure_no_errors(&info.error)?;
        Ok(info)
    }

    async fn add_domain(&self, domain: &ApiDomain) -> Result<ApiDomain> {
        let request = self.json_request(Method::PUT, &domain_path(&domain.name), domain)?;
        let response = self.executor.execute(request).await?;
        check_status(&response)?;

        let created: ApiDomain = parse_json(&response)?;
        ensure_no_errors(&created.error)?;
        Ok(created)
    }

    async fn delete_domain(&self, domain: &str) -> Result<()> {
        let response = self
            .executor
            .execute(self.request(Method::DELETE, &domain_path(domain)))
            .await?;
        check_status(&response)
    }

    async fn get_record(&self, domain: &str, record_id: u64) -> Result<ApiRecord> {
        let response = self
            .executor
            .execute(self.request(Method::GET, &record_path(domain, record_id)))
            .await?;
        check_status(&response)?;

        let mut record: ApiRecord = parse_json(&response)?;
        ensure_no_errors(&record.error)?;
        record.fill_empty_cname_data(domain);
        Ok(record)
    }

    async fn list_records(&self, domain: &str, filter: &RecordFilter) -> Result<Vec<ApiRecord>> {
        let path = format!("{}/records{}", domain_path(domain), filter.to_query());
        let response = self
            .executor
            .execute(self.request(Method::GET, &path))
            .await?;
        check_status(&response)?;

        let mut records: Vec<ApiRecord> = parse_json(&response)?;
        for record in &mut records {
            record.fill_empty_cname_data(domain);
        }
        Ok(records)
    }

    async fn create_record(&self, domain: &str, record: &ApiRecord) -> Result<ApiRecord> {
        if let Some(id) = record.id {
            return Err(ProviderError::InvalidParameter {
                param: "id".to_string(),
                detail: format!("record {id} already exists; use update_record"),
            });
        }

        let path = format!("{}/records/", domain_path(domain));
        let request = self.json_request(Method::POST, &path, record)?;
        let response = self.executor.execute(request).await?;
        check_status(&response)?;

        let created: ApiRecord = parse_json(&response)?;
        ensure_no_errors(&created.error)?;
        Ok(created)
    }

    async fn update_record(&self, domain: &str, record: &ApiRecord) -> Result<()> {
        let Some(record_id) = record.id else {
            return Err(ProviderError::InvalidParameter {
                param: "id".to_string(),
                detail: "update requires a record id".to_string(),
            });
        };

        let mut record = record.clone();
        record.fill_empty_cname_data(domain);

        let request =
            self.json_request(Method::PUT, &record_path(domain, record_id), &record)?;
        let response = self.executor.execute(request).await?;
        // 更新接口返回空 body
        check_status(&response)
    }

    async fn delete_record(&self, domain: &str, record_id: u64) -> Result<()> {
        let response = self
            .executor
            .execute(self.request(Method::DELETE, &record_path(domain, record_id)))
            .await?;
        check_status(&response)
    }
}
