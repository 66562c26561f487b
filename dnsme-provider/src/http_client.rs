//! Request executor
//!
//! Every API call goes through [`RequestExecutor::execute`], which signs, sends and retries
//! requests according to the provider's quota header.
//!
//! # Retry model
//! - `x-dnsme-requestsRemaining: 0` on a response means the quota is exhausted: wait a fixed
//!   cooldown, then try again, up to `max_attempts` attempts in total
//! - Transport failures are terminal unless the same response reported zero quota
//! - HTTP 403 and 404 on the final response map to fixed errors; other statuses pass through

use std::time::Duration;

use reqwest::{Client, Request, RequestBuilder, StatusCode};

use crate::error::{ProviderError, Result};
use crate::rate_limit::{MissingQuotaPolicy, RateLimitState, parse_requests_remaining};
use crate::sign::Authenticator;
use crate::utils::log_sanitizer::truncate_for_log;

pub(crate) const PROVIDER_NAME: &str = "dnsmadeeasy";

/// Attempts per request, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
/// Wait after a response reports zero remaining requests.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(30);

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Final response of an executed request.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
    /// Quota reported by the final response, `None` if it was absent and ignored.
    pub requests_remaining: Option<u32>,
    /// Number of attempts made, cooldowns included.
    pub attempts: u32,
}

/// Retry tuning for [`RequestExecutor`].
#[derive(Debug, Clone, Copy)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub cooldown: Duration,
    pub missing_quota_policy: MissingQuotaPolicy,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cooldown: DEFAULT_COOLDOWN,
            missing_quota_policy: MissingQuotaPolicy::default(),
        }
    }
}

/// Timeouts for the underlying HTTP client.
#[derive(Debug, Clone, Copy)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// 创建带超时配置的 HTTP Client
pub(crate) fn create_http_client(settings: TransportSettings) -> Result<Client> {
    Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|e| ProviderError::InvalidParameter {
            param: "http_client".to_string(),
            detail: e.to_string(),
        })
}

/// What one attempt saw before its outcome is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observation {
    /// The request never produced a response.
    NoResponse,
    Response {
        /// Effective quota after applying [`MissingQuotaPolicy`].
        quota: Option<u32>,
        body_failed: bool,
    },
}

/// Transition guard out of the `Sending` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    /// Transport failed without a zero-quota reading: stop.
    TransportFailure,
    /// The response reported zero remaining quota: cool down and retry.
    QuotaBlocked,
    Success,
}

impl Guard {
    fn classify(observation: Observation) -> Self {
        match observation {
            Observation::NoResponse => Self::TransportFailure,
            Observation::Response { quota: Some(0), .. } => Self::QuotaBlocked,
            Observation::Response {
                body_failed: true, ..
            } => Self::TransportFailure,
            Observation::Response { .. } => Self::Success,
        }
    }
}

enum ExecState {
    Sending { attempt: u32 },
    Cooldown { attempt: u32 },
    Done(Result<ApiResponse>),
}

/// Signs, sends and retries requests against the quota contract.
#[derive(Clone)]
pub struct RequestExecutor {
    client: Client,
    authenticator: Authenticator,
    rate_limit: RateLimitState,
    settings: RetrySettings,
}

impl RequestExecutor {
    pub fn new(
        client: Client,
        authenticator: Authenticator,
        rate_limit: RateLimitState,
        settings: RetrySettings,
    ) -> Self {
        Self {
            client,
            authenticator,
            rate_limit,
            settings: RetrySettings {
                max_attempts: settings.max_attempts.max(1),
                ..settings
            },
        }
    }

    /// The underlying HTTP client, for building requests.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Shared quota view updated by this executor.
    pub fn rate_limit(&self) -> &RateLimitState {
        &self.rate_limit
    }

    pub fn settings(&self) -> RetrySettings {
        self.settings
    }

    /// Execute an unsigned request.
    ///
    /// Each attempt signs a fresh copy immediately before sending it, so a request retried
    /// after a cooldown carries a current `x-dnsme-requestDate`.
    ///
    /// # Returns
    /// * `Ok(ApiResponse)` - final response, any status except 403/404
    /// * `Err(ProviderError::Forbidden)` / `Err(ProviderError::NotFound)` - HTTP 403 / 404
    /// * `Err(ProviderError::NetworkError | Timeout)` - terminal transport failure
    pub async fn execute(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let template = request
            .build()
            .map_err(|e| ProviderError::InvalidParameter {
                param: "request".to_string(),
                detail: e.to_string(),
            })?;

        if template.try_clone().is_none() {
            return Err(ProviderError::InvalidParameter {
                param: "body".to_string(),
                detail: "request body cannot be cloned; buffer the body to enable retries"
                    .to_string(),
            });
        }

        let mut state = ExecState::Sending { attempt: 1 };
        loop {
            state = match state {
                ExecState::Sending { attempt } => {
                    let (guard, outcome) = self.attempt(&template, attempt).await;
                    match guard {
                        Guard::QuotaBlocked if attempt < self.settings.max_attempts => {
                            ExecState::Cooldown { attempt }
                        }
                        Guard::QuotaBlocked => {
                            log::warn!(
                                "[{PROVIDER_NAME}] API rate-limit still exceeded after {attempt} attempts, giving up"
                            );
                            ExecState::Done(outcome)
                        }
                        Guard::TransportFailure | Guard::Success => ExecState::Done(outcome),
                    }
                }
                ExecState::Cooldown { attempt } => {
                    log::warn!(
                        "[{}] API rate-limit exceeded, sleeping for {:.1}s (attempt {} of {})",
                        PROVIDER_NAME,
                        self.settings.cooldown.as_secs_f32(),
                        attempt,
                        self.settings.max_attempts
                    );
                    tokio::time::sleep(self.settings.cooldown).await;
                    ExecState::Sending {
                        attempt: attempt + 1,
                    }
                }
                ExecState::Done(outcome) => return outcome.and_then(classify_status),
            };
        }
    }

    async fn attempt(&self, template: &Request, attempt: u32) -> (Guard, Result<ApiResponse>) {
        // execute() 已确认可克隆
        let Some(mut request) = template.try_clone() else {
            let err = ProviderError::InvalidParameter {
                param: "body".to_string(),
                detail: "request body cannot be cloned".to_string(),
            };
            return (Guard::TransportFailure, Err(err));
        };
        self.authenticator.sign(&mut request);

        log::debug!(
            "[{PROVIDER_NAME}] {} {} (attempt {attempt}/{})",
            request.method(),
            request.url(),
            self.settings.max_attempts
        );

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("[{PROVIDER_NAME}] Request failed: {e}");
                return (
                    Guard::classify(Observation::NoResponse),
                    Err(ProviderError::from_transport(&e)),
                );
            }
        };

        let status = response.status();
        let quota = self
            .settings
            .missing_quota_policy
            .resolve(parse_requests_remaining(response.headers()));
        if let Some(remaining) = quota {
            self.rate_limit.record(remaining);
        }
        log::debug!("[{PROVIDER_NAME}] Response Status: {status}, requests remaining: {quota:?}");

        let body = response.text().await;
        let observation = Observation::Response {
            quota,
            body_failed: body.is_err(),
        };

        let outcome = match body {
            Ok(body) => {
                log::debug!(
                    "[{PROVIDER_NAME}] Response Body: {}",
                    truncate_for_log(&body)
                );
                Ok(ApiResponse {
                    status,
                    body,
                    requests_remaining: quota,
                    attempts: attempt,
                })
            }
            Err(e) => Err(ProviderError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            }),
        };

        (Guard::classify(observation), outcome)
    }
}

/// Map the statuses that are terminal regardless of body.
fn classify_status(response: ApiResponse) -> Result<ApiResponse> {
    match response.status {
        StatusCode::FORBIDDEN => {
            log::warn!("[{PROVIDER_NAME}] API access forbidden (HTTP 403)");
            Err(ProviderError::Forbidden)
        }
        StatusCode::NOT_FOUND => Err(ProviderError::NotFound),
        _ => Ok(response),
    }
}
