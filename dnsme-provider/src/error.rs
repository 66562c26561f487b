use serde::{Deserialize, Serialize};

/// Error type for every DNS Made Easy API operation.
///
/// Quota exhaustion is not represented here: it drives the executor's cooldown loop and
/// only shows up indirectly, as whatever the last rate-limited attempt returned.
///
/// # Terminal errors
///
/// None of these variants is retried by the executor. Transport failures
/// ([`NetworkError`](Self::NetworkError), [`Timeout`](Self::Timeout)) are returned as soon as
/// they happen unless the same response reported zero remaining quota.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("Network error: {detail}")]
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// HTTP 403: the API key, secret or request date was rejected.
    #[error("API access forbidden")]
    Forbidden,

    /// HTTP 404: the domain or record does not exist.
    #[error("Not found")]
    NotFound,

    /// The provider answered with a non-empty `error` list in the JSON body.
    #[error("{}", .messages.join(" "))]
    ApiError {
        /// Error strings exactly as reported by the provider.
        messages: Vec<String>,
    },

    /// A non-2xx status other than 403/404 without an error list in the body.
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },

    /// A request parameter or client setting is invalid.
    #[error("Invalid parameter '{param}': {detail}")]
    InvalidParameter {
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// A required credential could not be found in the environment.
    #[error("Missing credential: environment variable {variable} is not set")]
    MissingCredentials {
        /// Name of the missing environment variable.
        variable: String,
    },

    /// Failed to parse the provider's API response.
    #[error("Parse error: {detail}")]
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    #[error("Serialization error: {detail}")]
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Forbidden
                | Self::NotFound
                | Self::ApiError { .. }
                | Self::InvalidParameter { .. }
                | Self::MissingCredentials { .. }
        )
    }

    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                detail: err.to_string(),
            }
        } else {
            Self::NetworkError {
                detail: err.to_string(),
            }
        }
    }
}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
