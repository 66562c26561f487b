//! Remaining-quota tracking from `x-dnsme-requestsRemaining`

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use reqwest::header::{HeaderMap, HeaderName};

pub(crate) const REQUESTS_REMAINING_HEADER: HeaderName =
    HeaderName::from_static("x-dnsme-requestsremaining");

/// Last quota value reported by the provider.
///
/// Clones share the same counter. Starts at zero, meaning "unknown or exhausted" until the
/// first response arrives, and is overwritten after every response.
///
/// Concurrent requests race on this value: whichever response was recorded last wins. The
/// counter is advisory, so the worst outcome is one unneeded or one missed cooldown.
#[derive(Debug, Clone, Default)]
pub struct RateLimitState {
    remaining: Arc<AtomicU32>,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently observed remaining quota.
    pub fn requests_remaining(&self) -> u32 {
        self.remaining.load(Ordering::Relaxed)
    }

    pub(crate) fn record(&self, remaining: u32) {
        self.remaining.store(remaining, Ordering::Relaxed);
    }
}

/// How to read a response whose quota header is missing or not a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingQuotaPolicy {
    /// Treat it as zero remaining requests and cool down before retrying.
    #[default]
    Exhausted,
    /// Treat it as "not reported": leave the state untouched and accept the response.
    Ignore,
}

impl MissingQuotaPolicy {
    /// Effective quota for one response. `None` means no quota was reported and the policy
    /// says to disregard that.
    pub(crate) fn resolve(self, reported: Option<u32>) -> Option<u32> {
        match (reported, self) {
            (Some(remaining), _) => Some(remaining),
            (None, Self::Exhausted) => Some(0),
            (None, Self::Ignore) => None,
        }
    }
}

/// Parse the quota header; `None` when absent or not a non-negative integer.
///
/// Negative values such as `-1` are not a count and fall under [`MissingQuotaPolicy`].
pub(crate) fn parse_requests_remaining(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(REQUESTS_REMAINING_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u32>().ok())
}
