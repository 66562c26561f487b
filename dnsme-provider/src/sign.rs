//! DNS Made Easy HMAC-SHA1 请求签名
//!
//! The provider verifies `x-dnsme-hmac == hex(HMAC-SHA1(secret_key, x-dnsme-requestDate))`
//! and rejects dates too far from its own clock, so requests are signed right before they
//! are sent.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Request;
use reqwest::header::{ACCEPT, HeaderName, HeaderValue};
use sha1::Sha1;

use crate::config::Credentials;
use crate::error::{ProviderError, Result};

type HmacSha1 = Hmac<Sha1>;

pub(crate) const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-dnsme-apikey");
pub(crate) const REQUEST_DATE_HEADER: HeaderName =
    HeaderName::from_static("x-dnsme-requestdate");
pub(crate) const HMAC_HEADER: HeaderName = HeaderName::from_static("x-dnsme-hmac");

/// RFC 1123 HTTP date, always in GMT.
const REQUEST_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Stamps outbound requests with the `x-dnsme-*` authentication headers.
#[derive(Clone)]
pub struct Authenticator {
    api_key: HeaderValue,
    secret_key: String,
}

impl Authenticator {
    /// Fails only if the API key cannot be carried in an HTTP header.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let mut api_key = HeaderValue::from_str(&credentials.api_key).map_err(|e| {
            ProviderError::InvalidParameter {
                param: "api_key".to_string(),
                detail: e.to_string(),
            }
        })?;
        api_key.set_sensitive(true);

        Ok(Self {
            api_key,
            secret_key: credentials.secret_key.clone(),
        })
    }

    /// Sign `request` with the current time.
    pub fn sign(&self, request: &mut Request) {
        self.sign_at(request, Utc::now());
    }

    /// Sign `request` as of `now`. Existing auth headers are replaced, never appended.
    pub fn sign_at(&self, request: &mut Request, now: DateTime<Utc>) {
        let request_date = format_request_date(now);
        let hmac = self.hmac_hex(&request_date);

        let headers = request.headers_mut();
        headers.insert(API_KEY_HEADER, self.api_key.clone());
        // 日期与 hex 摘要均为 ASCII
        if let Ok(value) = HeaderValue::from_str(&request_date) {
            headers.insert(REQUEST_DATE_HEADER, value);
        }
        if let Ok(value) = HeaderValue::from_str(&hmac) {
            headers.insert(HMAC_HEADER, value);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    }

    /// Lowercase hex HMAC-SHA1 of `request_date` keyed by the secret key.
    pub fn hmac_hex(&self, request_date: &str) -> String {
        hex::encode(hmac_sha1(
            self.secret_key.as_bytes(),
            request_date.as_bytes(),
        ))
    }
}

/// Format `now` the way `x-dnsme-requestDate` expects it.
pub fn format_request_date(now: DateTime<Utc>) -> String {
    now.format(REQUEST_DATE_FORMAT).to_string()
}

fn hmac_sha1(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reqwest::{Client, Method};

    fn authenticator() -> Authenticator {
        Authenticator::new(&Credentials::new("test_api_key", "test_secret_key")).unwrap()
    }

    fn request() -> Request {
        Client::new()
            .request(Method::GET, "https://api.sandbox.dnsmadeeasy.com/V1.2/domains/")
            .build()
            .unwrap()
    }

    fn fixed_instant() -> DateTime<Utc> {
        // 2024-01-15 08:00:00 UTC, a Monday
        Utc.timestamp_opt(1_705_305_600, 0).unwrap()
    }

    #[test]
    fn request_date_is_rfc1123_gmt() {
        assert_eq!(
            format_request_date(fixed_instant()),
            "Mon, 15 Jan 2024 08:00:00 GMT"
        );
    }

    #[test]
    fn request_date_pads_day() {
        // 2024-03-03 04:05:06 UTC
        let t = Utc.with_ymd_and_hms(2024, 3, 3, 4, 5, 6).unwrap();
        assert_eq!(format_request_date(t), "Sun, 03 Mar 2024 04:05:06 GMT");
    }

    #[test]
    fn hmac_sha1_known_vector() {
        let digest = hex::encode(hmac_sha1(
            b"key",
            b"The quick brown fox jumps over the lazy dog",
        ));
        assert_eq!(digest, "de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9");
    }

    #[test]
    fn hmac_hex_is_lowercase_40_chars() {
        let digest = authenticator().hmac_hex("Mon, 15 Jan 2024 08:00:00 GMT");
        assert_eq!(digest.len(), 40);
        assert!(
            digest
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn sign_sets_all_headers() {
        let mut req = request();
        authenticator().sign_at(&mut req, fixed_instant());

        let headers = req.headers();
        assert_eq!(headers[API_KEY_HEADER].to_str().unwrap(), "test_api_key");
        assert_eq!(
            headers[REQUEST_DATE_HEADER].to_str().unwrap(),
            "Mon, 15 Jan 2024 08:00:00 GMT"
        );
        assert_eq!(headers[ACCEPT].to_str().unwrap(), "application/json");
    }

    #[test]
    fn sign_hmac_matches_date_header() {
        let auth = authenticator();
        let mut req = request();
        auth.sign_at(&mut req, fixed_instant());

        let date = req.headers()[REQUEST_DATE_HEADER].to_str().unwrap();
        let expected = hex::encode(hmac_sha1(b"test_secret_key", date.as_bytes()));
        assert_eq!(req.headers()[HMAC_HEADER].to_str().unwrap(), expected);
    }

    #[test]
    fn resigning_replaces_headers() {
        let auth = authenticator();
        let mut req = request();
        auth.sign_at(&mut req, fixed_instant());
        let later = fixed_instant() + chrono::Duration::seconds(30);
        auth.sign_at(&mut req, later);

        let headers = req.headers();
        assert_eq!(headers.get_all(REQUEST_DATE_HEADER).iter().count(), 1);
        assert_eq!(headers.get_all(HMAC_HEADER).iter().count(), 1);
        assert_eq!(headers.get_all(ACCEPT).iter().count(), 1);
        assert_eq!(
            headers[REQUEST_DATE_HEADER].to_str().unwrap(),
            "Mon, 15 Jan 2024 08:00:30 GMT"
        );
    }

    #[test]
    fn different_secret_changes_signature() {
        let a = Authenticator::new(&Credentials::new("k", "alpha")).unwrap();
        let b = Authenticator::new(&Credentials::new("k", "beta")).unwrap();
        let date = format_request_date(fixed_instant());
        assert_ne!(a.hmac_hex(&date), b.hmac_hex(&date));
    }

    #[test]
    fn invalid_api_key_rejected() {
        let result = Authenticator::new(&Credentials::new("bad\nkey", "secret"));
        assert!(matches!(
            result,
            Err(ProviderError::InvalidParameter { ref param, .. }) if param == "api_key"
        ));
    }
}
