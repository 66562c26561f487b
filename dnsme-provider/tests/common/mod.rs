//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dnsme_provider::{
    Authenticator, Credentials, DnsMadeEasyClient, DnsMadeEasyClientBuilder, RateLimitState,
    RequestExecutor, RetrySettings,
};
use wiremock::{MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-api-key";
pub const SECRET_KEY: &str = "test-secret-key";
pub const REMAINING_HEADER: &str = "x-dnsme-requestsRemaining";

/// Short cooldown so rate-limit scenarios finish quickly.
pub const TEST_COOLDOWN: Duration = Duration::from_millis(20);

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

pub fn credentials() -> Credentials {
    Credentials::new(API_KEY, SECRET_KEY)
}

pub fn authenticator() -> Authenticator {
    Authenticator::new(&credentials()).expect("authenticator")
}

pub fn client_builder(server: &MockServer) -> DnsMadeEasyClientBuilder {
    DnsMadeEasyClient::builder(credentials())
        .api_url(server.uri())
        .cooldown(TEST_COOLDOWN)
}

pub fn client(server: &MockServer) -> DnsMadeEasyClient {
    client_builder(server).build().expect("client")
}

pub fn executor(settings: RetrySettings) -> RequestExecutor {
    RequestExecutor::new(
        reqwest::Client::new(),
        authenticator(),
        RateLimitState::new(),
        settings,
    )
}

pub fn fast_settings(max_attempts: u32) -> RetrySettings {
    RetrySettings {
        max_attempts,
        cooldown: TEST_COOLDOWN,
        ..RetrySettings::default()
    }
}

/// Response carrying the quota header.
pub fn with_quota(status: u16, remaining: u32) -> ResponseTemplate {
    ResponseTemplate::new(status).insert_header(REMAINING_HEADER, remaining.to_string().as_str())
}

/// Responder that plays `responses` in order and then repeats the last one.
pub fn sequence(
    responses: Vec<ResponseTemplate>,
) -> impl Fn(&wiremock::Request) -> ResponseTemplate + Send + Sync + 'static {
    let calls = AtomicUsize::new(0);
    move |_req: &wiremock::Request| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        responses[n.min(responses.len() - 1)].clone()
    }
}

/// Address with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}
