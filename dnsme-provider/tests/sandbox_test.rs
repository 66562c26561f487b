//! DNS Made Easy sandbox 集成测试
//!
//! 运行方式:
//! ```bash
//! DNSME_API_KEY=xxx DNSME_SECRET_KEY=xxx TEST_DOMAIN=example.com \
//!     DNSME_API_URL=https://api.sandbox.dnsmadeeasy.com/V1.2 \
//!     cargo test -p dnsme-provider --test sandbox_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::generate_test_record_name;
use dnsme_provider::{ApiRecord, DnsApi, DnsMadeEasyClient, RecordFilter};

fn test_domain() -> String {
    std::env::var("TEST_DOMAIN").unwrap_or_default()
}

#[tokio::test]
#[ignore]
async fn test_sandbox_list_domains() {
    skip_if_no_credentials!("DNSME_API_KEY", "DNSME_SECRET_KEY", "TEST_DOMAIN");

    let client = DnsMadeEasyClient::from_env().expect("创建客户端失败");
    let domains = client.list_domains().await.expect("list_domains 调用失败");

    assert!(
        domains.contains(&test_domain()),
        "域名列表中找不到测试域名: {domains:?}"
    );
    assert!(client.requests_remaining() > 0, "应已记录剩余请求数");

    println!("✓ list_domains 测试通过，共 {} 个域名", domains.len());
}

#[tokio::test]
#[ignore]
async fn test_sandbox_record_lifecycle() {
    skip_if_no_credentials!("DNSME_API_KEY", "DNSME_SECRET_KEY", "TEST_DOMAIN");

    let client = DnsMadeEasyClient::from_env().expect("创建客户端失败");
    let domain = test_domain();
    let name = generate_test_record_name();

    let record = ApiRecord {
        name: name.clone(),
        record_type: "TXT".to_string(),
        data: "\"dnsme-provider test\"".to_string(),
        gtd_location: "DEFAULT".to_string(),
        ttl: 300,
        ..ApiRecord::default()
    };

    let mut created = client
        .create_record(&domain, &record)
        .await
        .expect("create_record 调用失败");
    let record_id = created.id.expect("创建的记录应有 id");
    println!("✓ 创建记录: {name} ({record_id})");

    created.ttl = 600;
    let update = client.update_record(&domain, &created).await;

    let filter = RecordFilter {
        record_type: Some("TXT".to_string()),
        record_name: Some(name.clone()),
    };
    let listed = client.list_records(&domain, &filter).await;

    // 无论前面是否成功都清理记录
    let delete = client.delete_record(&domain, record_id).await;

    update.expect("update_record 调用失败");
    let listed = listed.expect("list_records 调用失败");
    assert!(listed.iter().any(|r| r.id == Some(record_id)));
    delete.expect("delete_record 调用失败");

    println!("✓ 记录生命周期测试通过");
}
