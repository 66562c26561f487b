use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ApiDomain, ApiRecord, RecordFilter};

/// DNS Made Easy 域名与记录操作
///
/// Implemented by [`DnsMadeEasyClient`](crate::DnsMadeEasyClient); callers can depend on the
/// trait to substitute their own implementation in tests.
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// 获取域名列表
    async fn list_domains(&self) -> Result<Vec<String>>;

    /// 获取域名详情
    async fn get_domain(&self, domain: &str) -> Result<ApiDomain>;

    /// 添加域名
    async fn add_domain(&self, domain: &ApiDomain) -> Result<ApiDomain>;

    /// 删除域名
    async fn delete_domain(&self, domain: &str) -> Result<()>;

    /// 获取单条记录
    async fn get_record(&self, domain: &str, record_id: u64) -> Result<ApiRecord>;

    /// 获取记录列表（可按类型/名称过滤）
    async fn list_records(&self, domain: &str, filter: &RecordFilter) -> Result<Vec<ApiRecord>>;

    /// 创建记录，`record.id` 必须为空
    async fn create_record(&self, domain: &str, record: &ApiRecord) -> Result<ApiRecord>;

    /// 更新记录，`record.id` 必须存在
    async fn update_record(&self, domain: &str, record: &ApiRecord) -> Result<()>;

    /// 删除记录
    async fn delete_record(&self, domain: &str, record_id: u64) -> Result<()>;

    /// Create or update depending on whether `record.id` is set.
    ///
    /// Returns the created record, or `None` after an update (the API answers updates with
    /// an empty body).
    async fn save_record(&self, domain: &str, record: &ApiRecord) -> Result<Option<ApiRecord>> {
        if record.id.is_some() {
            self.update_record(domain, record).await?;
            Ok(None)
        } else {
            self.create_record(domain, record).await.map(Some)
        }
    }
}
