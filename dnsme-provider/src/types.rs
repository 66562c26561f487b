//! DNS Made Easy API 类型定义

use serde::{Deserialize, Serialize};

/// `GET /domains/` 响应
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDomainList {
    #[serde(default)]
    pub list: Vec<String>,
}

/// Managed domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDomain {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "nameServer", default)]
    pub name_servers: Vec<String>,
    #[serde(default)]
    pub vanity_name_servers: Vec<String>,
    #[serde(default)]
    pub gtd_enabled: bool,
    /// Provider-reported errors; non-empty means the operation failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error: Vec<String>,
}

impl ApiDomain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// DNS record within a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRecord {
    #[serde(default)]
    pub name: String,
    /// Assigned by the provider; `None` for records not created yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub gtd_location: String,
    #[serde(default)]
    pub ttl: u32,
    /// Only meaningful for dynamic DNS records.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error: Vec<String>,
}

impl ApiRecord {
    /// The API can return CNAME records with empty `data`, yet refuses records without it on
    /// create/update. Fill in the zone apex, `"<domain>."`.
    pub fn fill_empty_cname_data(&mut self, domain: &str) {
        if self.record_type.eq_ignore_ascii_case("CNAME") && self.data.is_empty() {
            self.data = format!("{domain}.");
        }
    }
}

/// Optional filters for `GET /domains/{domain}/records`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Record type, e.g. `"A"` or `"CNAME"`.
    pub record_type: Option<String>,
    /// Relative record name, e.g. `"www"`.
    pub record_name: Option<String>,
}

impl RecordFilter {
    /// Encoded query string including the leading `?`, or empty when no filter is set.
    pub(crate) fn to_query(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(ref record_type) = self.record_type
            && !record_type.is_empty()
        {
            pairs.push(format!("type={}", urlencoding::encode(record_type)));
        }
        if let Some(ref record_name) = self.record_name
            && !record_name.is_empty()
        {
            pairs.push(format!("recordName={}", urlencoding::encode(record_name)));
        }

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}
