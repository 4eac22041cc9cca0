use serde::{Deserialize, Serialize};

use apiq_types::prelude::{Id, Timestamp};

/// A record type persisted through the store SPI.
pub trait Entity: Sized + serde::de::DeserializeOwned + Serialize + Send + Sync {
    const TABLE: &'static str;
    fn id(&self) -> &str;
}

/// Equality filter over top-level JSON fields plus an optional limit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryParams {
    pub filter: serde_json::Value,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            filter: serde_json::json!({}),
            limit: None,
        }
    }
}

/// One billing/usage tenant. The key string doubles as the store id,
/// so key uniqueness is the store's uniqueness constraint. Only
/// `is_active` is ever mutated (soft revocation).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiKeyRecord {
    pub api_key: String,
    pub company_name: String,
    pub created_at: Timestamp,
    pub is_active: bool,
}

impl Entity for ApiKeyRecord {
    const TABLE: &'static str = "api_key";

    fn id(&self) -> &str {
        &self.api_key
    }
}

/// One entry per billable classification call. Append-only.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UsageRecord {
    pub id: Id,
    pub api_key: String,
    pub timestamp: Timestamp,
    pub cost: f64,
}

impl Entity for UsageRecord {
    const TABLE: &'static str = "usage_log";

    fn id(&self) -> &str {
        &self.id.0
    }
}
