use std::sync::Arc;

use serde_json::json;

use apiq_storage::prelude::{generate_api_key, ApiKeyRecord, QueryParams, Repository};
use apiq_types::prelude::Timestamp;

use crate::errors::AuthError;

/// Tenant key operations over the key repository: resolution for the
/// request gate plus the admin lifecycle (issue, list, revoke).
#[derive(Clone)]
pub struct KeyStore {
    repo: Arc<dyn Repository<ApiKeyRecord>>,
}

impl KeyStore {
    pub fn new(repo: Arc<dyn Repository<ApiKeyRecord>>) -> Self {
        Self { repo }
    }

    /// Gate lookup: only active keys authenticate a tenant.
    pub async fn resolve_active(&self, api_key: &str) -> Result<Option<ApiKeyRecord>, AuthError> {
        let record = self.repo.get(api_key).await?;
        Ok(record.filter(|record| record.is_active))
    }

    /// Admin action: mint a new active key for a company.
    pub async fn issue(&self, company_name: &str) -> Result<ApiKeyRecord, AuthError> {
        let record = ApiKeyRecord {
            api_key: generate_api_key(),
            company_name: company_name.to_string(),
            created_at: Timestamp::now(),
            is_active: true,
        };
        self.repo.create(&record).await?;
        Ok(record)
    }

    /// Admin action: soft revocation. The record stays for analytics
    /// attribution; only the active flag changes.
    pub async fn deactivate(&self, api_key: &str) -> Result<ApiKeyRecord, AuthError> {
        let updated = self
            .repo
            .update(api_key, json!({"is_active": false}))
            .await?;
        Ok(updated)
    }

    pub async fn list_all(&self) -> Result<Vec<ApiKeyRecord>, AuthError> {
        let records = self.repo.select(QueryParams::default()).await?;
        Ok(records)
    }
}
