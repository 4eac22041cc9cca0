use std::sync::Arc;

use apiq_auth::prelude::{AdminConfig, AdminSession, KeyStore};
use apiq_catalog::prelude::Catalog;
use apiq_llm::prelude::Classifier;
use apiq_metering::prelude::{Analytics, UsageMeter};
use apiq_storage::prelude::{ApiKeyRecord, InMemoryRepository, MemoryDatastore, Repository, UsageRecord};

use crate::config::GatewayConfig;

/// Shared service graph for the router. Cheap to clone; every field is
/// either Copy or an Arc-backed handle.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub classifier: Arc<dyn Classifier>,
    pub keys: KeyStore,
    pub meter: UsageMeter,
    pub analytics: Analytics,
    pub admin: AdminSession,
    pub window_months: u32,
}

impl AppState {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        admin: AdminConfig,
        cost_per_request: f64,
        window_months: u32,
    ) -> Self {
        let datastore = MemoryDatastore::new();
        let key_repo: Arc<dyn Repository<ApiKeyRecord>> =
            Arc::new(InMemoryRepository::<ApiKeyRecord>::new(&datastore));
        let usage_repo: Arc<dyn Repository<UsageRecord>> =
            Arc::new(InMemoryRepository::<UsageRecord>::new(&datastore));

        Self {
            catalog: Catalog,
            classifier,
            keys: KeyStore::new(key_repo.clone()),
            meter: UsageMeter::new(usage_repo.clone(), cost_per_request),
            analytics: Analytics::new(usage_repo, key_repo),
            admin: AdminSession::new(admin),
            window_months,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> anyhow::Result<Self> {
        let classifier = Arc::new(config.classifier.build()?);
        let admin = config.admin.resolve()?;
        Ok(Self::new(
            classifier,
            admin,
            config.metering.cost_per_request,
            config.metering.window_months,
        ))
    }
}
