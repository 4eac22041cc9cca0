use std::sync::Arc;

use apiq_storage::prelude::{Repository, UsageRecord};
use apiq_types::prelude::{Id, Timestamp};

use crate::errors::MeterError;

/// Appends one usage record per billable classification call. The
/// caller invokes this exactly once per tenant-gated request that
/// reached a classified outcome; anonymous routes never meter.
#[derive(Clone)]
pub struct UsageMeter {
    usage: Arc<dyn Repository<UsageRecord>>,
    cost_per_request: f64,
}

impl UsageMeter {
    pub fn new(usage: Arc<dyn Repository<UsageRecord>>, cost_per_request: f64) -> Self {
        Self {
            usage,
            cost_per_request: cost_per_request.max(0.0),
        }
    }

    pub async fn record(&self, api_key: &str) -> Result<(), MeterError> {
        let record = UsageRecord {
            id: Id::new_random(),
            api_key: api_key.to_string(),
            timestamp: Timestamp::now(),
            cost: self.cost_per_request,
        };
        self.usage.create(&record).await?;
        Ok(())
    }
}
