use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Months, Utc};
use serde::Serialize;
use serde_json::json;

use apiq_storage::prelude::{ApiKeyRecord, QueryParams, Repository, UsageRecord};
use apiq_types::prelude::Timestamp;

use crate::errors::MeterError;

pub const DEFAULT_WINDOW_MONTHS: u32 = 12;

/// One calendar-month bucket of usage for a tenant.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MonthlyUsage {
    pub requests: u64,
    pub cost: f64,
}

pub type MonthBuckets = BTreeMap<String, MonthlyUsage>;

/// Read-only reporting path over the usage log. Runs outside the
/// request-classification path and tolerates concurrent appends by
/// bucketing whatever snapshot the select returned.
#[derive(Clone)]
pub struct Analytics {
    usage: Arc<dyn Repository<UsageRecord>>,
    keys: Arc<dyn Repository<ApiKeyRecord>>,
}

impl Analytics {
    pub fn new(
        usage: Arc<dyn Repository<UsageRecord>>,
        keys: Arc<dyn Repository<ApiKeyRecord>>,
    ) -> Self {
        Self { usage, keys }
    }

    /// Admin scope: every tenant, grouped by display name then month.
    /// Records whose key no longer resolves to an active tenant are
    /// skipped, never given a placeholder name.
    pub async fn all_tenants(
        &self,
        window_months: u32,
    ) -> Result<BTreeMap<String, MonthBuckets>, MeterError> {
        let cutoff = window_cutoff(window_months);
        let records = self.usage.select(QueryParams::default()).await?;

        let mut stats: BTreeMap<String, MonthBuckets> = BTreeMap::new();
        for record in records {
            if record.timestamp < cutoff {
                continue;
            }
            let Some(owner) = self.keys.get(&record.api_key).await? else {
                continue;
            };
            if !owner.is_active {
                continue;
            }
            let Some(month) = month_key(record.timestamp) else {
                continue;
            };
            let bucket = stats
                .entry(owner.company_name)
                .or_default()
                .entry(month)
                .or_default();
            bucket.requests += 1;
            bucket.cost += record.cost;
        }
        Ok(stats)
    }

    /// Tenant scope: the caller's own usage, grouped by month only.
    pub async fn for_tenant(
        &self,
        api_key: &str,
        window_months: u32,
    ) -> Result<MonthBuckets, MeterError> {
        let cutoff = window_cutoff(window_months);
        let records = self
            .usage
            .select(QueryParams {
                filter: json!({ "api_key": api_key }),
                limit: None,
            })
            .await?;

        let mut stats = MonthBuckets::new();
        for record in records {
            if record.timestamp < cutoff {
                continue;
            }
            let Some(month) = month_key(record.timestamp) else {
                continue;
            };
            let bucket = stats.entry(month).or_default();
            bucket.requests += 1;
            bucket.cost += record.cost;
        }
        Ok(stats)
    }
}

fn window_cutoff(window_months: u32) -> Timestamp {
    // An unrepresentable subtraction degrades to an unbounded window,
    // never to an empty one.
    match Utc::now().checked_sub_months(Months::new(window_months)) {
        Some(cutoff) => Timestamp(cutoff.timestamp_millis()),
        None => Timestamp(i64::MIN),
    }
}

fn month_key(timestamp: Timestamp) -> Option<String> {
    timestamp
        .to_datetime()
        .map(|dt| dt.format("%Y-%m").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_is_year_hyphen_month() {
        let jan = Timestamp(1_704_448_800_000); // 2024-01-05T10:00:00Z
        assert_eq!(month_key(jan).as_deref(), Some("2024-01"));
    }

    #[test]
    fn cutoff_moves_back_by_calendar_months() {
        let cutoff = window_cutoff(12);
        let now = Timestamp::now();
        assert!(cutoff < now);
    }

    #[test]
    fn absurd_window_includes_everything() {
        assert_eq!(window_cutoff(u32::MAX), Timestamp(i64::MIN));
    }
}
