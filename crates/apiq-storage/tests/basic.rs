use apiq_storage::prelude::*;
use apiq_types::prelude::{Id, Timestamp};
use serde_json::json;

fn key_record(key: &str, company: &str) -> ApiKeyRecord {
    ApiKeyRecord {
        api_key: key.to_string(),
        company_name: company.to_string(),
        created_at: Timestamp(1_704_448_800_000),
        is_active: true,
    }
}

#[tokio::test]
async fn crud_and_select() {
    let store = MemoryDatastore::new();
    let repo: InMemoryRepository<ApiKeyRecord> = InMemoryRepository::new(&store);

    repo.create(&key_record("ak_one", "Acme")).await.unwrap();
    repo.create(&key_record("ak_two", "Globex")).await.unwrap();

    let fetched = repo.get("ak_one").await.unwrap().unwrap();
    assert_eq!(fetched.company_name, "Acme");
    assert!(repo.get("ak_missing").await.unwrap().is_none());

    let active = repo
        .select(QueryParams {
            filter: json!({"is_active": true}),
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(active.len(), 2);
}

#[tokio::test]
async fn duplicate_key_is_a_store_level_conflict() {
    let store = MemoryDatastore::new();
    let repo: InMemoryRepository<ApiKeyRecord> = InMemoryRepository::new(&store);

    repo.create(&key_record("ak_dup", "Acme")).await.unwrap();
    let err = repo
        .create(&key_record("ak_dup", "Imposter"))
        .await
        .expect_err("conflict");
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn update_patches_only_named_fields() {
    let store = MemoryDatastore::new();
    let repo: InMemoryRepository<ApiKeyRecord> = InMemoryRepository::new(&store);

    repo.create(&key_record("ak_soft", "Acme")).await.unwrap();
    let updated = repo
        .update("ak_soft", json!({"is_active": false}))
        .await
        .unwrap();
    assert!(!updated.is_active);
    assert_eq!(updated.company_name, "Acme");

    let err = repo
        .update("ak_missing", json!({"is_active": false}))
        .await
        .expect_err("not found");
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn usage_records_filter_by_key() {
    let store = MemoryDatastore::new();
    let repo: InMemoryRepository<UsageRecord> = InMemoryRepository::new(&store);

    for (key, cost) in [("ak_a", 0.1), ("ak_a", 0.1), ("ak_b", 0.1)] {
        repo.create(&UsageRecord {
            id: Id::new_random(),
            api_key: key.to_string(),
            timestamp: Timestamp::now(),
            cost,
        })
        .await
        .unwrap();
    }

    let for_a = repo
        .select(QueryParams {
            filter: json!({"api_key": "ak_a"}),
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(for_a.len(), 2);
}

#[test]
fn generated_keys_fit_the_record_id() {
    let key = generate_api_key();
    let record = key_record(&key, "Acme");
    assert_eq!(record.api_key.len(), 35);
}
