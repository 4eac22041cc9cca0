use async_trait::async_trait;

use crate::errors::StorageError;
use crate::model::{Entity, QueryParams};

/// Record-oriented store interface: insert, find-by-id,
/// find-by-predicate, patch. Uniqueness is enforced here (create
/// conflicts on an existing id), never by pre-checking in callers.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn create(&self, entity: &E) -> Result<(), StorageError>;
    async fn get(&self, id: &str) -> Result<Option<E>, StorageError>;
    async fn select(&self, params: QueryParams) -> Result<Vec<E>, StorageError>;
    async fn update(&self, id: &str, patch: serde_json::Value) -> Result<E, StorageError>;
}
