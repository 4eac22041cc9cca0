use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::errors::StorageError;
use crate::model::{Entity, QueryParams};
use crate::spi::Repository;

type Table = HashMap<String, Value>;

/// Process-wide in-memory datastore; cloning shares the tables.
#[derive(Clone, Default)]
pub struct MemoryDatastore {
    tables: Arc<RwLock<HashMap<&'static str, Table>>>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
pub struct InMemoryRepository<E: Entity> {
    store: MemoryDatastore,
    _marker: PhantomData<E>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new(store: &MemoryDatastore) -> Self {
        Self {
            store: store.clone(),
            _marker: PhantomData,
        }
    }

    fn encode(entity: &E) -> Result<Value, StorageError> {
        serde_json::to_value(entity)
            .map_err(|err| StorageError::internal(&format!("encode {}: {err}", E::TABLE)))
    }

    fn decode(value: Value) -> Result<E, StorageError> {
        serde_json::from_value(value)
            .map_err(|err| StorageError::internal(&format!("decode {}: {err}", E::TABLE)))
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn create(&self, entity: &E) -> Result<(), StorageError> {
        let encoded = Self::encode(entity)?;
        let mut guard = self.store.tables.write();
        let table = guard.entry(E::TABLE).or_default();
        if table.contains_key(entity.id()) {
            return Err(StorageError::conflict(&format!(
                "entity already exists: {}/{}",
                E::TABLE,
                entity.id()
            )));
        }
        table.insert(entity.id().to_string(), encoded);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<E>, StorageError> {
        let guard = self.store.tables.read();
        match guard.get(E::TABLE).and_then(|table| table.get(id)) {
            Some(value) => Ok(Some(Self::decode(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn select(&self, params: QueryParams) -> Result<Vec<E>, StorageError> {
        let guard = self.store.tables.read();
        let limit = params.limit.unwrap_or(u32::MAX) as usize;
        let mut items = Vec::new();
        if let Some(table) = guard.get(E::TABLE) {
            for value in table.values() {
                if !matches_filter(value, &params.filter) {
                    continue;
                }
                items.push(Self::decode(value.clone())?);
                if items.len() >= limit {
                    break;
                }
            }
        }
        Ok(items)
    }

    async fn update(&self, id: &str, patch: Value) -> Result<E, StorageError> {
        let mut guard = self.store.tables.write();
        let table = guard.entry(E::TABLE).or_default();
        let value = table.get_mut(id).ok_or_else(|| {
            StorageError::not_found(&format!("entity not found: {}/{id}", E::TABLE))
        })?;
        merge_patch(value, &patch);
        Self::decode(value.clone())
    }
}

fn matches_filter(value: &Value, filter: &Value) -> bool {
    match filter.as_object() {
        Some(fields) => fields
            .iter()
            .all(|(key, expected)| value.get(key) == Some(expected)),
        None => true,
    }
}

fn merge_patch(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                merge_patch(
                    base_map.entry(key.clone()).or_insert(Value::Null),
                    patch_value,
                );
            }
        }
        (slot, value) => {
            *slot = value.clone();
        }
    }
}
