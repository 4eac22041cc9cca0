pub use crate::errors::StorageError;
pub use crate::keygen::generate_api_key;
pub use crate::memory::{InMemoryRepository, MemoryDatastore};
pub use crate::model::{ApiKeyRecord, Entity, QueryParams, UsageRecord};
pub use crate::spi::Repository;
