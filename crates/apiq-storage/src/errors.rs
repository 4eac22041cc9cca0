use apiq_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct StorageError(pub Box<ErrorObj>);

impl StorageError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn conflict(detail: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::STORAGE_CONFLICT)
                .user_msg("Record already exists.")
                .dev_msg(detail)
                .build(),
        ))
    }

    pub fn not_found(detail: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::STORAGE_NOT_FOUND)
                .user_msg("Record not found.")
                .dev_msg(detail)
                .build(),
        ))
    }

    pub fn internal(detail: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg("Storage operation failed.")
                .dev_msg(detail)
                .build(),
        ))
    }
}
