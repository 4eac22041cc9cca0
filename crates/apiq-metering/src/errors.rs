use apiq_errors::prelude::*;
use apiq_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct MeterError(pub Box<ErrorObj>);

impl MeterError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn internal(detail: &str) -> Self {
        MeterError(Box::new(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg("Usage metering failed.")
                .dev_msg(detail)
                .build(),
        ))
    }
}

impl From<StorageError> for MeterError {
    fn from(err: StorageError) -> Self {
        MeterError(Box::new(err.into_inner()))
    }
}
