use apiq_errors::prelude::*;
use apiq_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct AuthError(pub Box<ErrorObj>);

impl AuthError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn unauthenticated(user_msg: &str) -> Self {
        AuthError(Box::new(
            ErrorBuilder::new(codes::AUTH_UNAUTHENTICATED)
                .user_msg(user_msg)
                .build(),
        ))
    }

    pub fn internal(detail: &str) -> Self {
        AuthError(Box::new(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg("Authentication backend failed.")
                .dev_msg(detail)
                .build(),
        ))
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        AuthError(Box::new(err.into_inner()))
    }
}
