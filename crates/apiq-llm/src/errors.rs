use apiq_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct LlmError(pub Box<ErrorObj>);

impl LlmError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn provider_unavailable(detail: &str) -> Self {
        LlmError(Box::new(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg("Image analysis failed.")
                .dev_msg(detail)
                .build(),
        ))
    }

    pub fn schema(detail: &str) -> Self {
        LlmError(Box::new(
            ErrorBuilder::new(codes::REQUEST_SCHEMA)
                .user_msg("Classifier request was rejected upstream.")
                .dev_msg(detail)
                .build(),
        ))
    }

    pub fn unknown(detail: &str) -> Self {
        LlmError(Box::new(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg("Image analysis failed.")
                .dev_msg(detail)
                .build(),
        ))
    }
}
