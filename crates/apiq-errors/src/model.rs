use serde::Serialize;

use crate::codes::ErrorCode;

/// Uniform error payload carried by every domain error newtype.
/// `user_msg` is safe to put on the wire; `dev_msg` is for logs and,
/// by deliberate policy, the anonymous diagnostics route only.
#[derive(Clone, Debug, Serialize)]
pub struct ErrorObj {
    pub code: &'static str,
    #[serde(skip)]
    pub http_status: u16,
    pub user_msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_msg: Option<String>,
}

impl ErrorObj {
    pub fn status(&self) -> u16 {
        self.http_status
    }
}

impl std::fmt::Display for ErrorObj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.dev_msg.as_deref() {
            Some(dev) => write!(f, "{}: {} ({dev})", self.code, self.user_msg),
            None => write!(f, "{}: {}", self.code, self.user_msg),
        }
    }
}

pub struct ErrorBuilder {
    code: ErrorCode,
    user_msg: Option<String>,
    dev_msg: Option<String>,
}

impl ErrorBuilder {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            user_msg: None,
            dev_msg: None,
        }
    }

    pub fn user_msg(mut self, msg: impl Into<String>) -> Self {
        self.user_msg = Some(msg.into());
        self
    }

    pub fn dev_msg(mut self, msg: impl Into<String>) -> Self {
        self.dev_msg = Some(msg.into());
        self
    }

    pub fn build(self) -> ErrorObj {
        ErrorObj {
            code: self.code.code,
            http_status: self.code.http_status,
            user_msg: self
                .user_msg
                .unwrap_or_else(|| "Request failed.".to_string()),
            dev_msg: self.dev_msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;

    #[test]
    fn builder_carries_code_and_status() {
        let err = ErrorBuilder::new(codes::AUTH_UNAUTHENTICATED)
            .user_msg("Invalid API key")
            .dev_msg("key ak_deadbeef not found")
            .build();
        assert_eq!(err.code, "AUTH.UNAUTHENTICATED");
        assert_eq!(err.status(), 401);
        assert!(err.to_string().contains("ak_deadbeef"));
    }

    #[test]
    fn dev_msg_is_not_serialized_when_absent() {
        let err = ErrorBuilder::new(codes::REQUEST_SCHEMA)
            .user_msg("No photo found in request")
            .build();
        let value = serde_json::to_value(&err).unwrap();
        assert!(value.get("dev_msg").is_none());
        assert_eq!(value["user_msg"], "No photo found in request");
    }
}
