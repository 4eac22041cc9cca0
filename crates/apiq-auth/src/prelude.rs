pub use crate::admin::{AdminClaims, AdminConfig, AdminSession};
pub use crate::apikey::KeyStore;
pub use crate::errors::AuthError;
