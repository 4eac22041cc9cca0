use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    pub jwt_secret: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub exp: i64,
}

/// Fixed-credential admin sessions: a matching username/password pair
/// yields a short-lived HS256 token; verification is signature and
/// expiry only, with no refresh or revocation list.
#[derive(Clone)]
pub struct AdminSession {
    config: AdminConfig,
}

impl AdminSession {
    pub fn new(config: AdminConfig) -> Self {
        Self { config }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if username != self.config.username || password != self.config.password {
            return Err(AuthError::unauthenticated("Invalid credentials"));
        }
        let claims = AdminClaims {
            sub: username.to_string(),
            exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|err| AuthError::internal(&format!("token signing failed: {err}")))
    }

    pub fn verify(&self, token: &str) -> Result<AdminClaims, AuthError> {
        decode::<AdminClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::unauthenticated("Invalid admin token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> AdminSession {
        AdminSession::new(AdminConfig {
            username: "admin".into(),
            password: "correct horse".into(),
            jwt_secret: "unit-test-secret".into(),
        })
    }

    #[test]
    fn login_roundtrips_through_verify() {
        let session = session();
        let token = session.login("admin", "correct horse").expect("login");
        let claims = session.verify(&token).expect("verify");
        assert_eq!(claims.sub, "admin");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn wrong_credentials_are_rejected() {
        let session = session();
        let err = session.login("admin", "wrong").expect_err("bad password");
        assert_eq!(err.0.status(), 401);
        let err = session.login("root", "correct horse").expect_err("bad user");
        assert_eq!(err.0.status(), 401);
    }

    #[test]
    fn expired_token_is_rejected() {
        let session = session();
        let stale = AdminClaims {
            sub: "admin".into(),
            exp: (Utc::now() - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret("unit-test-secret".as_bytes()),
        )
        .unwrap();
        assert!(session.verify(&token).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let session = session();
        let other = AdminSession::new(AdminConfig {
            username: "admin".into(),
            password: "correct horse".into(),
            jwt_secret: "different-secret".into(),
        });
        let token = other.login("admin", "correct horse").unwrap();
        assert!(session.verify(&token).is_err());
    }
}
