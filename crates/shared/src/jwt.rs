//! JWT validation for back-office issued tokens.
//!
//! Arqo trusts tokens minted by the main back-office auth service and
//! shares its signing secret. Generation lives here too so dev tooling and
//! tests can mint their own.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key shared with the token issuer.
    pub secret: String,
    /// Token lifetime in minutes.
    pub token_expires_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            token_expires_minutes: 480,
        }
    }
}

/// Errors from token generation and validation.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is malformed or carries a bad signature.
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Signs and validates bearer tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_minutes: i64,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expires_minutes", &self.expires_minutes)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a service from the shared secret.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            expires_minutes: config.token_expires_minutes,
        }
    }

    /// Generates a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if signing fails.
    pub fn generate_token(&self, user_id: Uuid, role: &str) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::minutes(self.expires_minutes);
        let claims = Claims::new(user_id, role, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` when the token is past its `exp`, and
    /// `JwtError::Invalid` for anything else the decoder rejects.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }

    /// Returns the token lifetime in seconds.
    #[must_use]
    pub const fn token_expires_in(&self) -> i64 {
        self.expires_minutes * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_secret(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            token_expires_minutes: 60,
        })
    }

    #[test]
    fn round_trips_claims() {
        let service = service_with_secret("register-test-secret");
        let user_id = Uuid::new_v4();

        let token = service.generate_token(user_id, "manager").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.role, "manager");
    }

    #[test]
    fn rejects_garbage() {
        let service = service_with_secret("register-test-secret");
        let result = service.validate_token("not.a.token");
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = service_with_secret("secret-one")
            .generate_token(Uuid::new_v4(), "cashier")
            .unwrap();

        let other = service_with_secret("secret-two");
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let service = service_with_secret("register-test-secret");

        // Mint a token whose exp is far enough in the past to clear the
        // decoder's default leeway.
        let expired = Claims::new(Uuid::new_v4(), "cashier", Utc::now() - Duration::hours(2));
        let token = encode(
            &Header::default(),
            &expired,
            &EncodingKey::from_secret(b"register-test-secret"),
        )
        .unwrap();

        assert!(matches!(service.validate_token(&token), Err(JwtError::Expired)));
    }
}
