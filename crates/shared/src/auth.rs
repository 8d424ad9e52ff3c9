//! Claims carried by bearer tokens.
//!
//! Arqo does not issue credentials itself; cashiers and managers sign in
//! through the main back-office system and arrive here with a signed token.
//! Only the claims needed to attribute register actions are kept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user's ID.
    pub sub: Uuid,
    /// Role at the store, e.g. "cashier" or "manager".
    pub role: String,
    /// Unix timestamp the token was issued at.
    pub iat: i64,
    /// Unix timestamp the token expires at.
    pub exp: i64,
}

impl Claims {
    /// Builds claims for a user expiring at the given instant.
    #[must_use]
    pub fn new(user_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            role: role.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// The user this token belongs to.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn claims_carry_identity_and_expiry() {
        let user = Uuid::new_v4();
        let expires = Utc::now() + Duration::minutes(30);
        let claims = Claims::new(user, "cashier", expires);

        assert_eq!(claims.user_id(), user);
        assert_eq!(claims.role, "cashier");
        assert_eq!(claims.exp, expires.timestamp());
        assert!(claims.exp > claims.iat);
    }
}
