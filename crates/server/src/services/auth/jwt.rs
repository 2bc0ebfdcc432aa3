//! Token issuance and validation.
//!
//! Access tokens are HS256-signed JWTs. The subject is the user's email;
//! role and first name ride along so clients can render without a profile
//! fetch.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use punto_y_lana_core::Role;

use super::AuthError;
use crate::models::User;

/// Pre-derived signing and verification keys for one shared secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    /// Derive both keys from the configured secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Claims carried in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User's email address.
    pub sub: String,
    pub role: Role,
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none", default)]
    pub first_name: Option<String>,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Issue a signed access token for a user.
///
/// # Errors
///
/// Returns `AuthError::Token` if signing fails.
pub fn issue(keys: &TokenKeys, user: &User, lifetime_minutes: i64) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.email.as_str().to_owned(),
        role: user.role,
        first_name: user.first_name.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(lifetime_minutes)).timestamp(),
    };

    Ok(encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)?)
}

/// Validate a token's signature and expiry and return its claims.
///
/// # Errors
///
/// Returns `AuthError::Token` if the token is malformed, has a bad
/// signature, or is expired.
pub fn verify(keys: &TokenKeys, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(token, &keys.decoding, &validation)?;
    Ok(data.claims)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use punto_y_lana_core::{Email, UserId};

    fn keys() -> TokenKeys {
        TokenKeys::new(b"fQ2m8xR5vK1nT7wZ3cH9bL4jY6pD0sGa")
    }

    fn user() -> User {
        User {
            id: UserId::new(42),
            first_name: Some("Carla".to_owned()),
            last_name: None,
            email: Email::parse("carla@puntoylana.com").unwrap(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_issue_then_verify_round_trips_claims() {
        let keys = keys();
        let token = issue(&keys, &user(), 60).unwrap();

        let claims = verify(&keys, &token).unwrap();
        assert_eq!(claims.sub, "carla@puntoylana.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.first_name.as_deref(), Some("Carla"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_token_from_other_secret() {
        let token = issue(&keys(), &user(), 60).unwrap();
        let other = TokenKeys::new(b"Zw9kP3mV7rX1tQ5nB8cJ2hF6yL4dS0ge");

        assert!(matches!(
            verify(&other, &token),
            Err(AuthError::Token(_))
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let keys = keys();
        // Negative lifetime puts exp in the past
        let token = issue(&keys, &user(), -5).unwrap();

        assert!(verify(&keys, &token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(verify(&keys(), "not.a.token").is_err());
    }
}
