//! Authentication middleware and extractors.
//!
//! Requests carry a bearer token in the `Authorization` header. The
//! extractors verify it and load the current user:
//!
//! - [`RequireUser`] rejects with 401 when there is no valid token
//! - [`OptionalUser`] treats a missing or invalid token as anonymous
//! - [`RequireAdmin`] additionally rejects non-admins with 403

use axum::{extract::FromRequestParts, http::request::Parts};

use punto_y_lana_core::Email;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::User;
use crate::services::auth::jwt;
use crate::state::AppState;

/// Extractor that requires an authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.display_name())
/// }
/// ```
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_owned()))?;

        let claims = jwt::verify(state.token_keys(), token)
            .map_err(|_| AppError::Unauthorized("invalid or expired token".to_owned()))?;

        let user = lookup(state, &claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("unknown user".to_owned()))?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// A missing, malformed, or expired token makes the request anonymous
/// instead of rejecting it; endpoints open to guests use this.
pub struct OptionalUser(pub Option<User>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(parts) {
            Some(token) => match jwt::verify(state.token_keys(), token) {
                Ok(claims) => lookup(state, &claims.sub).await.ok().flatten(),
                Err(_) => None,
            },
            None => None,
        };

        Ok(Self(user))
    }
}

/// Extractor that requires an authenticated admin.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AppError::Forbidden("admin access required".to_owned()));
        }

        Ok(Self(user))
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve token claims to a live user row.
///
/// The subject is the email; a user deleted after token issuance simply
/// fails to resolve.
async fn lookup(state: &AppState, subject: &str) -> Result<Option<User>, AppError> {
    let Ok(email) = Email::parse(subject) else {
        return Ok(None);
    };

    Ok(UserRepository::new(state.pool()).get_by_email(&email).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .uri("/api/v1/orders")
            .header("authorization", value)
            .body(())
            .expect("valid request")
            .into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extracts_value() {
        let parts = parts_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        let parts = parts_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let (parts, ()) = Request::builder()
            .uri("/api/v1/orders")
            .body(())
            .expect("valid request")
            .into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
