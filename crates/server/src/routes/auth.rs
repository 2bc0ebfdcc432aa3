//! Authentication API routes.
//!
//! All three endpoints respond with `{"token": "..."}` on success. Admin
//! registration additionally requires the shared secret in the
//! `X-Admin-Secret` header.

use axum::{Json, extract::State, http::HeaderMap};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use punto_y_lana_core::Role;

use crate::error::Result;
use crate::models::User;
use crate::services::AuthError;
use crate::services::auth::jwt;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
}

/// Token response for all auth endpoints.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new customer account.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>> {
    let user = state
        .auth()
        .register(
            request.firstname.as_deref(),
            request.lastname.as_deref(),
            &request.email,
            &request.password,
            Role::User,
        )
        .await?;

    send_welcome(&state, &user);

    let token = jwt::issue(
        state.token_keys(),
        &user,
        state.config().jwt_expiration_minutes,
    )?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok(Json(TokenResponse { token }))
}

/// Login with email and password.
///
/// POST /api/v1/auth/authenticate
pub async fn authenticate(
    State(state): State<AppState>,
    Json(request): Json<AuthenticateRequest>,
) -> Result<Json<TokenResponse>> {
    let user = state
        .auth()
        .authenticate(&request.email, &request.password)
        .await?;

    let token = jwt::issue(
        state.token_keys(),
        &user,
        state.config().jwt_expiration_minutes,
    )?;

    Ok(Json(TokenResponse { token }))
}

/// Register an admin account, guarded by the shared secret header.
///
/// POST /api/v1/auth/register-admin
pub async fn register_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>> {
    let provided = headers
        .get("x-admin-secret")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !constant_time_compare(provided, state.config().admin_secret.expose_secret()) {
        return Err(AuthError::InvalidAdminSecret.into());
    }

    let user = state
        .auth()
        .register(
            request.firstname.as_deref(),
            request.lastname.as_deref(),
            &request.email,
            &request.password,
            Role::Admin,
        )
        .await?;

    let token = jwt::issue(
        state.token_keys(),
        &user,
        state.config().jwt_expiration_minutes,
    )?;

    tracing::info!(user_id = %user.id, "Admin registered");
    Ok(Json(TokenResponse { token }))
}

/// Spawn the welcome email; registration never fails on delivery.
fn send_welcome(state: &AppState, user: &User) {
    let email = state.email().clone();
    let to = user.email.as_str().to_owned();
    let name = user.display_name().to_owned();

    tokio::spawn(async move {
        if let Err(e) = email.send_welcome(&to, &name).await {
            tracing::warn!(error = %e, "Failed to send welcome email");
        }
    });
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("hook-and-yarn", "hook-and-yarn"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("hook-and-yarn", "hook-and-yarN"));
        assert!(!constant_time_compare("hook", "hook-and-yarn"));
        assert!(!constant_time_compare("hook-and-yarn", "hook"));
    }
}
