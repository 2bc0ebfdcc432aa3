//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::auth::jwt::TokenKeys;
use crate::services::{AuthService, DesignService, EmailService, OrderService};

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("SMTP configuration error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the pool, configuration,
/// and shared clients, plus constructors for the per-request services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    token_keys: TokenKeys,
    email: EmailService,
    http: reqwest::Client,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay address or HTTP client
    /// configuration is invalid.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, StateError> {
        let token_keys = TokenKeys::new(config.jwt_secret.expose_secret().as_bytes());
        let email = EmailService::new(config.email.as_ref(), &config.mail_from)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                token_keys,
                email,
                http,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the token signing keys.
    #[must_use]
    pub fn token_keys(&self) -> &TokenKeys {
        &self.inner.token_keys
    }

    /// Get a reference to the email service.
    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }

    /// Authentication service bound to this state's pool.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.pool())
    }

    /// Order service bound to this state's pool and email service.
    #[must_use]
    pub fn orders(&self) -> OrderService<'_> {
        OrderService::new(self.pool(), self.email())
    }

    /// Design service bound to this state's pool and HTTP client.
    #[must_use]
    pub fn designs(&self) -> DesignService<'_> {
        DesignService::new(
            self.pool(),
            &self.inner.http,
            &self.inner.config.pollinations_base_url,
        )
    }
}
