//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (pings the database)
//!
//! # Auth
//! POST /api/v1/auth/register            - Register, returns {"token"}
//! POST /api/v1/auth/authenticate        - Login, returns {"token"}
//! POST /api/v1/auth/register-admin      - Admin registration (X-Admin-Secret header)
//!
//! # Public catalog
//! GET  /api/v1/public/products                      - Full catalog
//! GET  /api/v1/public/products/{id}                 - One product
//! GET  /api/v1/public/products/category/{category}  - Filter by category
//! GET  /api/v1/public/products/search?q=            - Name search
//!
//! # Orders (requires auth)
//! POST /api/v1/orders                   - Place an order
//! GET  /api/v1/orders                   - My orders, newest first
//! GET  /api/v1/orders/{id}              - One of my orders
//!
//! # Designs (anonymous allowed, rate limited)
//! POST /api/v1/designs/generate         - Generate an amigurumi design
//!
//! # Admin (requires admin role)
//! GET    /api/v1/admin/products
//! POST   /api/v1/admin/products
//! PUT    /api/v1/admin/products/{id}
//! DELETE /api/v1/admin/products/{id}
//! GET    /api/v1/admin/users
//! POST   /api/v1/admin/users/{id}/make-admin
//! GET    /api/v1/admin/orders
//! PUT    /api/v1/admin/orders/{id}/tracking
//! POST   /api/v1/admin/orders/{id}/delivered
//! GET    /api/v1/admin/stats
//! ```

pub mod admin;
pub mod auth;
pub mod designs;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware::rate_limit;
use crate::state::AppState;

/// Build the full API router.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/authenticate", post(auth::authenticate))
        .route("/api/v1/auth/register-admin", post(auth::register_admin))
        .route("/api/v1/public/products", get(products::list))
        .route("/api/v1/public/products/search", get(products::search))
        .route(
            "/api/v1/public/products/category/{category}",
            get(products::by_category),
        )
        .route("/api/v1/public/products/{id}", get(products::get))
        .route("/api/v1/orders", post(orders::create).get(orders::list_mine))
        .route("/api/v1/orders/{id}", get(orders::get_mine))
        .merge(design_routes())
        .merge(admin_routes())
}

/// Design generation, wrapped in its per-IP rate limit.
fn design_routes() -> Router<AppState> {
    let limiter = rate_limit::design_rate_limiter();

    Router::new()
        .route("/api/v1/designs/generate", post(designs::generate))
        .layer(axum::middleware::from_fn_with_state(
            limiter,
            rate_limit::limit_by_ip,
        ))
}

/// Admin panel; role enforcement lives in the `RequireAdmin` extractor.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/admin/products", get(admin::list_products))
        .route("/api/v1/admin/products", post(admin::create_product))
        .route("/api/v1/admin/products/{id}", put(admin::update_product))
        .route("/api/v1/admin/products/{id}", delete(admin::delete_product))
        .route("/api/v1/admin/users", get(admin::list_users))
        .route("/api/v1/admin/users/{id}/make-admin", post(admin::make_admin))
        .route("/api/v1/admin/orders", get(admin::list_orders))
        .route("/api/v1/admin/orders/{id}/tracking", put(admin::update_tracking))
        .route("/api/v1/admin/orders/{id}/delivered", post(admin::mark_delivered))
        .route("/api/v1/admin/stats", get(admin::stats))
}
