//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, login, and token issuance
//! - `orders` - Transactional order placement and fulfilment
//! - `email` - SMTP delivery of transactional emails
//! - `designs` - AI design generation via Pollinations

pub mod auth;
pub mod designs;
pub mod email;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use designs::{DesignError, DesignService};
pub use email::{EmailError, EmailService};
pub use orders::{NewOrder, NewOrderItem, OrderError, OrderService};
