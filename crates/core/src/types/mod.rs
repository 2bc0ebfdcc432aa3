//! Core types for Punto y Lana.
//!
//! Type-safe wrappers for the domain concepts shared by every component.

pub mod category;
pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use category::{Category, ParseCategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use role::{ParseRoleError, Role};
pub use status::{OrderStatus, ParseOrderStatusError};
