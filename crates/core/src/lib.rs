//! Punto y Lana Core - Shared domain types.
//!
//! This crate provides the common types used across the Punto y Lana
//! components:
//! - `server` - JSON API for the storefront, orders, and the admin panel
//! - `integration-tests` - cross-crate behavioral tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email addresses, roles, categories, and order
//!   statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
