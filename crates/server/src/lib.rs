//! Punto y Lana backend library.
//!
//! Catalog, orders, authentication, admin panel, and AI design generation
//! for the Punto y Lana crochet store. The binary in `main.rs` wires this
//! together; everything lives here so the logic is testable.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
