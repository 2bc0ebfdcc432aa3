//! Integration tests for Punto y Lana.
//!
//! These exercise the server library across module boundaries without a
//! database: token lifecycle, the HTTP error surface, order pricing and
//! carrier rules, and the JSON wire formats clients depend on.
//!
//! Run with: `cargo test -p punto-y-lana-integration-tests`
