//! Domain models serialized over the API.
//!
//! Database row shapes live next to the queries in [`crate::db`]; these are
//! the validated forms handlers and services work with.

pub mod design;
pub mod order;
pub mod product;
pub mod user;

pub use design::AiDesign;
pub use order::{Order, OrderItem};
pub use product::{Product, ProductDraft};
pub use user::User;
