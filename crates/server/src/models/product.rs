//! Catalog product model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use punto_y_lana_core::{Category, ProductId};

/// A catalog product.
///
/// `stock` of `None` means inventory is not tracked: digital goods
/// (patterns, course links) are never stock-checked and never decremented.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Exact decimal price; money never touches binary floating point.
    pub price: Decimal,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    /// Download link delivered after purchase of a digital good.
    pub digital_url: Option<String>,
    pub category: Category,
}

impl Product {
    /// Whether this product has tracked inventory.
    #[must_use]
    pub const fn tracks_stock(&self) -> bool {
        self.stock.is_some()
    }
}

/// Incoming product payload for create and update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub digital_url: Option<String>,
    pub category: Category,
}
