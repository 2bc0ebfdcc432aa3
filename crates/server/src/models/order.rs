//! Order and line-item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use punto_y_lana_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// A placed order with its line items.
///
/// The item list is fixed at creation time; only status and tracking fields
/// change afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub date: DateTime<Utc>,
    /// Exact decimal sum of `price * quantity` over all items.
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub shipping_phone: Option<String>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub shipping_company: Option<String>,
    pub tracking_number: Option<String>,
    pub tracking_url: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Human-readable summary of the purchased products ("Yarn kit, Hook set"),
    /// used in the confirmation email.
    #[must_use]
    pub fn product_summary(&self) -> String {
        self.items
            .iter()
            .map(|item| item.product_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One line of an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    /// Product name at fetch time, joined in for display and email summaries.
    pub product_name: String,
    pub quantity: i32,
    /// Unit price captured when the order was placed; decoupled from later
    /// catalog price changes.
    pub price: Decimal,
}

impl OrderItem {
    /// Line subtotal in exact decimal arithmetic.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: i32, price: Decimal) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(1),
            product_id: ProductId::new(1),
            product_name: name.to_owned(),
            quantity,
            price,
        }
    }

    #[test]
    fn test_subtotal_is_exact() {
        // 0.10 * 3 == 0.30 exactly; would drift under f64
        let line = item("Merino yarn", 3, Decimal::new(10, 2));
        assert_eq!(line.subtotal(), Decimal::new(30, 2));
    }

    #[test]
    fn test_product_summary_joins_names() {
        let order = Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            date: Utc::now(),
            total_amount: Decimal::ZERO,
            status: OrderStatus::Pending,
            shipping_address: None,
            shipping_phone: None,
            notes: None,
            payment_method: None,
            shipping_company: None,
            tracking_number: None,
            tracking_url: None,
            shipped_at: None,
            delivered_at: None,
            items: vec![
                item("Merino yarn", 1, Decimal::new(1250, 2)),
                item("Crochet hook 4mm", 2, Decimal::new(300, 2)),
            ],
        };
        assert_eq!(order.product_summary(), "Merino yarn, Crochet hook 4mm");
    }
}
