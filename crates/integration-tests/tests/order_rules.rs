//! Order pricing and carrier rules.

use rust_decimal::Decimal;

use punto_y_lana_core::{OrderItemId, ProductId};
use punto_y_lana_server::models::OrderItem;
use punto_y_lana_server::services::orders::tracking_url_for;

fn line(quantity: i32, price: Decimal) -> OrderItem {
    OrderItem {
        id: OrderItemId::new(1),
        product_id: ProductId::new(1),
        product_name: "Lana merino".to_owned(),
        quantity,
        price,
    }
}

#[test]
fn line_subtotals_stay_exact_across_many_lines() {
    // 100 lines of 0.10 * 3 sum to exactly 30.00
    let total: Decimal = (0..100)
        .map(|_| line(3, Decimal::new(10, 2)).subtotal())
        .sum();

    assert_eq!(total, Decimal::new(3000, 2));
}

#[test]
fn subtotal_matches_price_times_quantity() {
    assert_eq!(
        line(7, Decimal::new(1299, 2)).subtotal(),
        Decimal::new(9093, 2)
    );
}

#[test]
fn interrapidisimo_tracking_url_vector() {
    assert_eq!(
        tracking_url_for("interrapidisimo", "123").as_deref(),
        Some("https://www.interrapidisimo.com/rastreo/?guia=123")
    );
}

#[test]
fn servientrega_tracking_url_vector() {
    assert_eq!(
        tracking_url_for("servientrega", "GT-77").as_deref(),
        Some("https://www.servientrega.com/wps/portal/rastreo-envio?guia=GT-77")
    );
}

#[test]
fn carrier_match_ignores_case_and_unknowns_get_none() {
    assert!(tracking_url_for("InterRapidisimo", "1").is_some());
    assert!(tracking_url_for("SERVIENTREGA", "1").is_some());
    assert_eq!(tracking_url_for("fedex", "1"), None);
}
