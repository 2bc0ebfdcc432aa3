//! JSON wire-format tests for the types clients consume.

use rust_decimal::Decimal;
use serde_json::json;

use punto_y_lana_core::{Category, Email, OrderStatus, ProductId, Role, UserId};
use punto_y_lana_server::models::{Product, User};

#[test]
fn roles_serialize_with_spring_style_names() {
    assert_eq!(serde_json::to_value(Role::User).expect("json"), "ROLE_USER");
    assert_eq!(serde_json::to_value(Role::Admin).expect("json"), "ROLE_ADMIN");
    assert_eq!(
        serde_json::from_value::<Role>(json!("ROLE_ADMIN")).expect("role"),
        Role::Admin
    );
}

#[test]
fn categories_use_screaming_snake_case() {
    assert_eq!(serde_json::to_value(Category::Yarn).expect("json"), "YARN");
    assert_eq!(
        serde_json::from_value::<Category>(json!("ACCESSORY")).expect("category"),
        Category::Accessory
    );
}

#[test]
fn category_lenient_parse_accepts_any_case_and_rejects_unknown() {
    assert_eq!(Category::parse_lenient("yarn"), Some(Category::Yarn));
    assert_eq!(Category::parse_lenient("Kit"), Some(Category::Kit));
    assert_eq!(Category::parse_lenient("socks"), None);
}

#[test]
fn order_status_wire_names() {
    for (status, name) in [
        (OrderStatus::Pending, "PENDING"),
        (OrderStatus::Paid, "PAID"),
        (OrderStatus::Shipped, "SHIPPED"),
        (OrderStatus::Delivered, "DELIVERED"),
    ] {
        assert_eq!(serde_json::to_value(status).expect("json"), name);
    }
}

#[test]
fn product_price_serializes_as_exact_decimal_string() {
    let product = Product {
        id: ProductId::new(3),
        name: "Lana merino rosa".to_owned(),
        description: None,
        price: Decimal::new(1250, 2),
        stock: Some(8),
        image_url: None,
        digital_url: None,
        category: Category::Yarn,
    };

    let json = serde_json::to_value(&product).expect("json");
    assert_eq!(json["price"], "12.50");
    assert_eq!(json["category"], "YARN");
    assert_eq!(json["stock"], 8);
}

#[test]
fn product_urls_use_camel_case_keys() {
    let product = Product {
        id: ProductId::new(5),
        name: "Kit amigurumi gato".to_owned(),
        description: None,
        price: Decimal::new(3990, 2),
        stock: Some(2),
        image_url: Some("https://cdn.puntoylana.com/img/gato.jpg".to_owned()),
        digital_url: None,
        category: Category::Kit,
    };

    let json = serde_json::to_value(&product).expect("json");
    let obj = json.as_object().expect("object");
    assert!(obj.contains_key("imageUrl"));
    assert!(obj.contains_key("digitalUrl"));
    assert!(!obj.contains_key("image_url"));
}

#[test]
fn untracked_product_has_null_stock_on_the_wire() {
    let product = Product {
        id: ProductId::new(4),
        name: "Patrón pulpo PDF".to_owned(),
        description: None,
        price: Decimal::new(500, 2),
        stock: None,
        image_url: None,
        digital_url: Some("https://cdn.puntoylana.com/patterns/pulpo.pdf".to_owned()),
        category: Category::Pattern,
    };

    let json = serde_json::to_value(&product).expect("json");
    assert!(json["stock"].is_null());
    assert!(!product.tracks_stock());
}

#[test]
fn serialized_user_never_carries_credentials() {
    let user = User {
        id: UserId::new(1),
        first_name: Some("Carla".to_owned()),
        last_name: None,
        email: Email::parse("carla@puntoylana.com").expect("valid"),
        role: Role::User,
    };

    let json = serde_json::to_value(&user).expect("json");
    let keys: Vec<&str> = json
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();

    assert!(keys.contains(&"email"));
    assert!(keys.contains(&"firstName"));
    assert!(!keys.iter().any(|k| k.contains("password")));
}
