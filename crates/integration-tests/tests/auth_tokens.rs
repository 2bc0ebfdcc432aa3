//! Token lifecycle tests across the auth service and middleware boundary.

use punto_y_lana_core::{Email, Role, UserId};
use punto_y_lana_server::models::User;
use punto_y_lana_server::services::auth::jwt::{self, TokenKeys};

fn keys() -> TokenKeys {
    TokenKeys::new(b"kR8vN2mX5qT9wZ1cJ4hB7yL0pD3sF6ga")
}

fn user(role: Role) -> User {
    User {
        id: UserId::new(1),
        first_name: Some("Carla".to_owned()),
        last_name: Some("Mendoza".to_owned()),
        email: Email::parse("carla@puntoylana.com").expect("valid email"),
        role,
    }
}

#[test]
fn token_round_trip_preserves_identity_and_role() {
    let keys = keys();
    let token = jwt::issue(&keys, &user(Role::Admin), 60).expect("issue");

    let claims = jwt::verify(&keys, &token).expect("verify");
    assert_eq!(claims.sub, "carla@puntoylana.com");
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.first_name.as_deref(), Some("Carla"));
}

#[test]
fn token_claims_use_the_documented_wire_names() {
    // Clients read the payload directly; field names are a contract.
    let token = jwt::issue(&keys(), &user(Role::User), 60).expect("issue");

    let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims.clear();
    let data = jsonwebtoken::decode::<serde_json::Value>(
        &token,
        &jsonwebtoken::DecodingKey::from_secret(b""),
        &validation,
    )
    .expect("decodable payload");

    let json = data.claims;
    assert_eq!(json["sub"], "carla@puntoylana.com");
    assert_eq!(json["role"], "ROLE_USER");
    assert_eq!(json["firstName"], "Carla");
    assert!(json["exp"].is_i64());
    assert!(json["iat"].is_i64());
}

#[test]
fn tampered_token_is_rejected() {
    let keys = keys();
    let token = jwt::issue(&keys, &user(Role::User), 60).expect("issue");

    // Flip a character in the signature segment
    let mut tampered = token.clone();
    let last = tampered.pop().expect("non-empty");
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    assert!(jwt::verify(&keys, &tampered).is_err());
}

#[test]
fn expired_token_is_rejected() {
    let keys = keys();
    let token = jwt::issue(&keys, &user(Role::User), -5).expect("issue");

    assert!(jwt::verify(&keys, &token).is_err());
}

#[test]
fn token_from_a_different_secret_is_rejected() {
    let token = jwt::issue(&keys(), &user(Role::User), 60).expect("issue");
    let other = TokenKeys::new(b"qW3eR5tY7uI9oP1aS2dF4gH6jK8lZ0xc");

    assert!(jwt::verify(&other, &token).is_err());
}
