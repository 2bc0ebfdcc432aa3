//! User model.

use serde::Serialize;

use punto_y_lana_core::{Email, Role, UserId};

/// A registered user.
///
/// The password hash is intentionally not a field here: repositories return
/// it separately where verification needs it, so it can never leak through
/// serialization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Email,
    pub role: Role,
}

impl User {
    /// Name used in emails and token claims: first name when present,
    /// otherwise the local part of the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.first_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.local_part(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first_name: Option<&str>) -> User {
        User {
            id: UserId::new(1),
            first_name: first_name.map(str::to_owned),
            last_name: None,
            email: Email::parse("carla@puntoylana.com").expect("valid email"),
            role: Role::User,
        }
    }

    #[test]
    fn test_display_name_prefers_first_name() {
        assert_eq!(user(Some("Carla")).display_name(), "Carla");
    }

    #[test]
    fn test_display_name_falls_back_to_email_local_part() {
        assert_eq!(user(None).display_name(), "carla");
        assert_eq!(user(Some("")).display_name(), "carla");
    }

    #[test]
    fn test_serialized_user_has_no_password_field() {
        let json = serde_json::to_value(user(Some("Carla"))).expect("serialize");
        let obj = json.as_object().expect("object");
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("password_hash"));
    }
}
