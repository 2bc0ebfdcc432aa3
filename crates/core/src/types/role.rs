//! User roles.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user's role, carried as a token claim and stored on the user row.
///
/// The wire form matches the stored form (`ROLE_USER` / `ROLE_ADMIN`); the
/// authorization layer maps the role to route access, nothing else hangs off
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Regular customer.
    #[default]
    #[serde(rename = "ROLE_USER")]
    User,
    /// Store administrator.
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    /// The stored/wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Admin => "ROLE_ADMIN",
        }
    }

    /// Whether this role grants access to admin routes.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored role string is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_USER" => Ok(Self::User),
            "ROLE_ADMIN" => Ok(Self::Admin),
            other => Err(ParseRoleError(other.to_owned())),
        }
    }
}
