//! Product categories.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Product category for the crochet catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Yarn,
    Needle,
    Pattern,
    Accessory,
    Kit,
}

impl Category {
    /// The stored/wire representation of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yarn => "YARN",
            Self::Needle => "NEEDLE",
            Self::Pattern => "PATTERN",
            Self::Accessory => "ACCESSORY",
            Self::Kit => "KIT",
        }
    }

    /// Case-insensitive parse that treats unknown names as "no category".
    ///
    /// Category filtering is a lenient contract: an unrecognized name yields
    /// an empty result set, never an error, so callers get `None` instead of
    /// a parse failure.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Option<Self> {
        s.to_ascii_uppercase().parse().ok()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored category string is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YARN" => Ok(Self::Yarn),
            "NEEDLE" => Ok(Self::Needle),
            "PATTERN" => Ok(Self::Pattern),
            "ACCESSORY" => Ok(Self::Accessory),
            "KIT" => Ok(Self::Kit),
            other => Err(ParseCategoryError(other.to_owned())),
        }
    }
}
