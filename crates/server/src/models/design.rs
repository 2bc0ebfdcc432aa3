//! AI design model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use punto_y_lana_core::{DesignId, UserId};

/// A generated amigurumi design. Append-only; anonymous generation is
/// allowed, so the owner is optional.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDesign {
    pub id: DesignId,
    pub user_id: Option<UserId>,
    /// The prompt exactly as the user typed it.
    pub user_prompt: String,
    /// The templated prompt actually sent to the generator.
    pub enhanced_prompt: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}
