//! AI design repository. Append-only.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use punto_y_lana_core::{DesignId, UserId};

use super::RepositoryError;
use crate::models::AiDesign;

#[derive(sqlx::FromRow)]
struct DesignRow {
    id: i64,
    user_id: Option<i64>,
    user_prompt: String,
    enhanced_prompt: String,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl DesignRow {
    fn into_design(self) -> AiDesign {
        AiDesign {
            id: DesignId::new(self.id),
            user_id: self.user_id.map(UserId::new),
            user_prompt: self.user_prompt,
            enhanced_prompt: self.enhanced_prompt,
            image_url: self.image_url,
            created_at: self.created_at,
        }
    }
}

/// Repository for generated-design rows.
pub struct DesignRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DesignRepository<'a> {
    /// Create a new design repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a generated design. `user_id` is `None` for anonymous
    /// generation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: Option<UserId>,
        user_prompt: &str,
        enhanced_prompt: &str,
        image_url: &str,
    ) -> Result<AiDesign, RepositoryError> {
        let row = sqlx::query_as::<_, DesignRow>(
            "INSERT INTO ai_designs (user_id, user_prompt, enhanced_prompt, image_url)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, user_prompt, enhanced_prompt, image_url, created_at",
        )
        .bind(user_id)
        .bind(user_prompt)
        .bind(enhanced_prompt)
        .bind(image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into_design())
    }
}
