//! AI design generation via the Pollinations image service.
//!
//! Pollinations renders images on demand from the URL itself, so
//! "generation" here is prompt templating plus URL construction; no API
//! call is needed to produce the result. A background GET warms the image
//! cache so the first viewer doesn't wait for the render.

use sqlx::PgPool;
use thiserror::Error;

use crate::db::{DesignRepository, RepositoryError};
use crate::models::{AiDesign, User};

/// Errors that can occur while generating a design.
#[derive(Debug, Error)]
pub enum DesignError {
    /// Prompt was empty or whitespace.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// AI design generation service.
pub struct DesignService<'a> {
    pool: &'a PgPool,
    http: &'a reqwest::Client,
    base_url: &'a str,
}

impl<'a> DesignService<'a> {
    /// Create a new design service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, http: &'a reqwest::Client, base_url: &'a str) -> Self {
        Self {
            pool,
            http,
            base_url,
        }
    }

    /// Generate an amigurumi design from a user prompt.
    ///
    /// Anonymous requests are allowed; `user` is `None` for them. The
    /// design row records both the raw prompt and the templated one.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::EmptyPrompt` if the prompt has no content.
    /// Returns `DesignError::Repository` if persisting fails.
    pub async fn generate(
        &self,
        user: Option<&User>,
        prompt: &str,
    ) -> Result<AiDesign, DesignError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(DesignError::EmptyPrompt);
        }

        let enhanced = enhance_prompt(prompt);
        let image_url = image_url(self.base_url, &enhanced);

        let design = DesignRepository::new(self.pool)
            .create(user.map(|u| u.id), prompt, &enhanced, &image_url)
            .await?;

        tracing::info!(design_id = %design.id, "Design generated");
        self.warm_up(&image_url);

        Ok(design)
    }

    /// Fire a background GET so Pollinations renders the image before the
    /// client loads it. Failures only cost the warm-up.
    fn warm_up(&self, image_url: &str) {
        let http = self.http.clone();
        let url = image_url.to_owned();

        tokio::spawn(async move {
            if let Err(e) = http.get(&url).send().await {
                tracing::debug!(error = %e, "Design warm-up request failed");
            }
        });
    }
}

/// Wrap the user's idea in the amigurumi style template tuned for the
/// FLUX model.
fn enhance_prompt(user_prompt: &str) -> String {
    format!(
        "Stunning 3D render of a cute handcrafted amigurumi crochet {user_prompt}, \
         Pixar Disney animation style, soft volumetric lighting, \
         visible crochet wool texture with fuzzy yarn fibers, \
         kawaii style with big expressive eyes, \
         pastel gradient background, \
         professional product photography, \
         8K hyperrealistic CGI, centered composition, warm colors"
    )
}

/// Build the direct image URL for a templated prompt.
fn image_url(base_url: &str, enhanced_prompt: &str) -> String {
    format!(
        "{}/prompt/{}?width=1024&height=1024&model=flux&nologo=true",
        base_url.trim_end_matches('/'),
        urlencoding::encode(enhanced_prompt)
    )
}
