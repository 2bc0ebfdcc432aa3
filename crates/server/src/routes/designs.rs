//! AI design generation route.
//!
//! Open to guests; a valid token just attributes the design to its owner.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::models::AiDesign;
use crate::state::AppState;

/// Design generation request body.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Generate an amigurumi design from a prompt.
///
/// POST /api/v1/designs/generate
pub async fn generate(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<AiDesign>> {
    let design = state
        .designs()
        .generate(user.as_ref(), &request.prompt)
        .await?;

    Ok(Json(design))
}
