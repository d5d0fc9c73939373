use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::types::{GenerateResponse, GeneratedImageDto};
use super::{ApiError, AppState};

/// Runs image generation for a prompt. The unknown-prompt check happens
/// before anything else, so a 404 never touches the usage counter.
pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let prompt = state
        .store()
        .get_prompt(&id)
        .await?
        .ok_or_else(|| ApiError::prompt_not_found(&id))?;

    let outcome = state.generation().generate(&prompt).await?;

    Ok(Json(GenerateResponse {
        image_url: outcome.image_url,
        prompt_id: prompt.id,
        image_id: outcome.image_id,
    }))
}

/// Gallery of everything ever generated for a prompt, newest first.
pub async fn list_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<GeneratedImageDto>>, ApiError> {
    let images = state.store().images_for_prompt(&id).await?;

    Ok(Json(
        images.into_iter().map(GeneratedImageDto::from).collect(),
    ))
}
