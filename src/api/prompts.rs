use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::types::{DeleteResponse, ListPromptsResponse, PaginationDto, PromptDto};
use super::validation::{CreatePromptRequest, validate_new_prompt};
use super::{ApiError, AppState};
use crate::db::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::prompt::{Category, SearchFilters, SortBy};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub min_likes: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list_prompts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ListPromptsResponse>, ApiError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    // A category outside the fixed set can never match a stored prompt.
    let category = match params.category.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => match Category::parse(raw) {
            Some(category) => Some(category),
            None => {
                return Ok(Json(ListPromptsResponse {
                    prompts: Vec::new(),
                    pagination: PaginationDto::new(page, limit, 0),
                }));
            }
        },
        _ => None,
    };

    let filters = SearchFilters {
        query: params.q,
        category,
        min_likes: params.min_likes,
        sort_by: params.sort_by.as_deref().map_or_else(SortBy::default, SortBy::parse),
    };

    let (items, total) = state.store().list_prompts(&filters, page, limit).await?;

    Ok(Json(ListPromptsResponse {
        prompts: items.into_iter().map(PromptDto::from).collect(),
        pagination: PaginationDto::new(page, limit, total),
    }))
}

pub async fn get_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PromptDto>, ApiError> {
    let prompt = state
        .store()
        .get_prompt(&id)
        .await?
        .ok_or_else(|| ApiError::prompt_not_found(&id))?;

    Ok(Json(PromptDto::from(prompt)))
}

pub async fn create_prompt(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePromptRequest>,
) -> Result<(StatusCode, Json<PromptDto>), ApiError> {
    let new_prompt = validate_new_prompt(&payload)?;
    let prompt = state.store().create_prompt(&new_prompt).await?;

    Ok((StatusCode::CREATED, Json(PromptDto::from(prompt))))
}

pub async fn delete_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.store().remove_prompt(&id).await?;
    if !deleted {
        return Err(ApiError::prompt_not_found(&id));
    }

    Ok(Json(DeleteResponse { success: true }))
}
