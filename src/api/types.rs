use crate::entities::{generated_images, prompts};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDto {
    pub id: String,
    pub title: String,
    pub prompt_text: String,
    pub description: String,
    pub category: String,
    pub generated_image_url: Option<String>,
    pub usage_count: i32,
    pub likes_count: i32,
    pub created_at: String,
}

impl From<prompts::Model> for PromptDto {
    fn from(model: prompts::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            prompt_text: model.prompt_text,
            description: model.description,
            category: model.category,
            generated_image_url: model.generated_image_url,
            usage_count: model.usage_count,
            likes_count: model.likes_count,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImageDto {
    pub id: String,
    pub prompt_id: String,
    pub image_url: String,
    pub created_at: String,
}

impl From<generated_images::Model> for GeneratedImageDto {
    fn from(model: generated_images::Model) -> Self {
        Self {
            id: model.id,
            prompt_id: model.prompt_id,
            image_url: model.image_url,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_more: bool,
}

impl PaginationDto {
    #[must_use]
    pub const fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = total.div_ceil(limit);
        Self {
            page,
            limit,
            total,
            total_pages,
            has_more: page < total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListPromptsResponse {
    pub prompts: Vec<PromptDto>,
    pub pagination: PaginationDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeMutationResponse {
    pub success: bool,
    pub likes_count: i32,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatusResponse {
    pub has_liked: bool,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedPromptsResponse {
    pub liked_prompt_ids: Vec<String>,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub image_url: String,
    pub prompt_id: String,
    pub image_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// One field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Uniform error body. Optional members are only present where the error
/// class carries them (validation details, rate-limit hint, session echo).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            retry_after: None,
            session_id: None,
        }
    }
}
