use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use super::session::{SessionId, with_session_cookie};
use super::types::{LikeMutationResponse, LikeStatusResponse, LikedPromptsResponse};
use super::{ApiError, AppState};

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LikeBody {
    pub session_id: Option<String>,
}

/// Body-supplied session id is honored only when no cookie/header/query id
/// was present.
fn resolve_session(session: SessionId, body: Option<&LikeBody>) -> SessionId {
    if session.issued
        && let Some(id) = body.and_then(|b| b.session_id.as_deref())
        && !id.is_empty()
    {
        return SessionId {
            id: id.to_string(),
            issued: false,
        };
    }
    session
}

pub async fn like_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    session: SessionId,
    body: Option<Json<LikeBody>>,
) -> Result<Response, ApiError> {
    let session = resolve_session(session, body.as_deref());

    if state.store().get_prompt(&id).await?.is_none() {
        return Err(ApiError::prompt_not_found(&id));
    }

    let success = state.store().like_prompt(&id, &session.id).await?;
    if !success {
        return Err(ApiError::AlreadyLiked {
            session_id: session.id,
        });
    }

    let likes_count = state
        .store()
        .get_prompt(&id)
        .await?
        .map_or(0, |p| p.likes_count);

    Ok(with_session_cookie(
        &session,
        Json(LikeMutationResponse {
            success: true,
            likes_count,
            session_id: session.id.clone(),
        }),
    ))
}

pub async fn unlike_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    session: SessionId,
    body: Option<Json<LikeBody>>,
) -> Result<Response, ApiError> {
    let session = resolve_session(session, body.as_deref());

    let success = state.store().unlike_prompt(&id, &session.id).await?;
    if !success {
        return Err(ApiError::NotLiked {
            session_id: session.id,
        });
    }

    let likes_count = state
        .store()
        .get_prompt(&id)
        .await?
        .map_or(0, |p| p.likes_count);

    Ok(with_session_cookie(
        &session,
        Json(LikeMutationResponse {
            success: true,
            likes_count,
            session_id: session.id.clone(),
        }),
    ))
}

pub async fn like_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    session: SessionId,
) -> Result<Response, ApiError> {
    let has_liked = state.store().has_liked(&id, &session.id).await?;

    Ok(with_session_cookie(
        &session,
        Json(LikeStatusResponse {
            has_liked,
            session_id: session.id.clone(),
        }),
    ))
}

pub async fn liked_prompts(
    State(state): State<Arc<AppState>>,
    session: SessionId,
) -> Result<Response, ApiError> {
    let liked_prompt_ids = state.store().liked_prompt_ids(&session.id).await?;

    Ok(with_session_cookie(
        &session,
        Json(LikedPromptsResponse {
            liked_prompt_ids,
            session_id: session.id.clone(),
        }),
    ))
}
