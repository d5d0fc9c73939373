use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::fmt;

use super::types::{ErrorBody, FieldError};
use crate::services::GenerationServiceError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError { details: Vec<FieldError> },

    /// Soft conflict: the (prompt, session) pair is already liked.
    AlreadyLiked { session_id: String },

    /// Soft conflict: nothing to unlike for this pair.
    NotLiked { session_id: String },

    RateLimited { retry_after_seconds: u64 },

    /// Upstream generation exhausted its attempts; retry internals stay
    /// server-side.
    GenerationFailed,

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::ValidationError { details } => {
                write!(f, "Validation error ({} fields)", details.len())
            }
            Self::AlreadyLiked { .. } => write!(f, "Already liked"),
            Self::NotLiked { .. } => write!(f, "Not liked yet"),
            Self::RateLimited {
                retry_after_seconds,
            } => write!(f, "Rate limited, retry after {retry_after_seconds}s"),
            Self::GenerationFailed => write!(f, "Image generation failed"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, Json(ErrorBody::new(msg))).into_response(),
            Self::ValidationError { details } => {
                let body = ErrorBody {
                    details: Some(details),
                    ..ErrorBody::new("Validation error")
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::AlreadyLiked { session_id } => {
                let body = ErrorBody {
                    session_id: Some(session_id),
                    ..ErrorBody::new("Already liked")
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::NotLiked { session_id } => {
                let body = ErrorBody {
                    session_id: Some(session_id),
                    ..ErrorBody::new("Not liked yet")
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::RateLimited {
                retry_after_seconds,
            } => {
                let body = ErrorBody {
                    retry_after: Some(retry_after_seconds),
                    ..ErrorBody::new("Too many requests")
                };
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, retry_after_seconds.to_string())],
                    Json(body),
                )
                    .into_response()
            }
            Self::GenerationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Failed to generate image")),
            )
                .into_response(),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("A database error occurred")),
                )
                    .into_response()
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("An internal error occurred")),
                )
                    .into_response()
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

impl From<GenerationServiceError> for ApiError {
    fn from(err: GenerationServiceError) -> Self {
        match err {
            GenerationServiceError::Upstream(e) => {
                tracing::error!("Image generation failed: {}", e);
                Self::GenerationFailed
            }
            GenerationServiceError::Database(e) => Self::DatabaseError(e.to_string()),
        }
    }
}

impl ApiError {
    pub fn prompt_not_found(id: &str) -> Self {
        Self::NotFound(format!("Prompt {id} not found"))
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            details: vec![FieldError {
                field,
                message: message.into(),
            }],
        }
    }
}
