use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod error;
mod generate;
mod likes;
mod prompts;
pub mod session;
mod throttle;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use crate::db::Store;
use crate::services::{GenerationService, RateLimiter};

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn limiter(&self) -> &RateLimiter {
        &self.shared.rate_limiter
    }

    #[must_use]
    pub fn generation(&self) -> &GenerationService {
        &self.shared.generation
    }
}

#[must_use]
pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route(
            "/prompts",
            get(prompts::list_prompts).post(prompts::create_prompt),
        )
        .route("/prompts/liked", get(likes::liked_prompts))
        .route(
            "/prompts/{id}",
            get(prompts::get_prompt).delete(prompts::delete_prompt),
        )
        .route("/prompts/{id}/generate", post(generate::generate_image))
        .route("/prompts/{id}/images", get(generate::list_images))
        .route(
            "/prompts/{id}/like",
            get(likes::like_status)
                .post(likes::like_prompt)
                .delete(likes::unlike_prompt),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            throttle::quota_middleware,
        ))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
