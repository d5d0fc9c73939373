use axum::{
    extract::{ConnectInfo, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use super::session::SessionId;
use super::{ApiError, AppState};
use crate::services::QuotaTier;

/// Per-client quota enforcement for the whole API surface.
///
/// Runs before any handler: an over-quota generation request is rejected
/// before the prompt's usage counter is touched. Every request draws from
/// the general tier; mutations additionally draw from the write tier and
/// generation calls from the (strictest) generation tier.
pub async fn quota_middleware(
    State(state): State<Arc<AppState>>,
    session: SessionId,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_key(&session, &request);

    let limiter = state.limiter();
    to_api_result(limiter.check(QuotaTier::General, &key))?;

    if let Some(tier) = tier_for(request.method(), request.uri().path()) {
        to_api_result(limiter.check(tier, &key))?;
    }

    Ok(next.run(request).await)
}

/// Session id when the client supplied one, otherwise the peer address.
fn client_key(session: &SessionId, request: &Request) -> String {
    if session.issued {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map_or_else(|| "anonymous".to_string(), |info| info.0.ip().to_string())
    } else {
        session.id.clone()
    }
}

fn tier_for(method: &Method, path: &str) -> Option<QuotaTier> {
    if method == Method::POST && path.ends_with("/generate") {
        return Some(QuotaTier::Generation);
    }
    matches!(*method, Method::POST | Method::PUT | Method::DELETE).then_some(QuotaTier::Write)
}

fn to_api_result(result: Result<(), Duration>) -> Result<(), ApiError> {
    result.map_err(|retry_after| ApiError::RateLimited {
        retry_after_seconds: retry_after.as_secs().max(1),
    })
}
