use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header, request::Parts},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;

pub const SESSION_COOKIE: &str = "sessionId";

/// One year, matching the cookie issued to anonymous browsers.
const SESSION_COOKIE_MAX_AGE_SECONDS: u64 = 31_536_000;

/// Anonymous session token scoping a client's likes.
///
/// Resolution order: `sessionId` cookie, then `X-Session-Id` header, then
/// `sessionId` query parameter. When none is present a fresh token is issued
/// and `issued` is set so the handler can attach the cookie to its response.
#[derive(Debug, Clone)]
pub struct SessionId {
    pub id: String,
    pub issued: bool,
}

impl SessionId {
    fn from_parts(headers: &HeaderMap, query: Option<&str>) -> Self {
        if let Some(id) = cookie_value(headers, SESSION_COOKIE) {
            return Self { id, issued: false };
        }

        if let Some(id) = headers
            .get("x-session-id")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return Self {
                id: id.to_string(),
                issued: false,
            };
        }

        if let Some(id) = query_value(query, SESSION_COOKIE) {
            return Self { id, issued: false };
        }

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            issued: true,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(&parts.headers, parts.uri.query()))
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for header_value in headers.get_all(header::COOKIE) {
        let Ok(raw) = header_value.to_str() else {
            continue;
        };
        for pair in raw.split(';') {
            if let Some((key, value)) = pair.split_once('=')
                && key.trim() == name
                && !value.trim().is_empty()
            {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

fn query_value(query: Option<&str>, name: &str) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Attaches the session cookie to the response when the token was freshly
/// issued for this request.
pub fn with_session_cookie<R: IntoResponse>(session: &SessionId, response: R) -> Response {
    let mut response = response.into_response();

    if session.issued {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; Max-Age={}; SameSite=Lax",
            SESSION_COOKIE, session.id, SESSION_COOKIE_MAX_AGE_SECONDS
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}
