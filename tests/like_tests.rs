use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use promptarr::config::Config;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.seed_defaults = false;
    config.rate_limit.general_max_requests = 10_000;
    config.rate_limit.write_max_requests = 1_000;

    let state = promptarr::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    promptarr::api::router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn create_prompt(app: &Router) -> String {
    let payload = serde_json::json!({
        "title": "Likeable Scene",
        "promptText": "A cozy cabin under the northern lights in winter",
        "description": "A scene people tend to like",
        "category": "nature",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/prompts")
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    session: Option<&str>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header("X-Session-Id", session);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_like_unlike_flow() {
    let app = spawn_app().await;
    let id = create_prompt(&app).await;
    let like_uri = format!("/api/prompts/{id}/like");

    let response = send(&app, "POST", &like_uri, Some("session-a")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["likesCount"], 1);
    assert_eq!(body["sessionId"], "session-a");

    let response = send(&app, "GET", &like_uri, Some("session-a")).await;
    let body = body_json(response).await;
    assert_eq!(body["hasLiked"], true);

    // Second like from the same session is rejected and changes nothing
    let response = send(&app, "POST", &like_uri, Some("session-a")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", &format!("/api/prompts/{id}"), None).await;
    assert_eq!(body_json(response).await["likesCount"], 1);

    let response = send(&app, "DELETE", &like_uri, Some("session-a")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["likesCount"], 0);

    // Unliking again has nothing to remove
    let response = send(&app, "DELETE", &like_uri, Some("session-a")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", &format!("/api/prompts/{id}"), None).await;
    assert_eq!(body_json(response).await["likesCount"], 0);
}

#[tokio::test]
async fn test_like_then_unlike_then_like_nets_one() {
    let app = spawn_app().await;
    let id = create_prompt(&app).await;
    let like_uri = format!("/api/prompts/{id}/like");

    send(&app, "POST", &like_uri, Some("session-a")).await;
    send(&app, "DELETE", &like_uri, Some("session-a")).await;
    let response = send(&app, "POST", &like_uri, Some("session-a")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["likesCount"], 1);

    let response = send(&app, "GET", &like_uri, Some("session-a")).await;
    assert_eq!(body_json(response).await["hasLiked"], true);
}

#[tokio::test]
async fn test_likes_are_scoped_per_session() {
    let app = spawn_app().await;
    let id = create_prompt(&app).await;
    let like_uri = format!("/api/prompts/{id}/like");

    let response = send(&app, "POST", &like_uri, Some("session-a")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, "POST", &like_uri, Some("session-b")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["likesCount"], 2);

    let response = send(&app, "GET", &like_uri, Some("session-c")).await;
    assert_eq!(body_json(response).await["hasLiked"], false);

    let response = send(&app, "GET", "/api/prompts/liked", Some("session-a")).await;
    let body = body_json(response).await;
    let liked: Vec<&str> = body["likedPromptIds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(liked, vec![id.as_str()]);
}

#[tokio::test]
async fn test_concurrent_duplicate_likes_record_exactly_one() {
    use promptarr::db::Store;
    use promptarr::models::prompt::{Category, NewPrompt};

    let store = Store::new("sqlite::memory:").await.unwrap();
    let prompt = store
        .create_prompt(&NewPrompt {
            title: "Race Target".to_string(),
            prompt_text: "A prompt liked by many hands at once".to_string(),
            description: "Concurrency fodder".to_string(),
            category: Category::Abstract,
        })
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        let id = prompt.id.clone();
        handles.push(tokio::spawn(async move {
            store.like_prompt(&id, "session-racer").await
        }));
    }

    // A racing duplicate must come back as the soft `false`, never an error
    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);

    let fresh = store.get_prompt(&prompt.id).await.unwrap().unwrap();
    assert_eq!(fresh.likes_count, 1);
}

#[tokio::test]
async fn test_like_unknown_prompt_returns_404() {
    let app = spawn_app().await;

    let response = send(&app, "POST", "/api/prompts/no-such-id/like", Some("session-a")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fresh_session_gets_cookie() {
    let app = spawn_app().await;
    let id = create_prompt(&app).await;

    let response = send(&app, "POST", &format!("/api/prompts/{id}/like"), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("expected a session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("sessionId="));
    assert!(cookie.contains("HttpOnly"));

    let body = body_json(response).await;
    let session_id = body["sessionId"].as_str().unwrap();
    assert!(!session_id.is_empty());
    assert!(cookie.contains(session_id));
}

#[tokio::test]
async fn test_body_session_id_is_honored_as_last_resort() {
    let app = spawn_app().await;
    let id = create_prompt(&app).await;
    let like_uri = format!("/api/prompts/{id}/like");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(&like_uri)
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"sessionId":"from-body"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["sessionId"], "from-body");

    // Header wins over the body
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&like_uri)
                .header("X-Session-Id", "from-header")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"sessionId":"from-body"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    // from-header never liked this prompt
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["sessionId"], "from-header");
}
