use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use promptarr::config::Config;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-image:generateContent";

/// App wired against a mock upstream, with near-zero retry backoff and a
/// small generation quota so the limiter is exercisable in-test.
async fn spawn_app(upstream_url: &str, generation_quota: u32, max_attempts: u32) -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.seed_defaults = false;
    config.gemini.base_url = upstream_url.to_string();
    config.gemini.api_key = "test-key".to_string();
    config.gemini.max_attempts = max_attempts;
    config.gemini.retry_base_delay_ms = 1;
    config.rate_limit.generation_max_requests = generation_quota;

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
        "title": "Render Me",
        "promptText": "A lighthouse on a cliff during a thunderstorm at night",
        "description": "A dramatic coastal scene",
        "category": "nature",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/prompts")
                .header("Content-Type", "application/json")
                .header("X-Session-Id", "session-gen")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

async fn post_generate(app: &Router, id: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/prompts/{id}/generate"))
                .header("X-Session-Id", "session-gen")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get_json(app: &Router, uri: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("X-Session-Id", "session-gen")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    body_json(response).await
}

fn image_response(data: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{
                    "inlineData": { "mimeType": "image/png", "data": data }
                }]
            }
        }]
    }))
}

#[tokio::test]
async fn test_generate_image_success() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(image_response("aGVsbG8="))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream.uri(), 10, 1).await;
    let id = create_prompt(&app).await;

    let response = post_generate(&app, &id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["imageUrl"], "data:image/png;base64,aGVsbG8=");
    assert_eq!(body["promptId"], id);
    assert!(!body["imageId"].as_str().unwrap().is_empty());

    // Usage counted, gallery populated, prompt carries the latest image
    let prompt = get_json(&app, &format!("/api/prompts/{id}")).await;
    assert_eq!(prompt["usageCount"], 1);
    assert_eq!(prompt["generatedImageUrl"], "data:image/png;base64,aGVsbG8=");

    let images = get_json(&app, &format!("/api/prompts/{id}/images")).await;
    assert_eq!(images.as_array().unwrap().len(), 1);
    assert_eq!(images[0]["imageUrl"], "data:image/png;base64,aGVsbG8=");
}

#[tokio::test]
async fn test_failed_generation_still_counts_usage() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream.uri(), 10, 1).await;
    let id = create_prompt(&app).await;

    let response = post_generate(&app, &id).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let prompt = get_json(&app, &format!("/api/prompts/{id}")).await;
    assert_eq!(prompt["usageCount"], 1);
    assert!(prompt["generatedImageUrl"].is_null());

    let images = get_json(&app, &format!("/api/prompts/{id}/images")).await;
    assert_eq!(images.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_generate_unknown_prompt_skips_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(image_response("aGVsbG8="))
        .expect(0)
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream.uri(), 10, 1).await;

    let response = post_generate(&app, "no-such-id").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generation_quota() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(image_response("aGVsbG8="))
        .expect(2)
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream.uri(), 2, 1).await;
    let id = create_prompt(&app).await;

    for _ in 0..2 {
        let response = post_generate(&app, &id).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = post_generate(&app, &id).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response
        .headers()
        .get(header::RETRY_AFTER)
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1);
    let body = body_json(response).await;
    assert!(body["retryAfter"].as_u64().unwrap() >= 1);

    // The rejected request never reached the usage counter
    let prompt = get_json(&app, &format!("/api/prompts/{id}")).await;
    assert_eq!(prompt["usageCount"], 2);
}

#[tokio::test]
async fn test_transient_failures_are_retried_until_success() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(image_response("aGVsbG8="))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream.uri(), 10, 3).await;
    let id = create_prompt(&app).await;

    // Two 503s then success, all within one generation call
    let response = post_generate(&app, &id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["imageUrl"], "data:image/png;base64,aGVsbG8=");

    // One request, one usage count, regardless of internal attempts
    let prompt = get_json(&app, &format!("/api/prompts/{id}")).await;
    assert_eq!(prompt["usageCount"], 1);
}

#[tokio::test]
async fn test_auth_rejection_is_not_retried() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream.uri(), 10, 3).await;
    let id = create_prompt(&app).await;

    let response = post_generate(&app, &id).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let images = get_json(&app, &format!("/api/prompts/{id}/images")).await;
    assert_eq!(images.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_gallery_is_newest_first() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(image_response("Zmlyc3Q="))
        .up_to_n_times(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(image_response("c2Vjb25k"))
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream.uri(), 10, 1).await;
    let id = create_prompt(&app).await;

    assert_eq!(post_generate(&app, &id).await.status(), StatusCode::OK);
    assert_eq!(post_generate(&app, &id).await.status(), StatusCode::OK);

    let images = get_json(&app, &format!("/api/prompts/{id}/images")).await;
    let urls: Vec<&str> = images
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["imageUrl"].as_str().unwrap())
        .collect();
    assert_eq!(
        urls,
        vec![
            "data:image/png;base64,c2Vjb25k",
            "data:image/png;base64,Zmlyc3Q=",
        ]
    );

    let prompt = get_json(&app, &format!("/api/prompts/{id}")).await;
    assert_eq!(prompt["generatedImageUrl"], "data:image/png;base64,c2Vjb25k");
}
