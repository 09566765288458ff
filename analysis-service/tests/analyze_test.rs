//! Integration tests for the analysis endpoint, driven through the router
//! with a scripted mock provider.

use analysis_service::config::AnalysisConfig;
use analysis_service::services::providers::mock::MockVisionProvider;
use analysis_service::startup::{build_router, AppState};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

const PLANT_REPLY: &str = r#"Sure! {"plant_name":"Rose","scientific_name":"Rosa","description":"d","care_instructions":"water it"}"#;

fn test_config() -> AnalysisConfig {
    std::env::set_var("ENVIRONMENT", "test");
    std::env::set_var("APP__PORT", "0");
    std::env::set_var("GEMINI_API_KEY", "test-api-key");

    AnalysisConfig::load().expect("Failed to load config")
}

fn test_app(reply: &str) -> (axum::Router, Arc<MockVisionProvider>) {
    let mock = Arc::new(MockVisionProvider::with_reply(true, reply));
    let state = AppState {
        config: test_config(),
        provider: mock.clone(),
    };
    (build_router(state), mock)
}

/// 100+ characters of valid unpadded base64.
fn valid_image() -> String {
    "QUJD".repeat(40)
}

fn post_analyze(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::from(body))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body was not JSON")
}

#[tokio::test]
async fn short_image_returns_400_without_upstream_call() {
    let (app, mock) = test_app(PLANT_REPLY);

    let body = serde_json::to_vec(&json!({"image": "tiny", "mode": "plant"})).unwrap();
    let response = app.oneshot(post_analyze(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Invalid image data");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn non_string_image_returns_400_without_upstream_call() {
    let (app, mock) = test_app(PLANT_REPLY);

    let body = serde_json::to_vec(&json!({"image": 12345, "mode": "plant"})).unwrap();
    let response = app.oneshot(post_analyze(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json.get("error").is_some());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn non_base64_image_returns_400_without_upstream_call() {
    let (app, mock) = test_app(PLANT_REPLY);

    let body = serde_json::to_vec(&json!({"image": "!".repeat(120)})).unwrap();
    let response = app.oneshot(post_analyze(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Invalid image data");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn malformed_json_body_returns_400() {
    let (app, mock) = test_app(PLANT_REPLY);

    let response = app
        .oneshot(post_analyze(b"this is not json".to_vec()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json.get("error").is_some());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn plant_round_trip_injects_confidence() {
    let (app, mock) = test_app(PLANT_REPLY);

    let body = serde_json::to_vec(&json!({"image": valid_image(), "mode": "plant"})).unwrap();
    let response = app.oneshot(post_analyze(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );

    let json = response_json(response).await;
    assert_eq!(json["plant_name"], "Rose");
    assert_eq!(json["scientific_name"], "Rosa");
    assert_eq!(json["description"], "d");
    assert_eq!(json["care_instructions"], "water it");

    let confidence = json["confidence"].as_f64().expect("confidence missing");
    assert!((0.8..1.0).contains(&confidence));

    assert_eq!(mock.call_count(), 1);
    let prompt = mock.last_prompt().unwrap();
    assert!(prompt.contains("plant_name"));
    assert!(!prompt.contains("is_healthy"));
}

#[tokio::test]
async fn unknown_mode_analyzes_for_disease() {
    let reply = r#"{"is_healthy":false,"disease_name":"Rust","description":"d","treatments":["prune"]}"#;
    let (app, mock) = test_app(reply);

    let body = serde_json::to_vec(&json!({"image": valid_image(), "mode": "banana"})).unwrap();
    let response = app.oneshot(post_analyze(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["is_healthy"], json!(false));
    assert_eq!(json["treatments"], json!(["prune"]));

    let prompt = mock.last_prompt().unwrap();
    assert!(prompt.contains("is_healthy"));
    assert!(!prompt.contains("plant_name"));
}

#[tokio::test]
async fn model_supplied_confidence_is_preserved() {
    let reply = r#"{"plant_name":"Rose","scientific_name":"Rosa","description":"d","care_instructions":"water it","confidence":0.91}"#;
    let (app, _mock) = test_app(reply);

    let body = serde_json::to_vec(&json!({"image": valid_image(), "mode": "plant"})).unwrap();
    let response = app.oneshot(post_analyze(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["confidence"], json!(0.91));
}

#[tokio::test]
async fn reply_without_json_returns_500() {
    let (app, _mock) = test_app("I cannot analyze this image.");

    let body = serde_json::to_vec(&json!({"image": valid_image()})).unwrap();
    let response = app.oneshot(post_analyze(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Upstream response format error");
}

#[tokio::test]
async fn reply_with_multiple_objects_returns_500() {
    let (app, _mock) = test_app(r#"{"a":1} or maybe {"b":2}"#);

    let body = serde_json::to_vec(&json!({"image": valid_image()})).unwrap();
    let response = app.oneshot(post_analyze(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Upstream response format error");
}

#[tokio::test]
async fn identical_requests_differ_only_in_confidence() {
    let (app, _mock) = test_app(PLANT_REPLY);

    let body = serde_json::to_vec(&json!({"image": valid_image(), "mode": "plant"})).unwrap();

    let first = app
        .clone()
        .oneshot(post_analyze(body.clone()))
        .await
        .unwrap();
    let second = app.oneshot(post_analyze(body)).await.unwrap();

    let mut first = response_json(first).await;
    let mut second = response_json(second).await;
    first.as_object_mut().unwrap().remove("confidence");
    second.as_object_mut().unwrap().remove("confidence");

    assert_eq!(first, second);
}

#[tokio::test]
async fn options_preflight_returns_cors_headers_without_upstream_call() {
    let (app, mock) = test_app(PLANT_REPLY);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/analyze")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_success());

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
    let allow_headers = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allow_headers.contains("content-type"));

    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn disabled_provider_surfaces_configuration_error() {
    let mock = Arc::new(MockVisionProvider::new(false));
    let state = AppState {
        config: test_config(),
        provider: mock.clone(),
    };
    let app = build_router(state);

    let body = serde_json::to_vec(&json!({"image": valid_image()})).unwrap();
    let response = app.oneshot(post_analyze(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Configuration error");
}
