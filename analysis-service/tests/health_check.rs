//! Integration tests for analysis-service health endpoints.
//!
//! Run with: cargo test -p analysis-service --test health_check

use analysis_service::config::AnalysisConfig;
use analysis_service::services::providers::mock::MockVisionProvider;
use analysis_service::startup::Application;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Spawn the application on a random port and return the port number.
async fn spawn_app(provider_enabled: bool) -> u16 {
    std::env::set_var("ENVIRONMENT", "test");
    std::env::set_var("APP__PORT", "0"); // Random port
    std::env::set_var("GEMINI_API_KEY", "test-api-key");

    let config = AnalysisConfig::load().expect("Failed to load config");
    let provider = Arc::new(MockVisionProvider::new(provider_enabled));
    let app = Application::build_with_provider(config, provider)
        .await
        .expect("Failed to build application");

    let port = app.port();

    // Spawn the server in the background
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    port
}

#[tokio::test]
async fn health_check_returns_ok() {
    let port = spawn_app(true).await;
    let client = Client::new();

    let response = client
        .get(format!("http://localhost:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "analysis-service");
}

#[tokio::test]
async fn readiness_check_returns_ok() {
    let port = spawn_app(true).await;
    let client = Client::new();

    let response = client
        .get(format!("http://localhost:{}/ready", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn readiness_check_reports_unconfigured_provider() {
    let port = spawn_app(false).await;
    let client = Client::new();

    let response = client
        .get(format!("http://localhost:{}/ready", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
}
