//! Application startup and lifecycle management.
//!
//! Wires the vision provider once at startup, binds the listener, and
//! assembles the router with its CORS and trace layers.

use crate::config::AnalysisConfig;
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiVisionProvider};
use crate::services::providers::VisionProvider;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AnalysisConfig,
    pub provider: Arc<dyn VisionProvider>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration, wiring the
    /// Gemini provider once for the process lifetime.
    pub async fn build(config: AnalysisConfig) -> Result<Self, AppError> {
        let gemini_config = GeminiConfig {
            api_key: config.google.api_key.clone(),
            model: config.models.vision_model.clone(),
        };
        let provider: Arc<dyn VisionProvider> = Arc::new(GeminiVisionProvider::new(gemini_config));

        tracing::info!(
            model = %config.models.vision_model,
            "Initialized Gemini vision provider"
        );

        Self::build_with_provider(config, provider).await
    }

    /// Build with an externally supplied provider. Tests use this to inject
    /// a mock.
    pub async fn build_with_provider(
        config: AnalysisConfig,
        provider: Arc<dyn VisionProvider>,
    ) -> Result<Self, AppError> {
        let state = AppState { config, provider };

        // Bind HTTP listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Analysis service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router).await
    }
}

/// Assemble the router: the analysis endpoint under a catch-all /api path,
/// health endpoints alongside, CORS and trace layers on top.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .route("/api/*path", post(handlers::analyze))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    // AllowOrigin::list panics on "*"; the wildcard must go through any()
    let origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed_origins.iter().map(|o| {
            o.parse::<HeaderValue>().unwrap_or_else(|e| {
                tracing::error!("Invalid CORS origin '{}': {}. Using fallback.", o, e);
                HeaderValue::from_static("null")
            })
        }))
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
