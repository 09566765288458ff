use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use once_cell::sync::OnceCell;
use serde::Serialize;
use thiserror::Error;

/// Whether 500-class responses include error detail. Set once at startup;
/// hidden until then so a misconfigured process cannot leak internals.
static EXPOSE_ERROR_DETAIL: OnceCell<bool> = OnceCell::new();

pub fn expose_error_detail(enabled: bool) {
    let _ = EXPOSE_ERROR_DETAIL.set(enabled);
}

fn detail_exposed() -> bool {
    EXPOSE_ERROR_DETAIL.get().copied().unwrap_or(false)
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Upstream call failure: {0}")]
    UpstreamCall(String),

    #[error("Upstream response format error: {0}")]
    UpstreamFormat(String),

    #[error("Upstream response parse error: {0}")]
    JsonParse(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            message: Option<String>,
        }

        let (status, error_message, message) = match self {
            AppError::ValidationError(err) => (
                StatusCode::BAD_REQUEST,
                "Invalid request data".to_string(),
                Some(err.to_string()),
            ),
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            AppError::InvalidImage(msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid image data".to_string(),
                Some(msg),
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                detail_exposed().then(|| err.to_string()),
            ),
            AppError::UpstreamCall(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upstream call failure".to_string(),
                detail_exposed().then_some(msg),
            ),
            AppError::UpstreamFormat(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upstream response format error".to_string(),
                detail_exposed().then_some(msg),
            ),
            AppError::JsonParse(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upstream response parse error".to_string(),
                detail_exposed().then_some(msg),
            ),
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                detail_exposed().then(|| format!("{:#}", err)),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                message,
            }),
        )
            .into_response()
    }
}
