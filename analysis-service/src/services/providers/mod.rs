//! Vision provider abstraction and implementations.
//!
//! This module provides a trait-based abstraction for vision-capable AI
//! providers, allowing easy swapping between backends (Gemini, mock).

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use service_core::error::AppError;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => {
                AppError::ConfigError(anyhow::anyhow!(msg))
            }
            other => AppError::UpstreamCall(other.to_string()),
        }
    }
}

/// Result of a provider response.
pub struct ProviderResponse {
    /// The model's text reply.
    pub text: Option<String>,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

/// Inline image payload submitted alongside the prompt.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub mime_type: String,
    /// Base64-encoded bytes, as the wire format expects.
    pub data: String,
}

/// Generation parameters for AI requests.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Top-p sampling.
    pub top_p: Option<f32>,

    /// Maximum output tokens.
    pub max_tokens: Option<i32>,

    /// JSON schema for structured output.
    pub output_schema: Option<String>,
}

/// Trait for vision-capable generation providers (e.g., Gemini).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Analyze an image with the given prompt, returning the text reply.
    async fn analyze(
        &self,
        prompt: &str,
        image: &ImageData,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
