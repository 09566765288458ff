use serde::Deserialize;
use service_core::config as core_config;
use service_core::config::{get_env, Environment};
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub cors: CorsConfig,
    pub analysis: AnalysisOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Vision-capable model for image analysis (e.g., gemini-2.0-flash)
    pub vision_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisOptions {
    /// When set, a synthesized confidence replaces any model-supplied value.
    /// Off by default: the prompt asks the model for confidence, so a value
    /// it returns is preserved and synthesis only fills gaps.
    pub overwrite_confidence: bool,
    /// MIME type assumed when neither the request field nor a data-URL
    /// prefix declares one.
    pub default_mime_type: String,
}

impl AnalysisConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let environment = Environment::from_env();
        let is_prod = environment.is_prod();

        Ok(AnalysisConfig {
            common: common_config,
            environment,
            google: GoogleConfig {
                // Required in every environment: a missing credential is a
                // startup failure, never a per-request one.
                api_key: get_env("GEMINI_API_KEY", None, is_prod)?,
            },
            models: ModelConfig {
                vision_model: get_env("GEMINI_VISION_MODEL", Some("gemini-2.0-flash"), is_prod)?,
            },
            cors: CorsConfig {
                allowed_origins: get_env("CORS_ALLOWED_ORIGINS", Some("*"), is_prod)?
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect(),
            },
            analysis: AnalysisOptions {
                overwrite_confidence: env::var("ANALYSIS_OVERWRITE_CONFIDENCE")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
                default_mime_type: get_env(
                    "ANALYSIS_DEFAULT_MIME_TYPE",
                    Some("image/jpeg"),
                    is_prod,
                )?,
            },
        })
    }
}
