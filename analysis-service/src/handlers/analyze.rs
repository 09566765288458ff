use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use base64::Engine;
use rand::Rng;
use validator::Validate;

use crate::dtos::AnalyzeRequest;
use crate::services::prompt;
use crate::services::{extract_json_object, GenerationParams, ImageData};
use crate::startup::AppState;
use service_core::error::AppError;

#[tracing::instrument(skip(state, body))]
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(request) =
        body.map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid JSON body: {}", e)))?;

    request.validate().map_err(|_| {
        AppError::InvalidImage("Please provide a valid base64-encoded image".to_string())
    })?;

    let (declared_mime, payload) = request.image_payload();

    // The length check is a crude proxy for "looks like an image"; decoding
    // catches payloads that are long but not base64 at all.
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| AppError::InvalidImage("Image payload is not valid base64".to_string()))?;

    let mode = request.mode();
    let image = ImageData {
        mime_type: request
            .mime_type
            .clone()
            .or_else(|| declared_mime.map(str::to_string))
            .unwrap_or_else(|| state.config.analysis.default_mime_type.clone()),
        data: payload.to_string(),
    };

    let params = GenerationParams {
        output_schema: Some(prompt::schema_for(mode).to_string()),
        ..GenerationParams::default()
    };

    let response = state
        .provider
        .analyze(prompt::prompt_for(mode), &image, &params)
        .await?;

    let reply = response.text.ok_or_else(|| {
        AppError::UpstreamFormat("model reply contained no text".to_string())
    })?;

    let mut result = extract_json_object(&reply)?;
    ensure_confidence(&mut result, state.config.analysis.overwrite_confidence);

    tracing::info!(
        mode = ?mode,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "Analysis completed"
    );

    Ok(Json(result))
}

/// Fill in `confidence` in [0.80, 1.00) when the model omitted it, or
/// unconditionally when the overwrite toggle is set.
fn ensure_confidence(result: &mut serde_json::Value, overwrite: bool) {
    if let Some(object) = result.as_object_mut() {
        if overwrite || !object.contains_key("confidence") {
            let confidence: f64 = rand::thread_rng().gen_range(0.8..1.0);
            object.insert("confidence".to_string(), serde_json::json!(confidence));
        }
    }
}
