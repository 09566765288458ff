use serde::Deserialize;
use validator::Validate;

/// Analysis request body. `mode` selects the prompt template; anything other
/// than "plant" (including absence) analyzes for disease.
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(
        min = 100,
        message = "Please provide a valid base64-encoded image"
    ))]
    pub image: String,
    pub mode: Option<String>,
    /// Declared MIME type of the image. Falls back to a data-URL prefix,
    /// then to the configured default.
    pub mime_type: Option<String>,
}

impl AnalyzeRequest {
    pub fn mode(&self) -> AnalysisMode {
        AnalysisMode::from(self.mode.as_deref())
    }

    /// Split an optional `data:<mime>;base64,` prefix off the payload.
    /// Returns the MIME type the prefix declares (if any) and the raw
    /// base64 body.
    pub fn image_payload(&self) -> (Option<&str>, &str) {
        if let Some(rest) = self.image.strip_prefix("data:") {
            if let Some((mime, body)) = rest.split_once(";base64,") {
                return (Some(mime).filter(|m| !m.is_empty()), body);
            }
        }
        (None, self.image.as_str())
    }
}

/// Analysis mode selected by the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Plant,
    Disease,
}

impl From<Option<&str>> for AnalysisMode {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some("plant") => AnalysisMode::Plant,
            // Absent or unrecognized modes analyze for disease
            _ => AnalysisMode::Disease,
        }
    }
}
