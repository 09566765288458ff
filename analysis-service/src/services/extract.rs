//! JSON extraction from free-form model replies.
//!
//! Even with structured output requested, replies can wrap the JSON payload
//! in prose or code fences. The scanner walks the reply once, tracking
//! string and escape state, and carves the first complete top-level object.
//! A second complete object is ambiguous and rejected.

use service_core::error::AppError;

/// Extract the single JSON object embedded in `text`.
pub fn extract_json_object(text: &str) -> Result<serde_json::Value, AppError> {
    let span = find_object_span(text)?;
    serde_json::from_str(span)
        .map_err(|e| AppError::JsonParse(format!("extracted span is not valid JSON: {}", e)))
}

fn find_object_span(text: &str) -> Result<&str, AppError> {
    let bytes = text.as_bytes();
    let mut found: Option<(usize, usize)> = None;
    let mut start = 0;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if depth == 0 {
            if b == b'{' {
                depth = 1;
                start = i;
                in_string = false;
                escaped = false;
            }
            continue;
        }

        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    if found.is_some() {
                        return Err(AppError::UpstreamFormat(
                            "reply contains more than one JSON object".to_string(),
                        ));
                    }
                    found = Some((start, i + 1));
                }
            }
            _ => {}
        }
    }

    match found {
        Some((s, e)) => Ok(&text[s..e]),
        None => Err(AppError::UpstreamFormat(
            "reply does not contain a JSON object".to_string(),
        )),
    }
}
