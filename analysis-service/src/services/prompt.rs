//! Prompt templates and response schemas for the two analysis modes.

use crate::dtos::AnalysisMode;

const PLANT_PROMPT: &str = "Identify this plant. Provide: common name, scientific name, \
    description, care instructions, and your confidence between 0.80 and 0.99. \
    Format as a single JSON object with exactly the keys: plant_name, scientific_name, \
    description, care_instructions, confidence.";

const DISEASE_PROMPT: &str = "Detect plant diseases in this photo. Provide: is_healthy \
    (boolean), disease_name, description, treatments (array of strings), and your \
    confidence between 0.80 and 0.99. Format as a single JSON object with exactly the \
    keys: is_healthy, disease_name, description, treatments, confidence.";

const PLANT_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "plant_name": {"type": "string"},
        "scientific_name": {"type": "string"},
        "description": {"type": "string"},
        "care_instructions": {"type": "string"},
        "confidence": {"type": "number"}
    },
    "required": ["plant_name", "scientific_name", "description", "care_instructions"]
}"#;

const DISEASE_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "is_healthy": {"type": "boolean"},
        "disease_name": {"type": "string"},
        "description": {"type": "string"},
        "treatments": {"type": "array", "items": {"type": "string"}},
        "confidence": {"type": "number"}
    },
    "required": ["is_healthy", "disease_name", "description", "treatments"]
}"#;

pub fn prompt_for(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Plant => PLANT_PROMPT,
        AnalysisMode::Disease => DISEASE_PROMPT,
    }
}

/// JSON schema handed to the provider's structured-output mode.
pub fn schema_for(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Plant => PLANT_SCHEMA,
        AnalysisMode::Disease => DISEASE_SCHEMA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLANT_KEYS: &[&str] = &[
        "plant_name",
        "scientific_name",
        "description",
        "care_instructions",
    ];
    const DISEASE_KEYS: &[&str] = &["is_healthy", "disease_name", "description", "treatments"];

    #[test]
    fn plant_prompt_requests_plant_keys_only() {
        let prompt = prompt_for(AnalysisMode::Plant);
        for key in PLANT_KEYS {
            assert!(prompt.contains(key), "missing key {}", key);
        }
        assert!(!prompt.contains("is_healthy"));
        assert!(!prompt.contains("treatments"));
    }

    #[test]
    fn disease_prompt_requests_disease_keys_only() {
        let prompt = prompt_for(AnalysisMode::Disease);
        for key in DISEASE_KEYS {
            assert!(prompt.contains(key), "missing key {}", key);
        }
        assert!(!prompt.contains("plant_name"));
        assert!(!prompt.contains("care_instructions"));
    }

    #[test]
    fn schemas_are_valid_json() {
        for mode in [AnalysisMode::Plant, AnalysisMode::Disease] {
            let schema: serde_json::Value =
                serde_json::from_str(schema_for(mode)).expect("schema must parse");
            assert_eq!(schema["type"], "object");
        }
    }
}
