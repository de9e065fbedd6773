//! JSON Schema validation for engine configuration.
//!
//! Config documents are checked against schema/engine-config.schema.json
//! before deserialization, so a misspelled field is reported instead of
//! silently falling back to its default.

use lazy_static::lazy_static;

const CONFIG_SCHEMA_JSON: &str = include_str!("../../../../schema/engine-config.schema.json");

lazy_static! {
    static ref CONFIG_VALIDATOR: Result<jsonschema::Validator, String> = compile_schema();
}

fn compile_schema() -> Result<jsonschema::Validator, String> {
    let schema: serde_json::Value = serde_json::from_str(CONFIG_SCHEMA_JSON)
        .map_err(|e| format!("Invalid config schema JSON: {}", e))?;
    jsonschema::options()
        .build(&schema)
        .map_err(|e| format!("Failed to compile config schema: {}", e))
}

/// Check a config document, returning one message per violation with its
/// instance path.
pub fn validate_config_schema(config_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = CONFIG_VALIDATOR.as_ref().map_err(|e| vec![e.clone()])?;

    let errors: Vec<String> = validator
        .iter_errors(config_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_schema_compiles() {
        assert!(compile_schema().is_ok());
    }

    #[test]
    fn test_empty_object_passes() {
        assert!(validate_config_schema(&serde_json::json!({})).is_ok());
    }

    #[test]
    fn test_full_config_passes() {
        let value = serde_json::json!({
            "artifacts": {
                "dir": "model",
                "vectorizer": "vectorizer.json",
                "classifier": "internship_model.json",
                "enabled": true
            },
            "calibration": {
                "flag_penalty": 0.25,
                "penalty_cap": 4,
                "genuine_threshold": 0.7,
                "fake_threshold": 0.4
            }
        });
        assert!(validate_config_schema(&value).is_ok());
    }

    #[test]
    fn test_wrong_types_fail() {
        let value = serde_json::json!({
            "artifacts": { "enabled": "yes" },
            "calibration": { "penalty_cap": 2.5 }
        });
        let errors = validate_config_schema(&value).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_zero_penalty_fails() {
        let value = serde_json::json!({ "calibration": { "flag_penalty": 0 } });
        assert!(validate_config_schema(&value).is_err());
    }

    #[test]
    fn test_additional_properties_fail() {
        let value = serde_json::json!({ "model": {} });
        assert!(validate_config_schema(&value).is_err());
    }
}
