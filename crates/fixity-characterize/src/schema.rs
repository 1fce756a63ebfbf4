//! Shape validation of raw characterization output.
//!
//! The characterization tool is external and its output is untrusted. Before
//! anything is merged into descriptive metadata the raw JSON is validated
//! against a fixed JSON Schema using the `jsonschema` crate: a flat object
//! whose values are scalars or lists of scalars. Valid output is then
//! normalised into a `TermMap` (numbers and booleans become strings, empty
//! values are dropped).

use serde_json::{json, Value};
use tracing::warn;

use fixity_contracts::{
    error::{FixityError, FixityResult},
    metadata::{FieldValue, TermMap},
};

/// The JSON Schema every extraction result must satisfy.
pub fn extraction_schema_document() -> Value {
    json!({
        "type": "object",
        "additionalProperties": {
            "anyOf": [
                { "type": ["string", "number", "boolean"] },
                {
                    "type": "array",
                    "items": { "type": ["string", "number", "boolean"] }
                }
            ]
        }
    })
}

/// Compiled extraction schema.
pub struct ExtractionSchema {
    validator: jsonschema::Validator,
}

impl ExtractionSchema {
    pub fn new() -> FixityResult<Self> {
        let validator = jsonschema::validator_for(&extraction_schema_document()).map_err(|e| {
            FixityError::SchemaValidation { reason: format!("invalid extraction schema: {e}") }
        })?;
        Ok(Self { validator })
    }

    /// Check `raw` against the schema, reporting every violation at once.
    pub fn validate(&self, raw: &Value) -> FixityResult<()> {
        let violations: Vec<String> = self
            .validator
            .iter_errors(raw)
            .map(|error| format!("at '{}': {}", error.instance_path, error))
            .collect();

        if violations.is_empty() {
            return Ok(());
        }

        let reason = violations.join("; ");
        warn!(%reason, "characterization output failed schema validation");
        Err(FixityError::SchemaValidation { reason })
    }

    /// Validate `raw` and flatten it into terms.
    pub fn to_terms(&self, raw: &Value) -> FixityResult<TermMap> {
        self.validate(raw)?;

        let mut terms = TermMap::new();
        if let Some(object) = raw.as_object() {
            for (name, value) in object {
                if let Some(value) = field_value(value) {
                    terms.insert(name.clone(), value);
                }
            }
        }
        Ok(terms)
    }
}

fn scalar(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// `None` for empty values; they are treated as absent terms.
fn field_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Array(items) => {
            let values: Vec<String> = items.iter().filter_map(scalar).collect();
            (!values.is_empty()).then_some(FieldValue::Many(values))
        }
        other => scalar(other).map(FieldValue::One),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use fixity_contracts::{error::FixityError, metadata::FieldValue};

    use super::ExtractionSchema;

    #[test]
    fn flat_output_is_normalised() {
        let schema = ExtractionSchema::new().unwrap();
        let terms = schema
            .to_terms(&json!({
                "mime_type": "application/pdf",
                "file_size": 1024,
                "well_formed": true,
                "file_author": ["Ada", "", "Grace"],
                "file_title": "   ",
                "page_count": []
            }))
            .unwrap();

        assert_eq!(terms.get("mime_type"), Some(&FieldValue::One("application/pdf".to_string())));
        assert_eq!(terms.get("file_size"), Some(&FieldValue::One("1024".to_string())));
        assert_eq!(terms.get("well_formed"), Some(&FieldValue::One("true".to_string())));
        assert_eq!(
            terms.get("file_author"),
            Some(&FieldValue::Many(vec!["Ada".to_string(), "Grace".to_string()]))
        );
        assert!(!terms.has_field("file_title"), "blank values are absent");
        assert!(!terms.has_field("page_count"), "empty lists are absent");
    }

    #[test]
    fn nested_output_is_rejected() {
        let schema = ExtractionSchema::new().unwrap();
        match schema.to_terms(&json!({ "identity": { "mime_type": "image/png" } })) {
            Err(FixityError::SchemaValidation { reason }) => {
                assert!(reason.contains("identity"), "reason should point at the field: {reason}");
            }
            other => panic!("expected SchemaValidation, got {:?}", other),
        }
    }

    #[test]
    fn non_object_output_is_rejected() {
        let schema = ExtractionSchema::new().unwrap();
        assert!(schema.validate(&json!(["mime_type", "image/png"])).is_err());
        assert!(schema.validate(&json!(null)).is_err());
    }
}
