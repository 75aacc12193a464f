use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::FormField;

/// Request to check a ZIP code against the service area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZipCheckRequest {
    #[serde(default)]
    pub zip: String,
}

/// Request to validate a single field (blur/input events)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ValidateFieldRequest {
    #[validate(length(min = 1), custom(function = "validate_field_name"))]
    pub name: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub required: bool,
}

impl From<ValidateFieldRequest> for FormField {
    fn from(req: ValidateFieldRequest) -> Self {
        FormField {
            name: req.name,
            field_type: req.field_type,
            value: req.value,
            required: req.required,
        }
    }
}

fn default_field_type() -> String { "text".to_string() }

/// Request carrying every field of a form (validate or submit)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FormRequest {
    #[validate(length(min = 1), custom(function = "validate_field_names"))]
    pub fields: Vec<FormField>,
    /// Browser form session; submits sharing a session are single-flight
    #[validate(length(min = 1, max = 128))]
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
}

fn validate_field_name(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().is_empty() {
        return Err(validator::ValidationError::new("empty_field_name"));
    }
    Ok(())
}

fn validate_field_names(fields: &[FormField]) -> Result<(), validator::ValidationError> {
    fields.iter().try_for_each(|f| validate_field_name(&f.name))
}
