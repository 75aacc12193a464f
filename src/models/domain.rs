use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named region the business services, identified by its ZIP codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceArea {
    pub key: String,
    pub name: String,
    pub zips: Vec<String>,
}

impl ServiceArea {
    pub fn new(key: &str, name: &str, zips: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            zips: zips.iter().map(|z| z.to_string()).collect(),
        }
    }

    pub fn contains(&self, zip: &str) -> bool {
        self.zips.iter().any(|z| z == zip)
    }
}

/// How severe a validation issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Prevents the form from being submitted
    BlockingError,
    /// Shown to the user, never prevents submission
    NonBlockingWarning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    RequiredMissing,
    BadFormat,
    OutOfServiceArea,
}

/// Outcome of validating a single field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<IssueKind>,
}

impl ValidationResult {
    pub fn pass() -> Self {
        Self {
            valid: true,
            reason: None,
            severity: None,
            kind: None,
        }
    }

    pub fn error(kind: IssueKind, reason: &str) -> Self {
        Self {
            valid: false,
            reason: Some(reason.to_string()),
            severity: Some(Severity::BlockingError),
            kind: Some(kind),
        }
    }

    pub fn warning(kind: IssueKind, reason: &str) -> Self {
        Self {
            valid: true,
            reason: Some(reason.to_string()),
            severity: Some(Severity::NonBlockingWarning),
            kind: Some(kind),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Some(Severity::BlockingError)
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Some(Severity::NonBlockingWarning)
    }
}

/// A single form control as seen by the validation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub required: bool,
}

impl FormField {
    pub fn new(name: &str, field_type: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            value: value.to_string(),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

fn default_field_type() -> String { "text".to_string() }

/// Per-field results for a whole form, in field order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormReport {
    pub fields: Vec<FieldReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReport {
    pub name: String,
    pub result: ValidationResult,
}

impl FormReport {
    /// True when no field produced a blocking error
    pub fn is_submittable(&self) -> bool {
        !self.fields.iter().any(|f| f.result.is_blocking())
    }

    pub fn errors(&self) -> impl Iterator<Item = &FieldReport> {
        self.fields.iter().filter(|f| f.result.is_blocking())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &FieldReport> {
        self.fields.iter().filter(|f| f.result.is_warning())
    }

    pub fn get(&self, name: &str) -> Option<&ValidationResult> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.result)
    }
}

/// Field name to value mapping handed to the submission transport
pub type FormData = BTreeMap<String, String>;

/// Acknowledgement returned by a transport for an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub submission_id: String,
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl SubmissionReceipt {
    pub fn new() -> Self {
        Self {
            submission_id: uuid::Uuid::new_v4().to_string(),
            received_at: chrono::Utc::now(),
        }
    }
}

impl Default for SubmissionReceipt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_submittable_ignores_warnings() {
        let report = FormReport {
            fields: vec![
                FieldReport {
                    name: "zip".to_string(),
                    result: ValidationResult::warning(IssueKind::OutOfServiceArea, "outside"),
                },
                FieldReport {
                    name: "name".to_string(),
                    result: ValidationResult::pass(),
                },
            ],
        };

        assert!(report.is_submittable());
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.errors().count(), 0);
    }

    #[test]
    fn test_form_field_deserialize_defaults() {
        let field: FormField = serde_json::from_str(r#"{"name": "message"}"#).unwrap();
        assert_eq!(field.field_type, "text");
        assert_eq!(field.value, "");
        assert!(!field.required);
    }
}
