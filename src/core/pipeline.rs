use std::sync::Arc;
use crate::core::directory::ServiceAreaDirectory;
use crate::core::rules::{trim_value, FieldRule, REQUIRED_MESSAGE};
use crate::models::{FieldReport, FormData, FormField, FormReport, IssueKind, ValidationResult};

/// Field and form validation
///
/// # Per-field order
/// 1. Required check on the trimmed value
/// 2. Empty optional fields pass
/// 3. Email, phone and ZIP rules for the fields they match
///
/// The first blocking failure ends evaluation for that field. A ZIP that is
/// well-formed but outside the service area yields a warning and the field
/// stays valid.
#[derive(Debug, Clone)]
pub struct FormValidator {
    directory: Arc<ServiceAreaDirectory>,
}

impl FormValidator {
    pub fn new(directory: Arc<ServiceAreaDirectory>) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &ServiceAreaDirectory {
        &self.directory
    }

    pub fn validate_field(&self, field: &FormField) -> ValidationResult {
        let value = trim_value(&field.value);

        if value.is_empty() {
            return if field.required {
                ValidationResult::error(IssueKind::RequiredMissing, REQUIRED_MESSAGE)
            } else {
                ValidationResult::pass()
            };
        }

        let mut outcome = ValidationResult::pass();

        for rule in FieldRule::ALL
            .iter()
            .filter(|rule| rule.applies_to(&field.name, &field.field_type))
        {
            let result = rule.check(value, &self.directory);
            if result.is_blocking() {
                return result;
            }
            if result.is_warning() {
                outcome = result;
            }
        }

        outcome
    }

    /// Validate every field; no field is skipped after an earlier failure
    pub fn validate_form(&self, fields: &[FormField]) -> FormReport {
        let report = FormReport {
            fields: fields
                .iter()
                .map(|field| FieldReport {
                    name: field.name.clone(),
                    result: self.validate_field(field),
                })
                .collect(),
        };

        tracing::debug!(
            "Validated form: {} fields, {} errors, {} warnings",
            report.fields.len(),
            report.errors().count(),
            report.warnings().count()
        );

        report
    }
}

/// Payload for the transport: trimmed values keyed by field name
pub fn form_data(fields: &[FormField]) -> FormData {
    fields
        .iter()
        .map(|field| (field.name.clone(), trim_value(&field.value).to_string()))
        .collect()
}
