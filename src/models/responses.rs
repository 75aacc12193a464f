use serde::{Deserialize, Serialize};
use crate::models::domain::{FormReport, ServiceArea, SubmissionReceipt, ValidationResult};

/// Response for the ZIP checker endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZipCheckResponse {
    pub zip: String,
    pub status: String,
    pub success: bool,
    pub area: Option<String>,
    pub message: String,
}

/// Response for single-field validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValidationResponse {
    pub name: String,
    pub result: ValidationResult,
}

/// Response for whole-form validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormValidationResponse {
    pub submittable: bool,
    pub report: FormReport,
}

/// Response for a submit attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<SubmissionReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<FormReport>,
}

/// Listing of the configured service areas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAreasResponse {
    pub areas: Vec<ServiceArea>,
    pub distinct_zips: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
