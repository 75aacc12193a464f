// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ServiceArea, Severity, IssueKind, ValidationResult, FormField, FormReport, FieldReport, FormData, SubmissionReceipt};
pub use requests::{ZipCheckRequest, ValidateFieldRequest, FormRequest};
pub use responses::{ZipCheckResponse, FieldValidationResponse, FormValidationResponse, SubmitResponse, ServiceAreasResponse, HealthResponse, ErrorResponse};
