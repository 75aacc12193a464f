use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{trim_value, FormValidator, ServiceAreaDirectory, ZipChecker};
use crate::models::{
    ErrorResponse, FieldValidationResponse, FormField, FormRequest, FormValidationResponse,
    HealthResponse, ServiceAreasResponse, SubmitResponse, ValidateFieldRequest, ZipCheckRequest,
    ZipCheckResponse,
};
use crate::services::{SubmitOutcome, SubmitterRegistry};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<ServiceAreaDirectory>,
    pub validator: FormValidator,
    pub zip_checker: ZipChecker,
    pub sessions: Arc<SubmitterRegistry>,
}

impl AppState {
    pub fn new(directory: Arc<ServiceAreaDirectory>, sessions: Arc<SubmitterRegistry>) -> Self {
        Self {
            validator: FormValidator::new(directory.clone()),
            zip_checker: ZipChecker::new(directory.clone()),
            directory,
            sessions,
        }
    }
}

/// Configure all form-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/service-areas", web::get().to(service_areas))
        .route("/zip/check", web::post().to(check_zip))
        .route("/forms/validate-field", web::post().to(validate_field))
        .route("/forms/validate", web::post().to(validate_form))
        .route("/contact", web::post().to(submit_contact));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// GET /api/v1/service-areas
async fn service_areas(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ServiceAreasResponse {
        areas: state.directory.areas().to_vec(),
        distinct_zips: state.directory.all_valid_zips().len(),
    })
}

/// ZIP checker widget
///
/// POST /api/v1/zip/check
///
/// Request body:
/// ```json
/// { "zip": "97701" }
/// ```
async fn check_zip(
    state: web::Data<AppState>,
    req: web::Json<ZipCheckRequest>,
) -> impl Responder {
    let outcome = state.zip_checker.check(&req.zip);

    tracing::debug!("ZIP check for {:?}: {}", req.zip, outcome.status());

    HttpResponse::Ok().json(ZipCheckResponse {
        zip: trim_value(&req.zip).to_string(),
        status: outcome.status().to_string(),
        success: outcome.is_success(),
        area: outcome.area().map(str::to_string),
        message: outcome.message(),
    })
}

/// Single-field validation for blur events
///
/// POST /api/v1/forms/validate-field
async fn validate_field(
    state: web::Data<AppState>,
    req: web::Json<ValidateFieldRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Invalid validate-field request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let field: FormField = req.into_inner().into();
    let result = state.validator.validate_field(&field);

    HttpResponse::Ok().json(FieldValidationResponse {
        name: field.name,
        result,
    })
}

/// Whole-form validation without submitting
///
/// POST /api/v1/forms/validate
async fn validate_form(
    state: web::Data<AppState>,
    req: web::Json<FormRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Invalid validate request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let report = state.validator.validate_form(&req.fields);

    HttpResponse::Ok().json(FormValidationResponse {
        submittable: report.is_submittable(),
        report,
    })
}

/// Contact form submission
///
/// POST /api/v1/contact
///
/// Request body:
/// ```json
/// {
///   "sessionId": "string",
///   "fields": [{ "name": "email", "type": "email", "value": "a@b.co", "required": true }]
/// }
/// ```
///
/// 409 while the session already has a submission in flight, 422 when a
/// field blocks submission, 502 when the transport fails.
async fn submit_contact(
    state: web::Data<AppState>,
    req: web::Json<FormRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Invalid contact request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    match state.sessions.submit(req.session_id.as_deref(), &req.fields).await {
        SubmitOutcome::Succeeded { receipt, report, message } => HttpResponse::Ok().json(SubmitResponse {
            success: true,
            message: message.to_string(),
            receipt: Some(receipt),
            report: Some(report),
        }),
        SubmitOutcome::Blocked(report) => HttpResponse::UnprocessableEntity().json(SubmitResponse {
            success: false,
            message: "Please correct the highlighted fields.".to_string(),
            receipt: None,
            report: Some(report),
        }),
        SubmitOutcome::InFlight => HttpResponse::Conflict().json(ErrorResponse {
            error: "submission_in_flight".to_string(),
            message: "A submission for this form is already in progress".to_string(),
            status_code: 409,
        }),
        SubmitOutcome::Failed { message, .. } => HttpResponse::BadGateway().json(SubmitResponse {
            success: false,
            message: message.to_string(),
            receipt: None,
            report: None,
        }),
    }
}
