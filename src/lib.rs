//! Volcanic Site - service-area lookup and contact-form validation
//!
//! The core is pure: a read-only [`ServiceAreaDirectory`] of ZIP codes and a
//! [`FormValidator`] that classifies field values as passing, blocked, or
//! passing with an advisory warning. Submission goes through an injectable
//! [`SubmissionTransport`] behind a single-flight [`FormSubmitter`].

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{ServiceAreaDirectory, DirectoryError, FormValidator, FieldRule, ZipChecker, ZipCheckOutcome};
pub use models::{ServiceArea, FormField, FormReport, ValidationResult, Severity, IssueKind, FormData, SubmissionReceipt};
pub use services::{FormSubmitter, SubmissionState, SubmitOutcome, SubmissionTransport, SimulatedTransport, TransportError};
