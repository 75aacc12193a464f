// Core exports
pub mod directory;
pub mod pipeline;
pub mod rules;
pub mod zip_check;

pub use directory::{ServiceAreaDirectory, DirectoryError};
pub use pipeline::{FormValidator, form_data};
pub use rules::{FieldRule, trim_value, is_email_format, is_phone_format, is_zip_format};
pub use zip_check::{ZipChecker, ZipCheckOutcome, sanitize_input, should_check_on_blur};
