use lazy_static::lazy_static;
use regex::Regex;
use crate::core::directory::ServiceAreaDirectory;
use crate::models::{IssueKind, ValidationResult};

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number.";
pub const ZIP_FORMAT_MESSAGE: &str = "Please enter a valid 5-digit ZIP code.";
pub const ZIP_OUTSIDE_AREA_WARNING: &str = "This ZIP code may be outside our service area";

/// Minimum digit count for a phone number
pub const MIN_PHONE_DIGITS: usize = 10;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_CHARS: Regex = Regex::new(r"^[0-9\s()\-]+$").unwrap();
    static ref ZIP: Regex = Regex::new(r"^[0-9]{5}$").unwrap();
}

/// Strip surrounding whitespace and byte-order marks from a field value
#[inline]
pub fn trim_value(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Minimal `local@domain.tld` shape
#[inline]
pub fn is_email_format(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Digits, whitespace, hyphens and parentheses only, with at least ten digits
#[inline]
pub fn is_phone_format(value: &str) -> bool {
    PHONE_CHARS.is_match(value)
        && value.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
}

/// Exactly five ASCII digits
#[inline]
pub fn is_zip_format(value: &str) -> bool {
    ZIP.is_match(value)
}

/// Format rules applied after the required check, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Email,
    Phone,
    Zip,
}

impl FieldRule {
    pub const ALL: [FieldRule; 3] = [FieldRule::Email, FieldRule::Phone, FieldRule::Zip];

    /// Whether this rule applies to a field with the given name and input type
    pub fn applies_to(&self, name: &str, field_type: &str) -> bool {
        match self {
            FieldRule::Email => field_type == "email" || name == "email",
            FieldRule::Phone => field_type == "tel" || name == "phone",
            FieldRule::Zip => name == "zip",
        }
    }

    /// Check a trimmed, non-empty value
    pub fn check(&self, value: &str, directory: &ServiceAreaDirectory) -> ValidationResult {
        match self {
            FieldRule::Email => {
                if is_email_format(value) {
                    ValidationResult::pass()
                } else {
                    ValidationResult::error(IssueKind::BadFormat, EMAIL_MESSAGE)
                }
            }
            FieldRule::Phone => {
                if is_phone_format(value) {
                    ValidationResult::pass()
                } else {
                    ValidationResult::error(IssueKind::BadFormat, PHONE_MESSAGE)
                }
            }
            FieldRule::Zip => {
                if !is_zip_format(value) {
                    ValidationResult::error(IssueKind::BadFormat, ZIP_FORMAT_MESSAGE)
                } else if !directory.is_serviceable(value) {
                    ValidationResult::warning(IssueKind::OutOfServiceArea, ZIP_OUTSIDE_AREA_WARNING)
                } else {
                    ValidationResult::pass()
                }
            }
        }
    }
}
