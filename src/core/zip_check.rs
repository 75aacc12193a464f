use std::sync::Arc;
use crate::core::directory::ServiceAreaDirectory;
use crate::core::rules::{is_zip_format, trim_value, ZIP_FORMAT_MESSAGE};

pub const EMPTY_ZIP_MESSAGE: &str = "Please enter a ZIP code.";
pub const OUTSIDE_AREA_MESSAGE: &str =
    "Sorry, this ZIP code is outside our current service area. Please call us to discuss options.";

/// Result of the "do you service my area?" check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZipCheckOutcome {
    Empty,
    Malformed,
    Serviceable { area: String },
    OutsideArea,
}

impl ZipCheckOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ZipCheckOutcome::Serviceable { .. })
    }

    pub fn status(&self) -> &'static str {
        match self {
            ZipCheckOutcome::Empty => "empty",
            ZipCheckOutcome::Malformed => "malformed",
            ZipCheckOutcome::Serviceable { .. } => "serviceable",
            ZipCheckOutcome::OutsideArea => "outside_area",
        }
    }

    pub fn area(&self) -> Option<&str> {
        match self {
            ZipCheckOutcome::Serviceable { area } => Some(area.as_str()),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ZipCheckOutcome::Empty => EMPTY_ZIP_MESSAGE.to_string(),
            ZipCheckOutcome::Malformed => ZIP_FORMAT_MESSAGE.to_string(),
            ZipCheckOutcome::Serviceable { area } => {
                format!("Great news! We service {}. Schedule your appointment today!", area)
            }
            ZipCheckOutcome::OutsideArea => OUTSIDE_AREA_MESSAGE.to_string(),
        }
    }
}

/// Service-area checker behind the standalone ZIP widget
#[derive(Debug, Clone)]
pub struct ZipChecker {
    directory: Arc<ServiceAreaDirectory>,
}

impl ZipChecker {
    pub fn new(directory: Arc<ServiceAreaDirectory>) -> Self {
        Self { directory }
    }

    pub fn check(&self, raw: &str) -> ZipCheckOutcome {
        let zip = trim_value(raw);

        if zip.is_empty() {
            return ZipCheckOutcome::Empty;
        }
        if !is_zip_format(zip) {
            return ZipCheckOutcome::Malformed;
        }

        match self.directory.area_name_for(zip) {
            Some(area) => ZipCheckOutcome::Serviceable { area: area.to_string() },
            None => ZipCheckOutcome::OutsideArea,
        }
    }
}

/// Keystroke filter: digits only, at most five
pub fn sanitize_input(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).take(5).collect()
}

/// A blur only triggers a check once a full ZIP has been typed
pub fn should_check_on_blur(value: &str) -> bool {
    value.chars().count() == 5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> ZipChecker {
        ZipChecker::new(Arc::new(ServiceAreaDirectory::central_oregon()))
    }

    #[test]
    fn test_check_outcomes() {
        let checker = checker();

        assert_eq!(checker.check("   "), ZipCheckOutcome::Empty);
        assert_eq!(checker.check("\u{FEFF}"), ZipCheckOutcome::Empty);
        assert_eq!(checker.check("97-01"), ZipCheckOutcome::Malformed);
        assert_eq!(checker.check("99999"), ZipCheckOutcome::OutsideArea);
        assert_eq!(
            checker.check(" 97759 "),
            ZipCheckOutcome::Serviceable { area: "Sisters".to_string() }
        );
    }

    #[test]
    fn test_duplicate_zip_reports_first_area() {
        let outcome = checker().check("97707");
        assert_eq!(outcome.area(), Some("Bend"));
        assert_eq!(
            outcome.message(),
            "Great news! We service Bend. Schedule your appointment today!"
        );
    }

    #[test]
    fn test_only_serviceable_is_success() {
        assert!(ZipCheckOutcome::Serviceable { area: "Bend".to_string() }.is_success());
        assert!(!ZipCheckOutcome::OutsideArea.is_success());
        assert!(!ZipCheckOutcome::Empty.is_success());
        assert_eq!(ZipCheckOutcome::Malformed.message(), ZIP_FORMAT_MESSAGE);
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("97a70-1"), "97701");
        assert_eq!(sanitize_input("9770123"), "97701");
        assert_eq!(sanitize_input("abc"), "");
    }

    #[test]
    fn test_should_check_on_blur() {
        assert!(should_check_on_blur("97701"));
        assert!(!should_check_on_blur("9770"));
        assert!(!should_check_on_blur(""));
    }
}
