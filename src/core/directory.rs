use std::collections::{HashMap, HashSet};
use thiserror::Error;
use crate::config::ServiceAreaConfig;
use crate::models::ServiceArea;

/// Errors that can occur when building a directory from configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Duplicate service area key: {0}")]
    DuplicateAreaKey(String),

    #[error("Malformed ZIP code {zip:?} in service area {area}")]
    MalformedZip { area: String, zip: String },
}

/// Read-only ZIP code directory for the configured service areas
///
/// Built once from a [`ServiceAreaConfig`] and never mutated. When a ZIP
/// belongs to several areas, lookups return the first area in declaration
/// order (first-match-wins).
#[derive(Debug, Clone)]
pub struct ServiceAreaDirectory {
    areas: Vec<ServiceArea>,
    all_valid_zips: HashSet<String>,
    // ZIP -> index into `areas` of the first area listing it
    owners: HashMap<String, usize>,
}

impl ServiceAreaDirectory {
    pub fn new(config: ServiceAreaConfig) -> Result<Self, DirectoryError> {
        let mut keys = HashSet::new();
        let mut all_valid_zips = HashSet::new();
        let mut owners = HashMap::new();

        for (index, area) in config.areas.iter().enumerate() {
            if !keys.insert(area.key.as_str()) {
                return Err(DirectoryError::DuplicateAreaKey(area.key.clone()));
            }

            for zip in &area.zips {
                if !super::rules::is_zip_format(zip) {
                    return Err(DirectoryError::MalformedZip {
                        area: area.key.clone(),
                        zip: zip.clone(),
                    });
                }

                all_valid_zips.insert(zip.clone());
                owners.entry(zip.clone()).or_insert(index);
            }
        }

        let directory = Self {
            areas: config.areas,
            all_valid_zips,
            owners,
        };

        for (zip, areas) in directory.overlapping_zips() {
            tracing::warn!(
                "ZIP {} is listed under multiple service areas {:?}; lookups resolve to {}",
                zip,
                areas,
                areas[0]
            );
        }

        tracing::debug!(
            "Service area directory loaded: {} areas, {} distinct ZIPs",
            directory.areas.len(),
            directory.all_valid_zips.len()
        );

        Ok(directory)
    }

    /// Directory over the production Central Oregon table
    pub fn central_oregon() -> Self {
        Self::new(ServiceAreaConfig::default())
            .expect("built-in service area table is well-formed")
    }

    /// True iff `zip` belongs to any configured area.
    ///
    /// Callers are expected to have checked the 5-digit format already;
    /// anything else is simply not found.
    pub fn is_serviceable(&self, zip: &str) -> bool {
        self.all_valid_zips.contains(zip)
    }

    /// Display name of the first area, in declaration order, that lists `zip`
    pub fn area_name_for(&self, zip: &str) -> Option<&str> {
        self.owners
            .get(zip)
            .map(|&index| self.areas[index].name.as_str())
    }

    pub fn area_for(&self, zip: &str) -> Option<&ServiceArea> {
        self.owners.get(zip).map(|&index| &self.areas[index])
    }

    pub fn all_valid_zips(&self) -> &HashSet<String> {
        &self.all_valid_zips
    }

    pub fn areas(&self) -> &[ServiceArea] {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// ZIPs claimed by more than one area, with the claiming area keys in
    /// declaration order. Sorted by ZIP.
    pub fn overlapping_zips(&self) -> Vec<(String, Vec<String>)> {
        let mut overlaps: Vec<(String, Vec<String>)> = self
            .all_valid_zips
            .iter()
            .filter_map(|zip| {
                let claimants: Vec<String> = self
                    .areas
                    .iter()
                    .filter(|area| area.contains(zip))
                    .map(|area| area.key.clone())
                    .collect();

                if claimants.len() > 1 {
                    Some((zip.clone(), claimants))
                } else {
                    None
                }
            })
            .collect();

        overlaps.sort_by(|a, b| a.0.cmp(&b.0));
        overlaps
    }
}

impl Default for ServiceAreaDirectory {
    fn default() -> Self {
        Self::central_oregon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_config() -> ServiceAreaConfig {
        ServiceAreaConfig {
            areas: vec![
                ServiceArea::new("north", "North", &["10001", "10002"]),
                ServiceArea::new("south", "South", &["20001", "10002"]),
            ],
        }
    }

    #[test]
    fn test_every_configured_zip_is_serviceable() {
        let directory = ServiceAreaDirectory::central_oregon();

        for area in directory.areas() {
            for zip in &area.zips {
                assert!(directory.is_serviceable(zip), "{} should be serviceable", zip);
            }
        }
        assert_eq!(directory.all_valid_zips().len(), 11);
    }

    #[test]
    fn test_unknown_and_malformed_not_serviceable() {
        let directory = ServiceAreaDirectory::central_oregon();

        assert!(!directory.is_serviceable("99999"));
        assert!(!directory.is_serviceable("9770"));
        assert!(!directory.is_serviceable("977011"));
        assert!(!directory.is_serviceable("9770a"));
        assert!(!directory.is_serviceable(""));
        assert!(!directory.is_serviceable(" 97701"));
    }

    #[test]
    fn test_first_match_wins_for_duplicate_zip() {
        let directory = ServiceAreaDirectory::central_oregon();

        assert_eq!(directory.area_name_for("97707"), Some("Bend"));
        assert_eq!(
            directory.overlapping_zips(),
            vec![("97707".to_string(), vec!["bend".to_string(), "sunriver".to_string()])]
        );
    }

    #[test]
    fn test_area_name_lookup() {
        let directory = ServiceAreaDirectory::central_oregon();

        assert_eq!(directory.area_name_for("97739"), Some("La Pine"));
        assert_eq!(directory.area_name_for("97741"), Some("Madras"));
        assert_eq!(directory.area_name_for("12345"), None);
        assert_eq!(directory.area_for("97756").map(|a| a.key.as_str()), Some("redmond"));
    }

    #[test]
    fn test_synthetic_table() {
        let directory = ServiceAreaDirectory::new(synthetic_config()).unwrap();

        assert_eq!(directory.len(), 2);
        assert!(directory.is_serviceable("20001"));
        assert!(!directory.is_serviceable("97701"));
        assert_eq!(directory.area_name_for("10002"), Some("North"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let config = ServiceAreaConfig {
            areas: vec![
                ServiceArea::new("north", "North", &["10001"]),
                ServiceArea::new("north", "North Again", &["10003"]),
            ],
        };

        assert_eq!(
            ServiceAreaDirectory::new(config).unwrap_err(),
            DirectoryError::DuplicateAreaKey("north".to_string())
        );
    }

    #[test]
    fn test_malformed_configured_zip_rejected() {
        let config = ServiceAreaConfig {
            areas: vec![ServiceArea::new("north", "North", &["1000"])],
        };

        assert!(matches!(
            ServiceAreaDirectory::new(config),
            Err(DirectoryError::MalformedZip { .. })
        ));
    }

    #[test]
    fn test_empty_table() {
        let directory = ServiceAreaDirectory::new(ServiceAreaConfig { areas: vec![] }).unwrap();

        assert!(directory.is_empty());
        assert!(!directory.is_serviceable("97701"));
    }
}
