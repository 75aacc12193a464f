use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use crate::models::ServiceArea;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub service_areas: ServiceAreaConfig,
    #[serde(default)]
    pub submission: SubmissionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

/// The service-area table, in declaration order.
///
/// Order matters: ZIP lookups resolve to the first area listing the ZIP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAreaConfig {
    pub areas: Vec<ServiceArea>,
}

impl Default for ServiceAreaConfig {
    fn default() -> Self {
        Self {
            areas: default_service_areas(),
        }
    }
}

impl ServiceAreaConfig {
    /// Parse a standalone area table, e.g.
    ///
    /// ```toml
    /// [[areas]]
    /// key = "bend"
    /// name = "Bend"
    /// zips = ["97701", "97702"]
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

/// Central Oregon service areas.
///
/// 97707 is listed under both Bend and Sunriver; Bend wins lookups.
pub fn default_service_areas() -> Vec<ServiceArea> {
    vec![
        ServiceArea::new("bend", "Bend", &["97701", "97702", "97703", "97707", "97708", "97709"]),
        ServiceArea::new("redmond", "Redmond", &["97756"]),
        ServiceArea::new("sisters", "Sisters", &["97759"]),
        ServiceArea::new("sunriver", "Sunriver", &["97707"]),
        ServiceArea::new("lapine", "La Pine", &["97739"]),
        ServiceArea::new("prineville", "Prineville", &["97754"]),
        ServiceArea::new("madras", "Madras", &["97741"]),
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    #[serde(default = "default_success_display_secs")]
    pub success_display_secs: u64,
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            simulated_delay_ms: default_simulated_delay_ms(),
            failure_rate: default_failure_rate(),
            success_display_secs: default_success_display_secs(),
            session_idle_secs: default_session_idle_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl SubmissionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    pub fn success_display(&self) -> Duration {
        Duration::from_secs(self.success_display_secs)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

fn default_timeout_secs() -> u64 { 10 }
fn default_simulated_delay_ms() -> u64 { 1500 }
fn default_failure_rate() -> f64 { 0.1 }
fn default_success_display_secs() -> u64 { 10 }
fn default_session_idle_secs() -> u64 { 900 }
fn default_max_sessions() -> u64 { 10_000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with VOLCANIC__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., VOLCANIC__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("VOLCANIC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("VOLCANIC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
