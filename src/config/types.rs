// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub site: SiteConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Root directory served to clients. When unset, the directory
    /// containing the server executable is used, so the preview pages
    /// are found regardless of where the process was launched from.
    #[serde(default)]
    pub root: Option<String>,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (combined, common, or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "common".to_string()
}

/// Site configuration: index resolution and the informational page list
/// shown in the startup banner.
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    pub index_files: Vec<String>,
    /// Sub-paths listed in the startup banner. Informational only:
    /// any existing path under the root is servable, not just these.
    #[serde(default)]
    pub pages: Vec<String>,
}
