// Configuration module entry point
// Loads settings from config.toml, the environment, and built-in defaults

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, ServerConfig, SiteConfig};

impl Config {
    /// Load configuration from `config.toml` (optional) layered under
    /// `PREVIEWD__`-prefixed environment variables.
    ///
    /// Port and host are configurable here and via the environment, e.g.
    /// `PREVIEWD__SERVER__PORT=8001`. There is deliberately no CLI flag
    /// parsing.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("PREVIEWD").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default(
                "site.index_files",
                vec!["index.html".to_string(), "index.htm".to_string()],
            )?
            .set_default(
                "site.pages",
                vec![
                    "snow-cicero".to_string(),
                    "snow-clay".to_string(),
                    "snow-liverpool".to_string(),
                    "snow-commercial".to_string(),
                    "snow-giveaway".to_string(),
                ],
            )?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Resolve the directory files are served from.
    ///
    /// An explicit `server.root` wins; otherwise serving is anchored to the
    /// directory containing the executable, so launching from any working
    /// directory previews the same tree.
    pub fn resolve_root(&self) -> std::io::Result<PathBuf> {
        if let Some(ref root) = self.server.root {
            return Ok(PathBuf::from(root));
        }
        let exe = std::env::current_exe()?;
        exe.parent().map(PathBuf::from).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "executable has no parent directory",
            )
        })
    }
}
