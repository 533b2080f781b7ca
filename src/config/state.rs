// Application runtime state
// Immutable after startup; shared across connection tasks via Arc

use crate::config::Config;
use std::path::PathBuf;

/// Per-process state handed to every request handler.
///
/// The root is resolved once at startup and read-only afterwards, so no
/// locking is needed across requests.
pub struct AppState {
    pub config: Config,
    pub root: PathBuf,
}

impl AppState {
    pub const fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }
}
