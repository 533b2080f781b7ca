//! Logger module
//!
//! Provides logging utilities for the preview server including:
//! - Startup banner and shutdown messages
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    if writer::is_initialized() {
        writer::get().write_info(message);
    } else {
        println!("{message}");
    }
}

/// Write to error log
fn write_error(message: &str) {
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    if writer::is_initialized() {
        writer::get().write_access(message);
    } else {
        println!("{message}");
    }
}

/// Startup banner: serving root, server URL, and the configured page list.
/// The page list is informational only; any existing path under the root
/// is servable.
pub fn log_server_start(addr: &SocketAddr, root: &std::path::Path, config: &Config) {
    write_info("============================================================");
    write_info("Landing pages - local development server");
    write_info("============================================================");
    write_info(&format!("Serving from: {}", root.display()));
    write_info(&format!(
        "Server running at: http://localhost:{}",
        addr.port()
    ));
    if !config.site.pages.is_empty() {
        write_info("");
        write_info("Available pages:");
        for page in &config.site.pages {
            write_info(&format!("  - http://localhost:{}/{page}/", addr.port()));
        }
    }
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("");
    write_info("Press Ctrl+C to stop the server");
    write_info("============================================================\n");
}

/// Clean-shutdown message for an operator interrupt
pub fn log_server_stopped() {
    write_info("\nServer stopped. Happy coding!");
}

/// Remediation hints for a bind failure on an already-held port
pub fn log_port_in_use(port: u16) {
    write_error(&format!("Port {port} is already in use!"));
    write_error("Try:");
    write_error(&format!("  - Kill existing server: lsof -ti:{port} | xargs kill"));
    write_error(&format!(
        "  - Use a different port: PREVIEWD__SERVER__PORT={} previewd",
        port.saturating_add(1)
    ));
}

pub fn log_startup_error(message: &str) {
    write_error(&format!("Error starting server: {message}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_accept_error(err: &std::io::Error) {
    write_error(&format!("[ERROR] Failed to accept connection: {err}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
