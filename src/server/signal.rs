// Signal handling module
//
// SIGINT (Ctrl+C) and SIGTERM both mean "operator stopped the server":
// clean shutdown message, exit code 0. Nothing else is handled; there is
// no reload or hot-restart path.

/// Resolve when an operator interrupt arrives.
#[cfg(unix)]
pub async fn shutdown() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            crate::logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            // Ctrl+C still works on its own
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown() {
    let _ = tokio::signal::ctrl_c().await;
}
