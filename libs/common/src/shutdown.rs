//! Graceful shutdown signal
//!
//! Resolves on Ctrl+C everywhere and additionally on SIGTERM on Unix. Meant to
//! be handed to `axum::serve(..).with_graceful_shutdown(..)`.

use tracing::{info, warn};

/// Wait for a shutdown signal and return its name
pub async fn wait_for_shutdown() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(sig) => Some(sig),
            Err(e) => {
                warn!("SIGTERM handler unavailable ({}), only Ctrl+C will stop the service", e);
                None
            },
        };

        let name = tokio::select! {
            _ = tokio::signal::ctrl_c() => "SIGINT",
            _ = async {
                match term.as_mut() {
                    Some(sig) => { sig.recv().await; },
                    None => std::future::pending::<()>().await,
                }
            } => "SIGTERM",
        };
        info!("Received {}, shutting down", name);
        name
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl+C handler failed: {}", e);
        }
        info!("Received Ctrl+C, shutting down");
        "CTRL_C"
    }
}
