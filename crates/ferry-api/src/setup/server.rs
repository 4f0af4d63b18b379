//! Server startup and graceful shutdown

use crate::setup::App;
use anyhow::{Context, Result};
use ferry_core::Config;

/// Start the server with graceful shutdown
///
/// The token reclaimer runs for as long as the listener does and is stopped once the
/// server has drained.
pub async fn start_server(config: &Config, app: App) -> Result<()> {
    let addr = config.bind_addr();
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    match app.state.storage.discard_incomplete().await {
        Ok(0) => {}
        Ok(removed) => tracing::info!(removed, "Discarded incomplete uploads"),
        Err(e) => tracing::warn!(error = %e, "Failed to discard incomplete uploads"),
    }

    let reclaimer_cancel = app.reclaimer.cancel_token();
    let reclaimer = app.reclaimer.start();

    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        "Server ready and accepting connections"
    );

    let served = axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    reclaimer_cancel.cancel();
    if let Err(e) = reclaimer.await {
        tracing::error!(error = %e, "Token reclaimer task failed");
    }

    ferry_infra::shutdown_telemetry().await;

    served.context("Server error")
}

/// Resolves on Ctrl+C (SIGINT) or SIGTERM.
///
/// If a handler cannot be installed the error is logged and that signal is ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
