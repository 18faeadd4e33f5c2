//! Server lifecycle.

use tokio::net::TcpListener;

use crate::error::ServerError;
use crate::router::build_router;
use crate::state::AppState;
use crate::ServerConfig;

/// Bind, serve, and return once a shutdown signal has drained the server.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.listen_addr;
    let state = AppState::from_config(&config.runtime);
    let app = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!(addr = %addr, "Verdict server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Verdict server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
///
/// If a handler cannot be installed that branch never resolves and the
/// other one still works.
pub async fn shutdown_signal() {
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
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
