//! Ctrl+C as a future both loops can race against.

/// resolves on the first interrupt
///
/// if the handler can't be installed the process keeps running and can only
/// be stopped from outside.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "[SHUTDOWN] failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::debug!("[SHUTDOWN] interrupt received");
}
