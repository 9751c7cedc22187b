use anyhow::{Context, Result};
use axum_server::Handle;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{error, info};

/// A server handle that starts a graceful shutdown, allowing `grace` for
/// in-flight requests, once SIGINT or SIGTERM arrives.
pub(crate) fn on_signal(grace: Duration) -> Handle<SocketAddr> {
    let handle = Handle::new();
    let trigger = handle.clone();

    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => {
                info!(signal, ?grace, "Shutdown requested, draining connections");
                trigger.graceful_shutdown(Some(grace));
            },
            Err(e) => error!("Cannot listen for shutdown signals: {e:#}"),
        }
    });

    handle
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|()| "SIGINT").context("Failed to install Ctrl+C handler"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c().await.context("Failed to install Ctrl+C handler")?;
    Ok("Ctrl+C")
}
