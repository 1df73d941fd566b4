//! HTTP/HTTPS server startup and graceful shutdown.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use common::{Config, TlsConfig};
use tokio::signal;

/// How long in-flight requests get to finish after a shutdown signal.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Server startup error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to load TLS configuration: {0}")]
    TlsConfig(String),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Starts the server on the configured port, with TLS when enabled.
///
/// Returns once the server has shut down.
pub async fn start_server(app: Router, config: &Config) -> Result<(), ServerError> {
    let addr = config.http_addr();
    let handle = Handle::new();

    if config.tls.enabled {
        start_tls_server(app, addr, &config.tls, handle).await
    } else {
        start_plain_server(app, addr, handle).await
    }
}

async fn start_plain_server(
    app: Router,
    addr: SocketAddr,
    handle: Handle,
) -> Result<(), ServerError> {
    tracing::info!(%addr, "starting HTTP server");
    tokio::spawn(shutdown_on_signal(handle.clone()));

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

async fn start_tls_server(
    app: Router,
    addr: SocketAddr,
    tls: &TlsConfig,
    handle: Handle,
) -> Result<(), ServerError> {
    let (cert, key) = tls_paths(tls)?;
    tracing::info!(%addr, %cert, %key, "starting HTTPS server");

    let rustls_config = RustlsConfig::from_pem_file(cert, key)
        .await
        .map_err(|e| ServerError::TlsConfig(format!("failed to load certificates: {e}")))?;

    tokio::spawn(shutdown_on_signal(handle.clone()));

    axum_server::bind_rustls(addr, rustls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

fn tls_paths(tls: &TlsConfig) -> Result<(&str, &str), ServerError> {
    let cert = tls
        .cert_file
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ServerError::TlsConfig("tls.cert_file is not set".to_string()))?;
    let key = tls
        .key_file
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ServerError::TlsConfig("tls.key_file is not set".to_string()))?;
    Ok((cert, key))
}

/// Waits for SIGINT or SIGTERM, then starts a graceful shutdown.
async fn shutdown_on_signal(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }

    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
