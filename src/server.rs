//! HTTP server initialization and runtime setup.
//!
//! Wires services around the registered backends, serves the router, and
//! drains detached publish jobs on shutdown.

use crate::application::Backends;
use crate::config::Options;
use crate::infrastructure::metrics::MetricsRecorder;
use crate::infrastructure::render::TemplateRenderer;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs the HTTP server with the given options and backends.
///
/// Initializes:
/// - Template renderer and publish metrics recorder
/// - Archive, publish, and submission services
/// - Axum HTTP server with graceful shutdown
///
/// On `SIGINT`/`SIGTERM` the server stops accepting connections, cancels
/// in-flight dispatches, then waits up to `shutdown_grace_seconds` for
/// publish jobs before cancelling them.
///
/// # Errors
///
/// Returns an error if:
/// - The listen address is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(options: Options, backends: Backends) -> Result<()> {
    for slot in options.enabled_slots() {
        if !backends.has_broker(slot) {
            tracing::warn!(slot = %slot, "Slot enabled without a broker, requests will report it unavailable");
        }
    }
    for kind in options.enabled_channels() {
        if !backends.has_publisher(kind) {
            tracing::warn!(channel = kind.as_str(), "Channel enabled without a publisher, publishes will fail");
        }
    }

    let options = Arc::new(options);
    let shutdown = CancellationToken::new();
    let state = AppState::new(
        Arc::clone(&options),
        backends,
        Arc::new(TemplateRenderer::new()),
        Arc::new(MetricsRecorder::new()),
        shutdown.clone(),
    );
    let publish_service = Arc::clone(&state.publish_service);

    let app = app_router(state, options.behind_proxy);

    let addr: SocketAddr = options.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let signal_token = shutdown.clone();
    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        signal_token.cancel();
    })
    .await?;

    let grace = Duration::from_secs(options.shutdown_grace_seconds);
    if publish_service.drain(grace).await {
        tracing::info!("Publish jobs drained");
    } else {
        tracing::warn!("Publish jobs cancelled after grace period");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {e}");
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
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
