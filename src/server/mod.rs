//! HTTP service exposing the analyzer
//!
//! Provides four endpoints:
//! - `POST /analyze` - analyze the page named by the `url` form field
//! - `GET /metrics` - Prometheus-compatible metrics
//! - `GET /health` - liveness check
//! - `GET /` - a minimal form for manual use
//!
//! Handlers receive the analyzer and metrics through axum state; there are
//! no process-wide singletons.

mod handlers;
mod metrics;
mod middleware;

pub use handlers::{analysis_error_response, AnalyzeForm, ErrorResponse};
pub use metrics::{Metrics, MetricsSnapshot};

use crate::config::ServerConfig;
use crate::Analyzer;
use axum::routing::{get, post};
use axum::Router;
use handlers::{analyze_handler, health_handler, index_handler, metrics_handler};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            metrics: Arc::new(Metrics::new()),
        }
    }
}

/// Builds the router with all routes and the logging middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}

/// Serves on an already bound listener until `shutdown` resolves
///
/// In-flight requests are allowed to finish after `shutdown` resolves.
/// When a client disconnects, its handler future is dropped together with
/// any fetch or probe still in flight.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<(), anyhow::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

/// Binds the configured address and serves until Ctrl-C or SIGTERM
///
/// After the signal, in-flight requests get `shutdown_timeout_secs` to
/// finish before the server is dropped.
pub async fn run_server(config: &ServerConfig, state: AppState) -> Result<(), anyhow::Error> {
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to {}: {}", addr, e))?;

    tracing::info!("Starting server on {}", addr);

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(serve_with_shutdown(listener, state, async move {
        let _ = stop_rx.await;
    }));

    tokio::select! {
        result = &mut server => {
            return result.map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
        }
        _ = shutdown_signal() => {}
    }

    tracing::info!("Shutting down server");
    let _ = stop_tx.send(());

    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => {
            joined.map_err(|e| anyhow::anyhow!("Server task failed: {}", e))??;
            tracing::info!("Server exited");
        }
        Err(_) => {
            tracing::error!(
                "Server forced to shutdown after {}s with requests still in flight",
                grace.as_secs()
            );
        }
    }

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
