//! Dashboard Server
//!
//! Serves the rendered page over HTTP, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - The dashboard page
//! - `GET /fragments` - All slot contents keyed by element id
//! - `GET /fragments/:slot` - One slot's content
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Uptime, mode and per-routine status

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::ServerState;

use axum::{routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;

/// Build the router with all routes and middleware
pub fn build_router(state: ServerState) -> Router {
    let page_routes = Router::new()
        .route("/", get(routes::page::dashboard))
        .route("/fragments", get(routes::page::fragments))
        .route("/fragments/:slot", get(routes::page::fragment));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    Router::new()
        .merge(page_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve until Ctrl+C or SIGTERM
pub async fn serve(state: ServerState, config: &ServerConfig) -> Result<(), ServerError> {
    serve_with_shutdown(state, config, shutdown_signal()).await
}

/// Serve until `shutdown` completes
pub async fn serve_with_shutdown(
    state: ServerState,
    config: &ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Dashboard server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
