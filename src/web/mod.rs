// Web module - single-page analysis UI and JSON endpoint
//
// One form posts a passage back to the server, which renders the same page
// with the result sections underneath. /api/analyze exposes the same flow
// as JSON for scripts.

mod error;
mod handlers;
mod page;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

use crate::analysis::Analyzer;

/// Shared state for the web server
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
}

/// Build the router. Request bodies over `max_body_bytes` get 413.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze_form))
        .route("/api/analyze", post(handlers::analyze_json))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Start the web server and serve until `shutdown_rx` fires
pub async fn start_server(
    bind_addr: SocketAddr,
    state: AppState,
    max_body_bytes: usize,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> Result<()> {
    let app = router(state, max_body_bytes);

    tracing::info!("Starting web server on {}", bind_addr);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    tracing::info!("Web server listening on http://{}", bind_addr);

    // In-flight requests finish before the server returns
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.await.ok();
        })
        .await
        .context("Server error")?;

    tracing::info!("Web server shut down gracefully");
    Ok(())
}
