//! HTTP server startup and wiring.

pub mod routes;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use crate::core::RateTable;
pub use routes::AppState;

/// Builds the router around an already constructed rate table.
pub fn build_app(rates: RateTable) -> Router {
    let state = AppState {
        rates: Arc::new(rates),
    };

    routes::rest_routes(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request<_>| {
                tracing::info_span!("request", method = %req.method(), uri = %req.uri())
            })
            .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
    )
}

/// Serves `app` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr: SocketAddr = listener.local_addr()?;
    info!(address = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

/// Binds `bind_address` and serves `app` on it.
pub async fn bind_and_serve(bind_address: &str, app: Router) -> Result<()> {
    let listener = TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    serve(listener, app).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
