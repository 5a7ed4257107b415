pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::engine::Engine;

use state::AppState;

/// Build the HTTP router. Split out from [`serve`] so tests can drive it.
pub fn router(engine: Engine) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/apy", get(handlers::apy::get_apy))
        .route("/api/backtest", get(handlers::backtest::run_backtest))
        .layer(cors)
        .with_state(AppState::new(engine))
}

pub async fn serve(host: &str, port: u16, engine: Engine) -> Result<()> {
    let app = router(engine);

    let addr = format!("{host}:{port}");
    tracing::info!("yield-engine API server listening on {addr}");
    tracing::info!("  Health:   GET  http://{addr}/health");
    tracing::info!("  APY:      GET  http://{addr}/api/apy");
    tracing::info!("  Backtest: GET  http://{addr}/api/backtest?days=90");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
