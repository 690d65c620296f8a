//! HTTP server for ZenBot

use crate::routes;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use zenbot_interaction::{FallbackResolver, ScriptedResponder};

/// Application state shared across handlers.
///
/// A resolver is `None` only when its provider client could not be built;
/// the matching route then answers 503.
pub struct AppState {
    pub chat: Option<Arc<FallbackResolver>>,
    pub gemini: Option<Arc<FallbackResolver>>,
    pub huggingface: Option<Arc<FallbackResolver>>,
    pub scripted: ScriptedResponder,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::chat_routes())
        .merge(routes::health_routes())
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run(state: AppState, bind: &str) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            warn!("Cannot listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
    }
}
