//! API routes for ZenBot
//!
//! Chat routes answer 200 for every outcome the resolver can produce,
//! including unreadable request bodies. Only an unmounted resolver yields 503.

use crate::server::AppState;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};
use zenbot_core::fallback::APOLOGY;
use zenbot_core::{ChatRequest, Reply};
use zenbot_interaction::FallbackResolver;

type AppStateArc = Arc<AppState>;

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/gemini", post(gemini))
        .route("/api/huggingface", post(huggingface))
        .route("/api/mock-chat", post(mock_chat))
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

fn parse_request(body: &[u8]) -> Result<ChatRequest, Reply> {
    serde_json::from_slice(body).map_err(|err| {
        warn!("Unreadable chat request: {err}");
        Reply::fallback(APOLOGY).with_error(err.to_string())
    })
}

async fn resolve_with(
    resolver: Option<&Arc<FallbackResolver>>,
    route: &str,
    body: &[u8],
) -> (StatusCode, Json<Reply>) {
    let request = match parse_request(body) {
        Ok(request) => request,
        Err(reply) => return (StatusCode::OK, Json(reply)),
    };

    let Some(resolver) = resolver else {
        error!(route, "No resolver mounted for route");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Reply::fallback(APOLOGY).with_error(format!("{route} is not configured"))),
        );
    };

    (StatusCode::OK, Json(resolver.resolve(&request.messages).await))
}

async fn chat(State(state): State<AppStateArc>, body: Bytes) -> (StatusCode, Json<Reply>) {
    resolve_with(state.chat.as_ref(), "/api/chat", &body).await
}

async fn gemini(State(state): State<AppStateArc>, body: Bytes) -> (StatusCode, Json<Reply>) {
    resolve_with(state.gemini.as_ref(), "/api/gemini", &body).await
}

async fn huggingface(State(state): State<AppStateArc>, body: Bytes) -> (StatusCode, Json<Reply>) {
    resolve_with(state.huggingface.as_ref(), "/api/huggingface", &body).await
}

async fn mock_chat(State(state): State<AppStateArc>, body: Bytes) -> Json<Reply> {
    match parse_request(&body) {
        Ok(request) => Json(state.scripted.respond(&request.messages).await),
        Err(reply) => Json(Reply::mock(reply.response)),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
