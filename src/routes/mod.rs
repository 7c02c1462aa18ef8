//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from the configured static dir with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let index = format!("{}/index.html", state.static_dir.trim_end_matches('/'));
    let static_service = ServeDir::new(&state.static_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(index));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/categories", get(http::http_list_categories))
        .route("/api/v1/categories/:id/questions", get(http::http_category_questions))
        .route("/api/v1/sessions", post(http::http_start_session))
        .route(
            "/api/v1/sessions/:id",
            get(http::http_get_session).delete(http::http_end_session),
        )
        .route("/api/v1/sessions/:id/answer", post(http::http_select_answer))
        .route("/api/v1/sessions/:id/next", post(http::http_next_question))
        .route("/api/v1/sessions/:id/restart", post(http::http_restart_session))
        .route("/api/v1/assistant/greeting", get(http::http_assistant_greeting))
        .route("/api/v1/assistant/message", post(http::http_assistant_message))
        .route("/api/v1/profile", get(http::http_profile))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
