//! Avto Quiz · Driving Test Backend
//!
//! - Axum HTTP + WebSocket API
//! - Static SPA fallback (STATIC_DIR/index.html)
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   QUIZ_CONFIG_PATH  : path to TOML config (quiz settings, assistant, profile, question bank)
//!   STATIC_DIR        : SPA directory (default "./static")
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use avto_quiz::routes::build_router;
use avto_quiz::state::AppState;
use avto_quiz::store::QuestionStore;
use avto_quiz::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared application state (catalog, session registry, assistant, profile).
  let state = Arc::new(AppState::new());
  info!(
    target: "avto_quiz",
    categories = state.catalog.list_categories().len(),
    questions = state.catalog.question_count(),
    question_limit = state.question_limit,
    "Question catalog ready"
  );

  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "avto_quiz", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "avto_quiz", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "avto_quiz", "Shutdown signal received");
}
