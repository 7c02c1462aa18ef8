//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Category listing and question retrieval
//!   - Registered quiz sessions (start, select, advance, restart, end)
//!   - Assistant replies

use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Category, Question};
use crate::error::Result;
use crate::protocol::{session_out, SessionOut};
use crate::state::AppState;
use crate::store::QuestionStore;

#[instrument(level = "debug", skip(state))]
pub async fn list_categories(state: &AppState) -> Vec<Category> {
  state.catalog.list_categories()
}

#[instrument(level = "info", skip(state))]
pub async fn questions_for_category(state: &AppState, category_id: u32, limit: Option<usize>) -> Result<Vec<Question>> {
  let limit = limit.unwrap_or(state.question_limit);
  let mut rng = state.retrieval_rng();
  state.catalog.questions_for_category(category_id, limit, &mut rng)
}

#[instrument(level = "info", skip(state))]
pub async fn start_quiz(state: &AppState, category_id: u32) -> Result<SessionOut> {
  let (id, snapshot) = state.start_session(category_id).await?;
  Ok(session_out(Some(id), &snapshot))
}

#[instrument(level = "debug", skip(state))]
pub async fn get_quiz(state: &AppState, id: Uuid) -> Result<SessionOut> {
  let snapshot = state.session_snapshot(id).await?;
  Ok(session_out(Some(id), &snapshot))
}

#[instrument(level = "info", skip(state))]
pub async fn select_answer(state: &AppState, id: Uuid, option_index: usize) -> Result<SessionOut> {
  let snapshot = state.with_session(id, |s| s.select_answer(option_index)).await?;
  Ok(session_out(Some(id), &snapshot))
}

#[instrument(level = "info", skip(state))]
pub async fn next_question(state: &AppState, id: Uuid) -> Result<SessionOut> {
  let snapshot = state.with_session(id, |s| s.advance()).await?;
  if let Some(r) = &snapshot.result {
    info!(target: "quiz", %id, percentage = r.percentage(), passed = r.passed(), "HTTP quiz finished");
  }
  Ok(session_out(Some(id), &snapshot))
}

#[instrument(level = "info", skip(state))]
pub async fn restart_quiz(state: &AppState, id: Uuid) -> Result<SessionOut> {
  let snapshot = state.with_session(id, |s| Ok(s.restart())).await?;
  Ok(session_out(Some(id), &snapshot))
}

#[instrument(level = "info", skip(state))]
pub async fn end_quiz(state: &AppState, id: Uuid) -> Result<()> {
  state.end_session(id).await
}

#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub async fn assistant_reply(state: &AppState, text: &str) -> Result<String> {
  state.assistant.reply(text)
}
