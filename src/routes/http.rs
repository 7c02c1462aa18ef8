//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, http::StatusCode, Json, response::IntoResponse};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::Result;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_list_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let categories = logic::list_categories(&state).await;
  Json(CategoriesOut { categories })
}

#[instrument(level = "info", skip(state))]
pub async fn http_category_questions(
  State(state): State<Arc<AppState>>,
  Path(category_id): Path<u32>,
  Query(q): Query<QuestionsQuery>,
) -> Result<Json<QuestionsOut>> {
  let questions = logic::questions_for_category(&state, category_id, q.limit).await?;
  info!(target: "quiz", category_id, returned = questions.len(), "HTTP questions served");
  Ok(Json(QuestionsOut { questions }))
}

#[instrument(level = "info", skip(state, body), fields(category_id = body.category_id))]
pub async fn http_start_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartSessionIn>,
) -> Result<(StatusCode, Json<SessionOut>)> {
  let session = logic::start_quiz(&state, body.category_id).await?;
  Ok((StatusCode::CREATED, Json(session)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SessionOut>> {
  Ok(Json(logic::get_quiz(&state, id).await?))
}

#[instrument(level = "info", skip(state, body), fields(option_index = body.option_index))]
pub async fn http_select_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<SessionOut>> {
  Ok(Json(logic::select_answer(&state, id, body.option_index).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_next_question(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SessionOut>> {
  Ok(Json(logic::next_question(&state, id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_restart_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SessionOut>> {
  Ok(Json(logic::restart_quiz(&state, id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_end_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode> {
  logic::end_quiz(&state, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip(state))]
pub async fn http_assistant_greeting(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(AssistantOut { text: state.assistant.greeting().to_string() })
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len()))]
pub async fn http_assistant_message(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AssistantIn>,
) -> Result<Json<AssistantOut>> {
  let text = logic::assistant_reply(&state, &body.text).await?;
  Ok(Json(AssistantOut { text }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_profile(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.profile.clone())
}
