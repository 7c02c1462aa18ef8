//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.
//!
//! A connection owns at most one quiz session; it is dropped when the client
//! ends the quiz, starts another one, or disconnects.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::{QuizError, Result};
use crate::protocol::{session_out, ClientWsMessage, ServerWsMessage};
use crate::logic;
use crate::session::QuizSession;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "avto_quiz", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "avto_quiz", "WebSocket connected");
  let mut session: Option<QuizSession> = None;

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "avto_quiz", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut session)
              .await
              .unwrap_or_else(|e| ServerWsMessage::Error { kind: e.kind().into(), message: e.to_string() })
          }
          Err(e) => ServerWsMessage::Error { kind: "invalid_json".into(), message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "kind": "serialization", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "avto_quiz", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "avto_quiz", had_session = session.is_some(), "WebSocket disconnected");
}

fn active(session: &mut Option<QuizSession>) -> Result<&mut QuizSession> {
  session.as_mut().ok_or(QuizError::Precondition("no quiz in progress on this connection"))
}

#[instrument(level = "info", skip(state, session))]
async fn handle_client_ws(
  msg: ClientWsMessage,
  state: &AppState,
  session: &mut Option<QuizSession>,
) -> Result<ServerWsMessage> {
  let reply = match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::ListCategories => {
      ServerWsMessage::Categories { categories: logic::list_categories(state).await }
    }

    ClientWsMessage::StartQuiz { category_id } => {
      // A failed start leaves any previous quiz untouched.
      let started = state.new_session(category_id)?;
      let snapshot = started.snapshot();
      *session = Some(started);
      info!(target: "quiz", category_id, total = snapshot.total_questions, "WS quiz started");
      ServerWsMessage::Session { session: session_out(None, &snapshot) }
    }

    ClientWsMessage::SelectAnswer { option_index } => {
      let snapshot = active(session)?.select_answer(option_index)?;
      ServerWsMessage::Session { session: session_out(None, &snapshot) }
    }

    ClientWsMessage::NextQuestion => {
      let snapshot = active(session)?.advance()?;
      if let Some(r) = &snapshot.result {
        info!(target: "quiz", percentage = r.percentage(), passed = r.passed(), "WS quiz finished");
      }
      ServerWsMessage::Session { session: session_out(None, &snapshot) }
    }

    ClientWsMessage::RestartQuiz => {
      let snapshot = active(session)?.restart();
      ServerWsMessage::Session { session: session_out(None, &snapshot) }
    }

    ClientWsMessage::EndQuiz => {
      *session = None;
      ServerWsMessage::QuizEnded
    }

    ClientWsMessage::AssistantMessage { text } => {
      let text = logic::assistant_reply(state, &text).await?;
      ServerWsMessage::AssistantReply { text }
    }
  };
  Ok(reply)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::clock::SystemClock;
  use crate::store::Catalog;

  fn state() -> AppState {
    AppState::with_catalog(Catalog::builtin(), Some(7), Arc::new(SystemClock))
  }

  async fn send(state: &AppState, session: &mut Option<QuizSession>, raw: &str) -> serde_json::Value {
    let msg: ClientWsMessage = serde_json::from_str(raw).unwrap();
    let reply = handle_client_ws(msg, state, session)
      .await
      .unwrap_or_else(|e| ServerWsMessage::Error { kind: e.kind().into(), message: e.to_string() });
    serde_json::to_value(&reply).unwrap()
  }

  #[tokio::test]
  async fn quiz_commands_need_a_started_quiz() {
    let state = state();
    let mut session = None;
    let reply = send(&state, &mut session, r#"{"type":"next_question"}"#).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["kind"], "precondition");
  }

  #[tokio::test]
  async fn connection_owns_its_quiz() {
    let state = state();
    let mut session = None;

    let reply = send(&state, &mut session, r#"{"type":"start_quiz","categoryId":5}"#).await;
    assert_eq!(reply["type"], "session");
    assert_eq!(reply["session"]["totalQuestions"], 5);
    assert!(reply["session"].get("id").is_none());
    assert!(state.sessions.read().await.is_empty());

    let reply = send(&state, &mut session, r#"{"type":"select_answer","optionIndex":1}"#).await;
    assert_eq!(reply["session"]["phase"], "revealed");
    let reply = send(&state, &mut session, r#"{"type":"next_question"}"#).await;
    assert_eq!(reply["session"]["questionNumber"], 2);

    let reply = send(&state, &mut session, r#"{"type":"restart_quiz"}"#).await;
    assert_eq!(reply["session"]["questionNumber"], 1);

    let reply = send(&state, &mut session, r#"{"type":"end_quiz"}"#).await;
    assert_eq!(reply["type"], "quiz_ended");
    assert!(session.is_none());
  }

  #[tokio::test]
  async fn failed_start_keeps_previous_quiz() {
    let state = state();
    let mut session = None;
    send(&state, &mut session, r#"{"type":"start_quiz","categoryId":1}"#).await;
    let reply = send(&state, &mut session, r#"{"type":"start_quiz","categoryId":42}"#).await;
    assert_eq!(reply["kind"], "no_questions");
    assert_eq!(session.as_ref().map(|s| s.category_id()), Some(1));
  }

  #[tokio::test]
  async fn ping_categories_and_assistant() {
    let state = state();
    let mut session = None;
    assert_eq!(send(&state, &mut session, r#"{"type":"ping"}"#).await["type"], "pong");
    let reply = send(&state, &mut session, r#"{"type":"list_categories"}"#).await;
    assert_eq!(reply["categories"].as_array().unwrap().len(), 6);
    let reply = send(&state, &mut session, r#"{"type":"assistant_message","text":"Heavy RAIN tonight"}"#).await;
    assert_eq!(reply["type"], "assistant_reply");
    assert!(reply["text"].as_str().unwrap().starts_with("In bad weather"));
  }
}
