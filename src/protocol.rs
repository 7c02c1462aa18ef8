//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, Question};
use crate::session::{SessionPhase, SessionSnapshot};
use crate::summary::ResultSummary;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    ListCategories,
    StartQuiz {
        #[serde(rename = "categoryId")]
        category_id: u32,
    },
    SelectAnswer {
        #[serde(rename = "optionIndex")]
        option_index: usize,
    },
    NextQuestion,
    RestartQuiz,
    EndQuiz,
    AssistantMessage {
        text: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Categories {
        categories: Vec<Category>,
    },
    Session {
        session: SessionOut,
    },
    QuizEnded,
    AssistantReply {
        text: String,
    },
    Error {
        kind: String,
        message: String,
    },
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhaseOut {
    Unanswered,
    Revealed,
    Completed,
}

impl From<SessionPhase> for PhaseOut {
    fn from(p: SessionPhase) -> Self {
        match p {
            SessionPhase::Unanswered => PhaseOut::Unanswered,
            SessionPhase::Revealed => PhaseOut::Revealed,
            SessionPhase::Completed => PhaseOut::Completed,
        }
    }
}

/// Question as shown during a quiz. `correctAnswerIndex` and `explanation`
/// are only filled once the answer is revealed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOut {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultOut {
    pub category_id: u32,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub time_spent_ms: u64,
    pub completed_at: DateTime<Utc>,
    pub percentage: u32,
    pub passed: bool,
}

/// DTO used by both WS and HTTP for session state delivery.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOut {
    /// Registry id; absent for WebSocket-owned sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub category_id: u32,
    pub phase: PhaseOut,
    /// 1-based position for display; equals `totalQuestions` once completed.
    pub question_number: usize,
    pub total_questions: usize,
    pub correct_count: usize,
    pub question: Option<QuestionOut>,
    pub selected_answer: Option<usize>,
    pub answered_correctly: Option<bool>,
    pub started_at: DateTime<Utc>,
    pub result: Option<ResultOut>,
}

pub fn result_out(r: &ResultSummary) -> ResultOut {
    ResultOut {
        category_id: r.category_id,
        total_questions: r.total_questions,
        correct_answers: r.correct_answers,
        time_spent_ms: u64::try_from(r.time_spent.as_millis()).unwrap_or(u64::MAX),
        completed_at: r.completed_at,
        percentage: r.percentage(),
        passed: r.passed(),
    }
}

/// Convert an internal snapshot to the public DTO.
pub fn session_out(id: Option<Uuid>, s: &SessionSnapshot) -> SessionOut {
    SessionOut {
        id,
        category_id: s.category_id,
        phase: s.phase.into(),
        question_number: (s.current_index + 1).min(s.total_questions),
        total_questions: s.total_questions,
        correct_count: s.correct_count,
        question: s.current_question.as_ref().map(|q| QuestionOut {
            id: q.id,
            text: q.text.clone(),
            options: q.options.clone(),
            correct_answer_index: q.correct_answer_index,
            explanation: q.explanation.clone(),
        }),
        selected_answer: s.selected_answer,
        answered_correctly: s.answered_correctly,
        started_at: s.started_at,
        result: s.result.as_ref().map(result_out),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesOut {
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsOut {
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
pub struct StartSessionIn {
    #[serde(rename = "categoryId")]
    pub category_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    #[serde(rename = "optionIndex")]
    pub option_index: usize,
}

#[derive(Deserialize)]
pub struct AssistantIn {
    pub text: String,
}
#[derive(Serialize)]
pub struct AssistantOut {
    pub text: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::*;

    #[test]
    fn result_out_reports_millis_and_grade() {
        let r = ResultSummary::new(3, 10, 8, Duration::from_millis(95_250), Utc::now());
        let out = result_out(&r);
        assert_eq!(out.time_spent_ms, 95_250);
        assert_eq!(out.percentage, 80);
        assert!(out.passed);
    }

    #[test]
    fn huge_time_spent_saturates() {
        let r = ResultSummary::new(3, 10, 2, Duration::MAX, Utc::now());
        assert_eq!(result_out(&r).time_spent_ms, u64::MAX);
    }
}
