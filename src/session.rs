//! Quiz session state machine.
//!
//! One session covers one attempt at a category quiz:
//!
//! ```text
//! start ─► Unanswered ─select─► Revealed ─advance─► Unanswered (next question)
//!                                   │
//!                                   └─advance on last question─► Completed
//! Completed ─restart─► Unanswered (same questions, new order)
//! ```
//!
//! Selecting only locks in and reveals the answer; scoring happens on
//! `advance`, so the client can show feedback for as long as it likes.
//! Every operation returns a fresh [`SessionSnapshot`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};

use crate::clock::Clock;
use crate::domain::Question;
use crate::error::{QuizError, Result};
use crate::store::QuestionStore;
use crate::summary::ResultSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the user to pick an option.
    Unanswered,
    /// An option is locked in and its correctness is shown.
    Revealed,
    /// Every question has been answered; the result is available.
    Completed,
}

/// Current question as the client may see it. The correct option and the
/// explanation stay hidden until an answer is revealed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionView {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: Option<usize>,
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub category_id: u32,
    pub phase: SessionPhase,
    pub current_index: usize,
    pub total_questions: usize,
    pub correct_count: usize,
    pub current_question: Option<QuestionView>,
    pub selected_answer: Option<usize>,
    pub answered_correctly: Option<bool>,
    pub started_at: DateTime<Utc>,
    pub result: Option<ResultSummary>,
}

pub struct QuizSession {
    category_id: u32,
    questions: Vec<Question>,
    current_index: usize,
    selected_answer: Option<usize>,
    revealed: bool,
    correct_count: usize,
    completed: bool,
    started_at: DateTime<Utc>,
    result: Option<ResultSummary>,
    rng: StdRng,
    clock: Arc<dyn Clock>,
}

impl QuizSession {
    /// Draw up to `limit` questions for `category_id` and begin the attempt.
    ///
    /// An empty draw is reported as [`QuizError::NoQuestions`]; no session
    /// is created in that case, nor when the store itself fails.
    #[instrument(level = "info", skip(store, rng, clock))]
    pub fn start(
        store: &dyn QuestionStore,
        category_id: u32,
        limit: usize,
        mut rng: StdRng,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let questions = store.questions_for_category(category_id, limit, &mut rng)?;
        if questions.is_empty() {
            info!(target: "quiz", category_id, "Cannot start quiz: no questions");
            return Err(QuizError::NoQuestions { category_id });
        }

        let started_at = clock.now();
        info!(target: "quiz", category_id, questions = questions.len(), "Quiz started");
        Ok(Self {
            category_id,
            questions,
            current_index: 0,
            selected_answer: None,
            revealed: false,
            correct_count: 0,
            completed: false,
            started_at,
            result: None,
            rng,
            clock,
        })
    }

    /// Lock in `option` for the current question and reveal it.
    ///
    /// Repeated taps and taps after completion are ignored: the first
    /// selection per question wins.
    pub fn select_answer(&mut self, option: usize) -> Result<SessionSnapshot> {
        if self.completed || self.selected_answer.is_some() {
            debug!(target: "quiz", category_id = self.category_id, option, "Selection ignored");
            return Ok(self.snapshot());
        }

        let len = self.questions[self.current_index].options.len();
        if option >= len {
            return Err(QuizError::InvalidOption { index: option, len });
        }

        self.selected_answer = Some(option);
        self.revealed = true;
        debug!(target: "quiz", category_id = self.category_id, index = self.current_index, option, "Answer revealed");
        Ok(self.snapshot())
    }

    /// Score the revealed answer and move on, completing the quiz after the
    /// last question.
    pub fn advance(&mut self) -> Result<SessionSnapshot> {
        if self.completed {
            return Err(QuizError::Precondition("quiz is already completed"));
        }
        let selected = match (self.revealed, self.selected_answer) {
            (true, Some(option)) => option,
            _ => return Err(QuizError::Precondition("an answer must be revealed before advancing")),
        };

        if self.questions[self.current_index].is_correct(selected) {
            self.correct_count += 1;
        }
        self.selected_answer = None;
        self.revealed = false;

        if self.current_index + 1 >= self.questions.len() {
            self.complete();
        } else {
            self.current_index += 1;
        }
        Ok(self.snapshot())
    }

    /// Start over with the same questions in a new random order.
    pub fn restart(&mut self) -> SessionSnapshot {
        self.questions.shuffle(&mut self.rng);
        self.current_index = 0;
        self.selected_answer = None;
        self.revealed = false;
        self.correct_count = 0;
        self.completed = false;
        self.result = None;
        self.started_at = self.clock.now();
        info!(target: "quiz", category_id = self.category_id, questions = self.questions.len(), "Quiz restarted");
        self.snapshot()
    }

    fn complete(&mut self) {
        let ended_at = self.clock.now();
        let time_spent = (ended_at - self.started_at).to_std().unwrap_or_default();
        let result = ResultSummary::new(
            self.category_id,
            self.questions.len(),
            self.correct_count,
            time_spent,
            ended_at,
        );
        info!(
            target: "quiz",
            category_id = self.category_id,
            correct = result.correct_answers,
            total = result.total_questions,
            percentage = result.percentage(),
            passed = result.passed(),
            "Quiz completed"
        );
        self.current_index = self.questions.len();
        self.completed = true;
        self.result = Some(result);
    }

    pub fn phase(&self) -> SessionPhase {
        if self.completed {
            SessionPhase::Completed
        } else if self.revealed {
            SessionPhase::Revealed
        } else {
            SessionPhase::Unanswered
        }
    }

    pub fn category_id(&self) -> u32 {
        self.category_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn result(&self) -> Option<&ResultSummary> {
        self.result.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let current = self.questions.get(self.current_index).filter(|_| !self.completed);
        let current_question = current.map(|q| QuestionView {
            id: q.id,
            text: q.text.clone(),
            options: q.options.clone(),
            correct_answer_index: self.revealed.then_some(q.correct_answer_index),
            explanation: if self.revealed && !q.explanation.is_empty() {
                Some(q.explanation.clone())
            } else {
                None
            },
        });
        let answered_correctly = match (current, self.selected_answer) {
            (Some(q), Some(option)) if self.revealed => Some(q.is_correct(option)),
            _ => None,
        };

        SessionSnapshot {
            category_id: self.category_id,
            phase: self.phase(),
            current_index: self.current_index,
            total_questions: self.questions.len(),
            correct_count: self.correct_count,
            current_question,
            selected_answer: self.selected_answer,
            answered_correctly,
            started_at: self.started_at,
            result: self.result.clone(),
        }
    }
}
