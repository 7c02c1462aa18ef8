//! Result summary of a finished quiz.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Minimum percentage counted as a pass (inclusive).
pub const PASS_THRESHOLD_PERCENT: u32 = 80;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultSummary {
  pub category_id: u32,
  pub total_questions: usize,
  pub correct_answers: usize,
  pub time_spent: Duration,
  pub completed_at: DateTime<Utc>,
}

impl ResultSummary {
  pub fn new(
    category_id: u32,
    total_questions: usize,
    correct_answers: usize,
    time_spent: Duration,
    completed_at: DateTime<Utc>,
  ) -> Self {
    Self { category_id, total_questions, correct_answers, time_spent, completed_at }
  }

  /// Floor of `correct * 100 / total`; 0 for an empty quiz.
  pub fn percentage(&self) -> u32 {
    if self.total_questions == 0 {
      return 0;
    }
    (self.correct_answers * 100 / self.total_questions) as u32
  }

  pub fn passed(&self) -> bool {
    self.percentage() >= PASS_THRESHOLD_PERCENT
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn summary(correct: usize, total: usize) -> ResultSummary {
    ResultSummary::new(1, total, correct, Duration::from_secs(42), Utc::now())
  }

  #[test]
  fn percentage_floors() {
    assert_eq!(summary(2, 3).percentage(), 66);
    assert_eq!(summary(1, 3).percentage(), 33);
    assert_eq!(summary(5, 5).percentage(), 100);
    assert_eq!(summary(0, 7).percentage(), 0);
  }

  #[test]
  fn pass_boundary_is_inclusive() {
    assert!(!summary(7, 10).passed());
    assert!(summary(8, 10).passed());
    assert!(summary(10, 10).passed());
    // 79.x% floors to 79
    assert!(!summary(79, 100).passed());
    assert!(!summary(3, 4).passed());
  }

  #[test]
  fn empty_quiz_never_divides_by_zero() {
    let s = summary(0, 0);
    assert_eq!(s.percentage(), 0);
    assert!(!s.passed());
  }
}
