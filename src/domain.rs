//! Domain models: test categories and multiple-choice questions.

use serde::{Deserialize, Serialize};

/// A group of questions shown as one tile on the tests screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
  pub id: u32,
  pub name: String,
  pub description: String,
  /// Icon tag understood by the client (e.g. "traffic_light").
  pub icon: String,
  /// Display-only count; not checked against the catalog.
  pub total_questions: u32,
}

impl Category {
  pub fn new(id: u32, name: &str, description: &str, icon: &str, total_questions: u32) -> Self {
    Self {
      id,
      name: name.into(),
      description: description.into(),
      icon: icon.into(),
      total_questions,
    }
  }
}

/// One multiple-choice question. Invariant: `correct_answer_index < options.len()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id: u32,
  pub text: String,
  pub options: Vec<String>,
  pub correct_answer_index: usize,
  pub category: Category,
  #[serde(default)]
  pub explanation: String,
}

impl Question {
  pub fn new(id: u32, text: &str, options: &[&str], correct_answer_index: usize, category: &Category) -> Self {
    Self {
      id,
      text: text.into(),
      options: options.iter().map(|o| o.to_string()).collect(),
      correct_answer_index,
      category: category.clone(),
      explanation: String::new(),
    }
  }

  pub fn with_explanation(mut self, explanation: &str) -> Self {
    self.explanation = explanation.into();
    self
  }

  pub fn is_correct(&self, option: usize) -> bool {
    option == self.correct_answer_index
  }

  /// Returns a description of the first broken invariant, if any.
  pub fn invariant_violation(&self) -> Option<String> {
    if self.options.len() < 2 {
      return Some(format!("question {} has {} option(s), at least 2 required", self.id, self.options.len()));
    }
    if self.correct_answer_index >= self.options.len() {
      return Some(format!(
        "question {} marks option {} as correct but only has {} options",
        self.id,
        self.correct_answer_index,
        self.options.len()
      ));
    }
    None
  }
}
