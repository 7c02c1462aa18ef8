//! Loading quiz configuration (quiz settings, assistant replies, profile, optional
//! question bank) from TOML.
//!
//! See `QuizConfig` for the expected schema. Every section is optional.

use serde::Deserialize;
use tracing::{error, info};

use crate::assistant::{Assistant, ReplyRule};
use crate::domain::{Category, Question};
use crate::error::{QuizError, Result};
use crate::profile::ProfileCfg;
use crate::state::DEFAULT_SESSION_TTL_SECS;
use crate::store::{Catalog, DEFAULT_QUESTION_LIMIT};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub quiz: QuizSettings,
  #[serde(default)]
  pub assistant: AssistantCfg,
  #[serde(default)]
  pub profile: ProfileCfg,
  /// Custom bank; when present it replaces the built-in catalog.
  #[serde(default)]
  pub categories: Vec<CategoryCfg>,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuizSettings {
  #[serde(default = "default_question_limit")]
  pub question_limit: usize,
  /// Fixed seed for reproducible shuffles; OS entropy when unset.
  #[serde(default)]
  pub shuffle_seed: Option<u64>,
  /// Idle HTTP sessions older than this are dropped.
  #[serde(default = "default_session_ttl_secs")]
  pub session_ttl_secs: u64,
}

fn default_question_limit() -> usize { DEFAULT_QUESTION_LIMIT }
fn default_session_ttl_secs() -> u64 { DEFAULT_SESSION_TTL_SECS }

impl Default for QuizSettings {
  fn default() -> Self {
    Self { question_limit: DEFAULT_QUESTION_LIMIT, shuffle_seed: None, session_ttl_secs: DEFAULT_SESSION_TTL_SECS }
  }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AssistantCfg {
  #[serde(default)] pub greeting: Option<String>,
  #[serde(default)] pub fallback: Option<String>,
  #[serde(default)] pub rules: Option<Vec<ReplyRule>>,
}

impl AssistantCfg {
  /// Every rule needs at least one non-blank keyword; a blank keyword would match any message.
  fn validate(&self) -> Result<()> {
    for (i, rule) in self.rules.iter().flatten().enumerate() {
      if rule.keywords.is_empty() {
        return Err(QuizError::Config(format!("assistant.rules[{i}] has no keywords")));
      }
      if rule.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(QuizError::Config(format!("assistant.rules[{i}] has a blank keyword")));
      }
    }
    Ok(())
  }

  pub fn to_assistant(&self) -> Assistant {
    Assistant::with_overrides(self.greeting.clone(), self.fallback.clone(), self.rules.clone())
  }
}

/// Category entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct CategoryCfg {
  pub id: u32,
  pub name: String,
  #[serde(default)] pub description: String,
  #[serde(default)] pub icon: String,
  #[serde(default)] pub total_questions: u32,
}

/// Question entry accepted in TOML configuration; refers to its category by id.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub id: u32,
  pub category_id: u32,
  pub text: String,
  pub options: Vec<String>,
  pub correct_answer_index: usize,
  #[serde(default)] pub explanation: String,
}

impl QuizConfig {
  /// Custom catalog if the config defines one.
  pub fn catalog(&self) -> Result<Option<Catalog>> {
    if self.categories.is_empty() && self.questions.is_empty() {
      return Ok(None);
    }

    let categories: Vec<Category> = self
      .categories
      .iter()
      .map(|c| Category {
        id: c.id,
        name: c.name.clone(),
        description: c.description.clone(),
        icon: c.icon.clone(),
        total_questions: c.total_questions,
      })
      .collect();

    let mut questions = Vec::with_capacity(self.questions.len());
    for q in &self.questions {
      let category = categories
        .iter()
        .find(|c| c.id == q.category_id)
        .ok_or_else(|| QuizError::InvalidCatalog(format!("question {} refers to unknown category {}", q.id, q.category_id)))?;
      questions.push(Question {
        id: q.id,
        text: q.text.clone(),
        options: q.options.clone(),
        correct_answer_index: q.correct_answer_index,
        category: category.clone(),
        explanation: q.explanation.clone(),
      });
    }

    Catalog::new(categories, questions).map(Some)
  }
}

pub fn parse_config(s: &str) -> Result<QuizConfig> {
  let cfg = toml::from_str::<QuizConfig>(s).map_err(|e| QuizError::Config(e.to_string()))?;
  if cfg.quiz.question_limit == 0 {
    return Err(QuizError::Config("quiz.question_limit must be at least 1".into()));
  }
  if cfg.quiz.session_ttl_secs == 0 {
    return Err(QuizError::Config("quiz.session_ttl_secs must be at least 1".into()));
  }
  cfg.assistant.validate()?;
  Ok(cfg)
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "avto_quiz", %path, "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "avto_quiz", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "avto_quiz", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

/// Directory the SPA is served from.
pub fn static_dir_from_env() -> String {
  std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".into())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::QuestionStore;

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = parse_config("").unwrap();
    assert_eq!(cfg.quiz.question_limit, 10);
    assert_eq!(cfg.quiz.shuffle_seed, None);
    assert_eq!(cfg.quiz.session_ttl_secs, 1800);
    assert!(cfg.catalog().unwrap().is_none());
    assert!(cfg.assistant.to_assistant().greeting().starts_with("Hello!"));
  }

  #[test]
  fn parses_settings_assistant_and_profile() {
    let cfg = parse_config(
      r#"
        [quiz]
        question_limit = 5
        shuffle_seed = 42

        [assistant]
        fallback = "Ask your instructor."
        [[assistant.rules]]
        keywords = ["roundabout"]
        reply = "Yield to traffic already circulating."

        [profile]
        name = "Dilnoza"
        [[profile.stats]]
        label = "Tests Completed"
        value = "3"
      "#,
    )
    .unwrap();

    assert_eq!(cfg.quiz.question_limit, 5);
    assert_eq!(cfg.quiz.shuffle_seed, Some(42));
    let assistant = cfg.assistant.to_assistant();
    assert_eq!(assistant.reply("Roundabout entry?").unwrap(), "Yield to traffic already circulating.");
    assert_eq!(assistant.reply("speed limit").unwrap(), "Ask your instructor.");
    let profile = cfg.profile.clone().into_profile();
    assert_eq!(profile.name, "Dilnoza");
    assert_eq!(profile.stats.len(), 1);
  }

  #[test]
  fn custom_bank_builds_catalog() {
    let cfg = parse_config(
      r#"
        [[categories]]
        id = 9
        name = "Night Driving"
        total_questions = 2

        [[questions]]
        id = 1
        category_id = 9
        text = "When should you dip your headlights?"
        options = ["Never", "When meeting oncoming traffic"]
        correct_answer_index = 1
        explanation = "Full beam dazzles other drivers."

        [[questions]]
        id = 2
        category_id = 9
        text = "Is fog light use mandatory at night?"
        options = ["Yes", "No"]
        correct_answer_index = 1
      "#,
    )
    .unwrap();

    let catalog = cfg.catalog().unwrap().unwrap();
    assert_eq!(catalog.list_categories().len(), 1);
    assert_eq!(catalog.all_questions().len(), 2);
    assert_eq!(catalog.all_questions()[0].category.name, "Night Driving");
  }

  #[test]
  fn bank_with_unknown_category_is_rejected() {
    let cfg = parse_config(
      r#"
        [[questions]]
        id = 1
        category_id = 3
        text = "?"
        options = ["a", "b"]
        correct_answer_index = 0
      "#,
    )
    .unwrap();
    assert!(matches!(cfg.catalog(), Err(QuizError::InvalidCatalog(_))));
  }

  #[test]
  fn zero_limit_and_bad_toml_are_config_errors() {
    assert!(matches!(parse_config("[quiz]\nquestion_limit = 0"), Err(QuizError::Config(_))));
    assert!(matches!(parse_config("[quiz]\nsession_ttl_secs = 0"), Err(QuizError::Config(_))));
    assert!(matches!(parse_config("[quiz"), Err(QuizError::Config(_))));
  }

  #[test]
  fn assistant_rules_need_real_keywords() {
    let blank = r#"
      [[assistant.rules]]
      keywords = ["parking", " "]
      reply = "X"
    "#;
    let empty = r#"
      [[assistant.rules]]
      keywords = []
      reply = "X"
    "#;
    assert!(matches!(parse_config(blank), Err(QuizError::Config(m)) if m.contains("blank keyword")));
    assert!(matches!(parse_config(empty), Err(QuizError::Config(m)) if m.contains("no keywords")));

    let cfg = parse_config("[[assistant.rules]]\nkeywords = [\"parking\"]\nreply = \"X\"").unwrap();
    assert_eq!(cfg.assistant.to_assistant().reply("tell me a joke").unwrap(), Assistant::default().reply("tell me a joke").unwrap());
  }
}
