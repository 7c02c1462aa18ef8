//! Question Store: read-only access to categories and questions.
//!
//! The store is constructed explicitly and handed to the application state,
//! so tests can swap in a tiny catalog. Shuffling uses a caller-supplied
//! random source to keep orderings reproducible under a fixed seed.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::{debug, instrument};

use crate::domain::{Category, Question};
use crate::error::{QuizError, Result};
use crate::seeds::{seed_categories, seed_questions};

/// Number of questions drawn for one quiz unless configured otherwise.
pub const DEFAULT_QUESTION_LIMIT: usize = 10;

pub trait QuestionStore: Send + Sync {
    /// Full category list in catalog order.
    fn list_categories(&self) -> Vec<Category>;

    /// Up to `limit` questions of `category_id` in random order.
    /// Unknown categories yield an empty list, not an error.
    fn questions_for_category(
        &self,
        category_id: u32,
        limit: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Question>>;

    /// Every question in catalog order.
    fn all_questions(&self) -> Vec<Question>;
}

/// Immutable in-memory catalog.
#[derive(Clone, Debug)]
pub struct Catalog {
    categories: Vec<Category>,
    questions: Vec<Question>,
}

impl Catalog {
    /// Validate and build a catalog.
    pub fn new(categories: Vec<Category>, questions: Vec<Question>) -> Result<Self> {
        let mut category_ids = HashSet::new();
        for c in &categories {
            if !category_ids.insert(c.id) {
                return Err(QuizError::InvalidCatalog(format!("duplicate category id {}", c.id)));
            }
        }

        let mut question_ids = HashSet::new();
        for q in &questions {
            if !question_ids.insert(q.id) {
                return Err(QuizError::InvalidCatalog(format!("duplicate question id {}", q.id)));
            }
            if let Some(reason) = q.invariant_violation() {
                return Err(QuizError::InvalidCatalog(reason));
            }
            if !category_ids.contains(&q.category.id) {
                return Err(QuizError::InvalidCatalog(format!(
                    "question {} belongs to unknown category {}",
                    q.id, q.category.id
                )));
            }
        }

        Ok(Self { categories, questions })
    }

    /// The reference catalog shipped with the binary.
    pub fn builtin() -> Self {
        let categories = seed_categories();
        let questions = seed_questions(&categories);
        Self { categories, questions }
    }

    pub fn category(&self, id: u32) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

impl QuestionStore for Catalog {
    fn list_categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    #[instrument(level = "debug", skip(self, rng))]
    fn questions_for_category(
        &self,
        category_id: u32,
        limit: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Question>> {
        let mut picked: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| q.category.id == category_id)
            .cloned()
            .collect();
        let available = picked.len();
        picked.shuffle(rng);
        picked.truncate(limit);
        debug!(target: "quiz", category_id, available, returned = picked.len(), "Questions drawn for category");
        Ok(picked)
    }

    fn all_questions(&self) -> Vec<Question> {
        self.questions.clone()
    }
}
