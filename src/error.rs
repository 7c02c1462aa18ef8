use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, QuizError>;

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("No questions available for category {category_id}")]
    NoQuestions { category_id: u32 },

    #[error("Precondition violated: {0}")]
    Precondition(&'static str),

    #[error("Option {index} is out of range for a question with {len} options")]
    InvalidOption { index: usize, len: usize },

    #[error("Unknown session: {0}")]
    SessionNotFound(Uuid),

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Invalid question catalog: {0}")]
    InvalidCatalog(String),

    #[error("Question store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl QuizError {
    /// Stable label sent to clients next to the human-readable message.
    pub fn kind(&self) -> &'static str {
        match self {
            QuizError::NoQuestions { .. } => "no_questions",
            QuizError::Precondition(_) => "precondition",
            QuizError::InvalidOption { .. } => "invalid_option",
            QuizError::SessionNotFound(_) => "session_not_found",
            QuizError::EmptyMessage => "empty_message",
            QuizError::InvalidCatalog(_) => "invalid_catalog",
            QuizError::StoreUnavailable(_) => "store_unavailable",
            QuizError::Config(_) => "config",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            QuizError::NoQuestions { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            QuizError::Precondition(_) => StatusCode::CONFLICT,
            QuizError::InvalidOption { .. } | QuizError::EmptyMessage => StatusCode::BAD_REQUEST,
            QuizError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            QuizError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            QuizError::InvalidCatalog(_) | QuizError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for QuizError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string(), "kind": self.kind() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cannot_start_maps_to_unprocessable_entity() {
        let err = QuizError::NoQuestions { category_id: 99 };
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.kind(), "no_questions");
        assert_eq!(err.to_string(), "No questions available for category 99");
    }

    #[test]
    fn ordering_errors_map_to_conflict() {
        let err = QuizError::Precondition("answer must be revealed before advancing");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.kind(), "precondition");
    }
}
