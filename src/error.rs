//! Error taxonomy shared by generation, authoring and startup.
//!
//! Every failure is reported synchronously to the immediate caller; nothing retries.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QuizError {
  /// Unknown mode / scope type, malformed scope id, malformed body.
  #[error("{0}")]
  Input(String),

  /// Scope instance, verse, challenge or question that does not exist.
  #[error("{0}")]
  NotFound(String),

  /// No verse of the scope is long enough to build a prompt from.
  #[error("no eligible verse in {scope} (every verse has at most {min_length} characters)")]
  EmptyScope { scope: String, min_length: usize },

  /// A question violates one of the persisted-question invariants.
  #[error("{0}")]
  Validation(String),

  /// Corpus or model data could not be loaded; the process must not serve.
  #[error("failed to load {what} from {path}: {reason}")]
  Startup { what: &'static str, path: String, reason: String },
}

impl QuizError {
  pub fn status(&self) -> StatusCode {
    match self {
      QuizError::Input(_) => StatusCode::BAD_REQUEST,
      QuizError::NotFound(_) => StatusCode::NOT_FOUND,
      QuizError::EmptyScope { .. } | QuizError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      QuizError::Startup { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for QuizError {
  fn into_response(self) -> axum::response::Response {
    (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn statuses_follow_taxonomy() {
    assert_eq!(QuizError::Input("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(QuizError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
    assert_eq!(
      QuizError::EmptyScope { scope: "surah 1".into(), min_length: 50 }.status(),
      StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(QuizError::Validation("x".into()).status(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[test]
  fn empty_scope_message_names_scope() {
    let e = QuizError::EmptyScope { scope: "juz 30".into(), min_length: 50 };
    assert!(e.to_string().contains("juz 30"));
  }
}
