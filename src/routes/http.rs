//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; failures render as `{"error": ...}` with the
//! status their `QuizError` variant maps to.

use std::sync::Arc;
use axum::{
  extract::{rejection::JsonRejection, Path, Query, State},
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::domain::{Challenge, Question};
use crate::error::QuizError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, QuizError> {
  payload.map(|Json(v)| v).map_err(|e| QuizError::Input(e.body_text()))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuizQuery>,
) -> Result<Json<QuizOut>, QuizError> {
  let out = generate_quiz(&state, &q).await?;
  info!(target: "quiz", title = %out.title, number = out.number, "HTTP quiz served");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_challenge(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<ChallengeIn>, JsonRejection>,
) -> Result<Json<Challenge>, QuizError> {
  let ch = create_challenge(&state, body(payload)?).await?;
  Ok(Json(ch))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_challenge(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<Challenge>, QuizError> {
  Ok(Json(state.store.get_challenge(&id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_challenge(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<DeletedOut>, QuizError> {
  let questions = state.store.delete_challenge(&id).await?;
  Ok(Json(DeletedOut { deleted: true, questions }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_challenge_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<QuizOut>, QuizError> {
  Ok(Json(generate_for_challenge(&state, &id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_questions(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<Question>>, QuizError> {
  Ok(Json(state.store.questions_for(&id).await?))
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_question(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  payload: Result<Json<QuestionIn>, JsonRejection>,
) -> Result<Json<Question>, QuizError> {
  let q = body(payload)?;
  Ok(Json(state.store.add_question(&id, q.ayah, q.options).await?))
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_put_options(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  payload: Result<Json<OptionsIn>, JsonRejection>,
) -> Result<Json<Question>, QuizError> {
  let o = body(payload)?;
  Ok(Json(state.store.replace_options(&id, o.options).await?))
}
