//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Parsing and checking generation parameters before the corpus is touched
//!   - Generating quizzes for ad-hoc scopes and for stored challenges
//!   - Turning authoring DTOs into store calls

use tracing::{info, instrument};

use crate::domain::{Challenge, QuizMode, Scope, ScopeType};
use crate::error::QuizError;
use crate::protocol::{to_out, ChallengeIn, QuizOut, QuizQuery};
use crate::state::AppState;
use crate::store::NewChallenge;

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, QuizError> {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .ok_or_else(|| QuizError::Input(format!("missing '{}' parameter", name)))
}

fn parse_scope_id(raw: &str) -> Result<u16, QuizError> {
  match raw.trim().parse::<u16>() {
    Ok(id) if id > 0 => Ok(id),
    _ => Err(QuizError::Input(format!("number must be a positive integer, got '{}'", raw))),
  }
}

/// Scope type first, then mode, then scope id. Nothing here reads the corpus.
pub fn parse_quiz_request(
  mode: Option<&str>,
  scope_type: Option<&str>,
  scope_id: Option<&str>,
) -> Result<(QuizMode, Scope), QuizError> {
  let scope_type: ScopeType = required(scope_type, "type")?.parse()?;
  let mode: QuizMode = required(mode, "mode")?.parse()?;
  let id = parse_scope_id(required(scope_id, "number")?)?;
  Ok((mode, Scope::new(scope_type, id)))
}

#[instrument(level = "info", skip(state))]
pub async fn generate_quiz(state: &AppState, query: &QuizQuery) -> Result<QuizOut, QuizError> {
  let (mode, scope) =
    parse_quiz_request(query.mode.as_deref(), query.scope_type.as_deref(), query.scope_id.as_deref())?;
  let quiz = state.generate(mode, &scope).await?;
  Ok(to_out(&quiz))
}

/// Quiz over a stored challenge's scope in the matching mode.
#[instrument(level = "info", skip(state))]
pub async fn generate_for_challenge(state: &AppState, challenge_id: &str) -> Result<QuizOut, QuizError> {
  let challenge = state.store.get_challenge(challenge_id).await?;
  let quiz = state.generate(challenge.mode.quiz_mode(), &challenge.scope).await?;
  info!(target: "quiz", %challenge_id, verse = quiz.verse.id, "Challenge quiz served");
  Ok(to_out(&quiz))
}

#[instrument(level = "info", skip(state, body), fields(mode = ?body.mode, scope = %body.scope))]
pub async fn create_challenge(state: &AppState, body: ChallengeIn) -> Result<Challenge, QuizError> {
  state
    .store
    .create_challenge(NewChallenge { owner: body.owner, is_public: body.is_public, mode: body.mode, scope: body.scope })
    .await
}
