//! In-memory challenge/question store.
//!
//! Stands in for the persistence layer. Every question write goes through the
//! invariant validator first; a rejected write leaves the store untouched.
//! Lock order is always challenges, then questions.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::corpus::Corpus;
use crate::domain::{Challenge, ChallengeMode, Question, Scope, ScopeVerses};
use crate::error::QuizError;
use crate::validation::validate_question;

#[derive(Clone, Debug)]
pub struct NewChallenge {
  pub owner: Option<String>,
  pub is_public: bool,
  pub mode: ChallengeMode,
  pub scope: Scope,
}

pub struct ChallengeStore {
  corpus: Arc<Corpus>,
  challenges: RwLock<HashMap<String, Challenge>>,
  /// Questions grouped by owning challenge id, in insertion order.
  questions: RwLock<HashMap<String, Vec<Question>>>,
}

fn unknown_challenge(id: &str) -> QuizError {
  QuizError::NotFound(format!("challenge {} does not exist", id))
}

impl ChallengeStore {
  pub fn new(corpus: Arc<Corpus>) -> Self {
    Self { corpus, challenges: RwLock::new(HashMap::new()), questions: RwLock::new(HashMap::new()) }
  }

  /// The scope must resolve to an existing surah/juz.
  #[instrument(level = "info", skip(self, new), fields(scope = %new.scope, mode = ?new.mode))]
  pub async fn create_challenge(&self, new: NewChallenge) -> Result<Challenge, QuizError> {
    new.scope.verses(&self.corpus)?;
    let challenge = Challenge {
      id: Uuid::new_v4().to_string(),
      owner: new.owner,
      is_public: new.is_public,
      mode: new.mode,
      scope: new.scope,
    };
    self.challenges.write().await.insert(challenge.id.clone(), challenge.clone());
    info!(target: "challenge", id = %challenge.id, "Challenge created");
    Ok(challenge)
  }

  pub async fn get_challenge(&self, id: &str) -> Result<Challenge, QuizError> {
    self.challenges.read().await.get(id).cloned().ok_or_else(|| unknown_challenge(id))
  }

  /// Removes the challenge and every question it owns. Returns how many questions went with it.
  #[instrument(level = "info", skip(self))]
  pub async fn delete_challenge(&self, id: &str) -> Result<usize, QuizError> {
    let mut challenges = self.challenges.write().await;
    let mut questions = self.questions.write().await;
    challenges.remove(id).ok_or_else(|| unknown_challenge(id))?;
    let removed = questions.remove(id).map_or(0, |qs| qs.len());
    info!(target: "challenge", %id, questions = removed, "Challenge deleted");
    Ok(removed)
  }

  /// Owner account went away: detach it, keep the challenges.
  #[instrument(level = "info", skip(self))]
  pub async fn release_owner(&self, owner: &str) -> usize {
    let mut challenges = self.challenges.write().await;
    let mut released = 0;
    for ch in challenges.values_mut().filter(|c| c.owner.as_deref() == Some(owner)) {
      ch.owner = None;
      released += 1;
    }
    info!(target: "challenge", %owner, released, "Owner released");
    released
  }

  #[instrument(level = "info", skip(self, options), fields(%challenge_id))]
  pub async fn add_question(&self, challenge_id: &str, ayah: u32, options: Value) -> Result<Question, QuizError> {
    let challenges = self.challenges.read().await;
    let challenge = challenges.get(challenge_id).ok_or_else(|| unknown_challenge(challenge_id))?;
    let question = Question { id: Uuid::new_v4().to_string(), challenge_id: challenge_id.to_string(), ayah, options };

    if let Err(e) = validate_question(&self.corpus, challenge, &question) {
      warn!(target: "challenge", %challenge_id, ayah, error = %e, "Question rejected");
      return Err(e);
    }
    self.questions.write().await.entry(challenge_id.to_string()).or_default().push(question.clone());
    info!(target: "challenge", %challenge_id, id = %question.id, "Question stored");
    Ok(question)
  }

  /// Swap a question's options. The full validation runs on the result; on
  /// failure the stored question keeps its old options.
  #[instrument(level = "info", skip(self, options), fields(%question_id))]
  pub async fn replace_options(&self, question_id: &str, options: Value) -> Result<Question, QuizError> {
    let challenges = self.challenges.read().await;
    let mut questions = self.questions.write().await;
    let stored = questions
      .values_mut()
      .flat_map(|qs| qs.iter_mut())
      .find(|q| q.id == question_id)
      .ok_or_else(|| QuizError::NotFound(format!("question {} does not exist", question_id)))?;
    let challenge = challenges.get(&stored.challenge_id).ok_or_else(|| unknown_challenge(&stored.challenge_id))?;

    let candidate = Question { options, ..stored.clone() };
    if let Err(e) = validate_question(&self.corpus, challenge, &candidate) {
      warn!(target: "challenge", %question_id, error = %e, "Option replacement rejected");
      return Err(e);
    }
    *stored = candidate;
    Ok(stored.clone())
  }

  pub async fn questions_for(&self, challenge_id: &str) -> Result<Vec<Question>, QuizError> {
    let challenges = self.challenges.read().await;
    if !challenges.contains_key(challenge_id) {
      return Err(unknown_challenge(challenge_id));
    }
    Ok(self.questions.read().await.get(challenge_id).cloned().unwrap_or_default())
  }
}
