//! Question sequencing: pick an eligible verse from the scope and drive the
//! distractor synthesizer over it.
//!
//! - word mode: one sub-question per word after the initial prompt, each asking
//!   for the next word given everything before it
//! - verse mode: a single option set asking for the ayah that follows

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::QuizSettings;
use crate::corpus::Corpus;
use crate::distractor::synthesize;
use crate::domain::{AnswerOption, QuizMode, Scope, Verse};
use crate::error::QuizError;
use crate::oracle::{LanguageOracle, SimilarityOracle};

/// Prompt text plus the options for the word that follows it.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SubQuestion {
  pub text: String,
  pub options: Vec<AnswerOption>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum QuizPayload {
  Questions(Vec<SubQuestion>),
  Options(Vec<AnswerOption>),
}

/// A generated quiz over one selected verse.
#[derive(Clone, Debug)]
pub struct Quiz {
  pub mode: QuizMode,
  pub verse: Verse,
  pub title: String,
  pub payload: QuizPayload,
}

pub struct QuestionSequencer {
  corpus: Arc<Corpus>,
  language: Arc<dyn LanguageOracle>,
  similarity: Arc<dyn SimilarityOracle>,
  settings: QuizSettings,
}

impl QuestionSequencer {
  pub fn new(
    corpus: Arc<Corpus>,
    language: Arc<dyn LanguageOracle>,
    similarity: Arc<dyn SimilarityOracle>,
    settings: QuizSettings,
  ) -> Self {
    Self { corpus, language, similarity, settings }
  }

  pub fn corpus(&self) -> &Corpus {
    &self.corpus
  }

  /// Uniformly pick a verse of the scope that is long enough to quiz on.
  pub fn pick_verse<R: Rng + ?Sized>(&self, rng: &mut R, scope: &Scope) -> Result<&Verse, QuizError> {
    let min_length = self.settings.min_verse_length;
    let eligible = self.corpus.eligible_verses(scope, min_length)?;
    eligible
      .choose(rng)
      .copied()
      .ok_or_else(|| QuizError::EmptyScope { scope: scope.to_string(), min_length })
  }

  /// Sub-questions for every word after the first `prompt_words`.
  /// Empty when the verse is not longer than the prompt.
  pub fn word_questions<R: Rng + ?Sized>(&self, rng: &mut R, verse: &Verse) -> Vec<SubQuestion> {
    let words: Vec<&str> = verse.words().collect();
    let prompt_words = self.settings.prompt_words;
    if words.len() <= prompt_words {
      debug!(target: "quiz", verse = verse.id, words = words.len(), "Verse has no words past the prompt");
      return Vec::new();
    }

    let mut context: Vec<&str> = words[..prompt_words].to_vec();
    let mut questions = Vec::with_capacity(words.len() - prompt_words);
    for &word in &words[prompt_words..] {
      let prompt = context.join(" ");
      let predictions = self.language.predict_next(&prompt);
      debug!(target: "quiz", %word, candidates = predictions.len(), top = ?predictions.first().map(|p| p.score), "Next-word candidates");
      // the word just shown is too obvious a distractor
      let pool = &context[..context.len().saturating_sub(1)];
      let options = synthesize(rng, word, predictions.into_iter().map(|p| p.token), Some(pool));
      questions.push(SubQuestion { text: prompt, options });
      context.push(word);
    }
    questions
  }

  /// Options for "which ayah comes next". Fails at the end of the corpus.
  pub fn verse_options<R: Rng + ?Sized>(&self, rng: &mut R, verse: &Verse) -> Result<Vec<AnswerOption>, QuizError> {
    let next = self
      .corpus
      .verse_by_id(verse.id + 1)
      .map_err(|_| QuizError::NotFound(format!("ayah {} has no following ayah", verse.id)))?;

    let candidates: Vec<&Verse> = self.corpus.verses().iter().filter(|v| v.id != next.id).collect();
    let matches = self.similarity.top_matches(&next.text, &candidates, self.settings.verse_alternatives);
    debug!(
      target: "quiz",
      next = next.id,
      alternatives = matches.len(),
      best_score = ?matches.first().map(|m| m.score),
      "Similarity alternatives"
    );
    Ok(synthesize(rng, &next.text, matches.into_iter().map(|m| m.verse.text.clone()), None))
  }

  #[instrument(level = "info", skip_all, fields(%scope, ?mode))]
  pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, mode: QuizMode, scope: &Scope) -> Result<Quiz, QuizError> {
    let verse = self.pick_verse(rng, scope)?;
    let payload = match mode {
      QuizMode::Word => QuizPayload::Questions(self.word_questions(rng, verse)),
      QuizMode::Verse => QuizPayload::Options(self.verse_options(rng, verse)?),
    };
    info!(target: "quiz", %scope, verse = verse.id, ?mode, "Quiz generated");
    Ok(Quiz {
      mode,
      verse: verse.clone(),
      title: self.corpus.chapter_display_name(verse).to_string(),
      payload,
    })
  }
}
