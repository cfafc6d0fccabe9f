//! Invariants of an authored question, checked on every save.
//!
//! Order is fixed and the first violation wins:
//!   1. the ayah lies inside the challenge scope
//!   2. the correct answer can be read off the options
//!   3. the options have the shape the challenge mode dictates
//!
//! Validation is pure: running it again on a valid question is a no-op.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::corpus::Corpus;
use crate::domain::{Challenge, ChallengeMode, Question, NUMBER_OF_OPTIONS};
use crate::error::QuizError;

#[instrument(level = "debug", skip_all, fields(challenge = %challenge.id, ayah = question.ayah))]
pub fn validate_question(corpus: &Corpus, challenge: &Challenge, question: &Question) -> Result<(), QuizError> {
  check_in_scope(corpus, challenge, question)?;
  check_answer_exists(corpus, challenge.mode, question)?;
  check_option_shape(challenge.mode, &question.options)?;
  debug!(target: "challenge", "Question passed validation");
  Ok(())
}

fn check_in_scope(corpus: &Corpus, challenge: &Challenge, question: &Question) -> Result<(), QuizError> {
  if corpus.verses_in_scope(&challenge.scope)?.contains(&question.ayah) {
    Ok(())
  } else {
    Err(QuizError::Validation(format!(
      "Question's ayah {} should be in the challenge scope ({})",
      question.ayah, challenge.scope
    )))
  }
}

/// Positional containment: group `i` must hold verse word `i` inside one of its
/// strings. The shorter of words/groups bounds the comparison.
fn group_contains(group: &Value, word: &str) -> bool {
  match group {
    Value::Array(items) => items.iter().any(|o| o.as_str().is_some_and(|s| s.contains(word))),
    Value::String(s) => s.contains(word),
    _ => false,
  }
}

fn check_answer_exists(corpus: &Corpus, mode: ChallengeMode, question: &Question) -> Result<(), QuizError> {
  let found = match mode {
    ChallengeMode::AyahBased => question
      .options
      .as_array()
      .is_some_and(|opts| opts.iter().any(|o| o.as_u64() == Some(u64::from(question.ayah)))),
    ChallengeMode::WordBased => {
      let verse = corpus.verse_by_id(question.ayah)?;
      question
        .options
        .as_array()
        .is_some_and(|groups| verse.words().zip(groups).all(|(word, group)| group_contains(group, word)))
    }
  };
  if found {
    Ok(())
  } else {
    Err(QuizError::Validation("The answer should exist in options".into()))
  }
}

fn has_shape(options: &Value, element_ok: fn(&Value) -> bool) -> bool {
  options
    .as_array()
    .is_some_and(|opts| opts.len() == NUMBER_OF_OPTIONS && opts.iter().all(element_ok))
}

fn is_integer(v: &Value) -> bool {
  v.is_i64() || v.is_u64()
}

fn check_option_shape(mode: ChallengeMode, options: &Value) -> Result<(), QuizError> {
  match mode {
    ChallengeMode::AyahBased if !has_shape(options, is_integer) => Err(QuizError::Validation(
      "Options of an ayah based question must look like [<ayah_id>, <ayah_id>, <ayah_id>, <ayah_id>]".into(),
    )),
    ChallengeMode::WordBased
      if !options
        .as_array()
        .is_some_and(|groups| groups.iter().all(|g| has_shape(g, Value::is_string))) =>
    {
      Err(QuizError::Validation(
        "Options of a word based question must look like [[\"w1\", \"w2\", \"w3\", \"w4\"], [\"w5\", \"w6\", \"w7\", \"w8\"], ...]"
          .into(),
      ))
    }
    _ => Ok(()),
  }
}
