//! Domain models: verses and chapters of the corpus, quiz scopes, challenges and questions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::error::QuizError;

/// Every option set, generated or authored, holds exactly this many entries.
pub const NUMBER_OF_OPTIONS: usize = 4;

/// One ayah. `id` is global and sequential across the whole corpus,
/// `number` is the position inside its chapter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verse {
  pub id: u32,
  pub chapter: u16,
  pub juz: u16,
  pub number: u16,
  pub text: String,
}

impl Verse {
  pub fn words(&self) -> impl Iterator<Item = &str> {
    self.text.split_whitespace()
  }

  /// Length in characters, not bytes.
  pub fn text_len(&self) -> usize {
    self.text.chars().count()
  }
}

/// A surah.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
  pub number: u16,
  #[serde(default)]
  pub name: String,
  pub english_name: String,
}

/// Granularity named by a request or a stored challenge.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
  Juz,
  Surah,
}

impl FromStr for ScopeType {
  type Err = QuizError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "juz" => Ok(ScopeType::Juz),
      "surah" => Ok(ScopeType::Surah),
      _ => Err(QuizError::Input("type must either 'juz' or 'surah'".into())),
    }
  }
}

impl<'de> Deserialize<'de> for ScopeType {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    String::deserialize(deserializer)?.parse().map_err(serde::de::Error::custom)
  }
}

/// Yields the verses a scope covers.
pub trait ScopeVerses {
  fn verses<'c>(&self, corpus: &'c Corpus) -> Result<Vec<&'c Verse>, QuizError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChapterScope {
  pub number: u16,
}

impl ScopeVerses for ChapterScope {
  fn verses<'c>(&self, corpus: &'c Corpus) -> Result<Vec<&'c Verse>, QuizError> {
    if corpus.chapter(self.number).is_none() {
      return Err(QuizError::NotFound(format!("surah {} does not exist", self.number)));
    }
    Ok(corpus.verses().iter().filter(|v| v.chapter == self.number).collect())
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubdivisionScope {
  pub number: u16,
}

impl ScopeVerses for SubdivisionScope {
  fn verses<'c>(&self, corpus: &'c Corpus) -> Result<Vec<&'c Verse>, QuizError> {
    let verses: Vec<&Verse> = corpus.verses().iter().filter(|v| v.juz == self.number).collect();
    if verses.is_empty() {
      return Err(QuizError::NotFound(format!("juz {} does not exist", self.number)));
    }
    Ok(verses)
  }
}

/// What a challenge (or a one-off quiz request) is restricted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "ScopeRef", try_from = "ScopeRef")]
pub enum Scope {
  Chapter(ChapterScope),
  Subdivision(SubdivisionScope),
}

impl Scope {
  pub fn new(scope_type: ScopeType, id: u16) -> Self {
    match scope_type {
      ScopeType::Surah => Scope::Chapter(ChapterScope { number: id }),
      ScopeType::Juz => Scope::Subdivision(SubdivisionScope { number: id }),
    }
  }

  pub fn scope_type(&self) -> ScopeType {
    match self {
      Scope::Chapter(_) => ScopeType::Surah,
      Scope::Subdivision(_) => ScopeType::Juz,
    }
  }

  pub fn id(&self) -> u16 {
    match self {
      Scope::Chapter(s) => s.number,
      Scope::Subdivision(s) => s.number,
    }
  }
}

impl ScopeVerses for Scope {
  fn verses<'c>(&self, corpus: &'c Corpus) -> Result<Vec<&'c Verse>, QuizError> {
    match self {
      Scope::Chapter(s) => s.verses(corpus),
      Scope::Subdivision(s) => s.verses(corpus),
    }
  }
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Scope::Chapter(s) => write!(f, "surah {}", s.number),
      Scope::Subdivision(s) => write!(f, "juz {}", s.number),
    }
  }
}

/// Wire/persisted form of a scope: `{"scope_type": "surah", "scope_id": 2}`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ScopeRef {
  pub scope_type: ScopeType,
  pub scope_id: u16,
}

impl From<Scope> for ScopeRef {
  fn from(s: Scope) -> Self {
    ScopeRef { scope_type: s.scope_type(), scope_id: s.id() }
  }
}

impl TryFrom<ScopeRef> for Scope {
  type Error = QuizError;

  fn try_from(r: ScopeRef) -> Result<Self, Self::Error> {
    if r.scope_id == 0 {
      return Err(QuizError::Input("scope id must be a positive integer".into()));
    }
    Ok(Scope::new(r.scope_type, r.scope_id))
  }
}

/// Fixed at challenge creation; drives both generation and validation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChallengeMode {
  /// Pick the ayah that follows; options are ayah ids.
  #[serde(rename = "ayah")]
  AyahBased,
  /// Rebuild the ayah word by word; options are groups of words.
  #[serde(rename = "word")]
  WordBased,
}

impl ChallengeMode {
  pub fn quiz_mode(self) -> QuizMode {
    match self {
      ChallengeMode::AyahBased => QuizMode::Verse,
      ChallengeMode::WordBased => QuizMode::Word,
    }
  }
}

/// Mode of a generation request.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
  Word,
  Verse,
}

impl FromStr for QuizMode {
  type Err = QuizError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "word" => Ok(QuizMode::Word),
      "verse" => Ok(QuizMode::Verse),
      _ => Err(QuizError::Input("mode must either 'verse' or 'word'".into())),
    }
  }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Challenge {
  pub id: String,
  /// Cleared (not cascaded) when the owner goes away.
  pub owner: Option<String>,
  pub is_public: bool,
  pub mode: ChallengeMode,
  #[serde(flatten)]
  pub scope: Scope,
}

/// An authored question. `options` keeps whatever JSON the author sent;
/// its shape is only trusted after validation.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Question {
  pub id: String,
  pub challenge_id: String,
  pub ayah: u32,
  pub options: serde_json::Value,
}

/// One entry of a generated option set.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
  pub text: String,
  pub is_correct: bool,
  pub selected: bool,
}

impl AnswerOption {
  pub fn correct(text: impl Into<String>) -> Self {
    Self { text: text.into(), is_correct: true, selected: false }
  }

  pub fn distractor(text: impl Into<String>) -> Self {
    Self { text: text.into(), is_correct: false, selected: false }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil::sample_corpus;

  #[test]
  fn scope_type_and_mode_parse_case_insensitively() {
    assert_eq!("SURAH".parse::<ScopeType>().unwrap(), ScopeType::Surah);
    assert_eq!("Juz".parse::<ScopeType>().unwrap(), ScopeType::Juz);
    assert_eq!("Verse".parse::<QuizMode>().unwrap(), QuizMode::Verse);
    assert!(matches!("chapter".parse::<ScopeType>(), Err(QuizError::Input(_))));
    assert!(matches!("sentence".parse::<QuizMode>(), Err(QuizError::Input(_))));
  }

  #[test]
  fn chapter_and_subdivision_scopes_resolve_their_verses() {
    let corpus = sample_corpus();
    let surah = Scope::new(ScopeType::Surah, 1).verses(&corpus).unwrap();
    assert!(surah.iter().all(|v| v.chapter == 1));
    assert!(!surah.is_empty());

    let juz = Scope::new(ScopeType::Juz, 1).verses(&corpus).unwrap();
    assert_eq!(juz.len(), corpus.verses().iter().filter(|v| v.juz == 1).count());
  }

  #[test]
  fn unknown_scope_instances_are_not_found() {
    let corpus = sample_corpus();
    assert!(matches!(Scope::new(ScopeType::Surah, 99).verses(&corpus), Err(QuizError::NotFound(_))));
    assert!(matches!(Scope::new(ScopeType::Juz, 30).verses(&corpus), Err(QuizError::NotFound(_))));
  }

  #[test]
  fn challenge_serializes_flat_scope_reference() {
    let ch = Challenge {
      id: "c1".into(),
      owner: None,
      is_public: true,
      mode: ChallengeMode::WordBased,
      scope: Scope::new(ScopeType::Surah, 2),
    };
    let v = serde_json::to_value(&ch).unwrap();
    assert_eq!(v["mode"], "word");
    assert_eq!(v["scope_type"], "surah");
    assert_eq!(v["scope_id"], 2);
    assert!(v["owner"].is_null());
  }

  #[test]
  fn scope_reference_rejects_zero_id() {
    let scope: Scope = serde_json::from_str(r#"{"scope_type":"surah","scope_id":2}"#).unwrap();
    assert_eq!(scope, Scope::new(ScopeType::Surah, 2));
    let err = serde_json::from_str::<Scope>(r#"{"scope_type":"juz","scope_id":0}"#).unwrap_err();
    assert!(err.to_string().contains("positive"));
  }

  #[test]
  fn answer_option_uses_frontend_field_names() {
    let v = serde_json::to_value(AnswerOption::correct("rabbi")).unwrap();
    assert_eq!(v, serde_json::json!({ "text": "rabbi", "isCorrect": true, "selected": false }));
  }
}
