//! Loading service configuration (data file locations + quiz tuning) from TOML.
//!
//! See `AppConfig` for the expected schema. Every field has a default, so an
//! absent file is equivalent to an empty one.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct AppConfig {
  #[serde(default)]
  pub data: DataPaths,
  #[serde(default)]
  pub quiz: QuizSettings,
}

/// Corpus and model files. All of them must load or the service refuses to start.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataPaths {
  pub corpus_path: PathBuf,
  pub language_model_path: PathBuf,
  pub similarity_model_path: PathBuf,
}

impl Default for DataPaths {
  fn default() -> Self {
    Self {
      corpus_path: "machinelearning/corpus.json".into(),
      language_model_path: "machinelearning/ngram_model.json".into(),
      similarity_model_path: "machinelearning/tfidf_model.json".into(),
    }
  }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuizSettings {
  /// Verses need strictly more characters than this to be quizzed on.
  pub min_verse_length: usize,
  /// Words shown before the first word question.
  pub prompt_words: usize,
  /// Similar verses requested as distractors in verse mode.
  pub verse_alternatives: usize,
  /// Fixed seed for reproducible generation; entropy when absent.
  pub rng_seed: Option<u64>,
}

impl Default for QuizSettings {
  fn default() -> Self {
    Self { min_verse_length: 50, prompt_words: 4, verse_alternatives: 3, rng_seed: None }
  }
}

/// Parse a TOML document into `AppConfig`.
pub fn parse_config(s: &str) -> Result<AppConfig, String> {
  let cfg = toml::from_str::<AppConfig>(s).map_err(|e| e.to_string())?;
  if cfg.quiz.prompt_words == 0 {
    return Err("quiz.prompt_words must be at least 1".into());
  }
  Ok(cfg)
}

/// Attempt to load `AppConfig` from APP_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("APP_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "hafizh_backend", %path, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "hafizh_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "hafizh_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_yields_defaults() {
    let cfg = parse_config("").unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.quiz.min_verse_length, 50);
    assert_eq!(cfg.quiz.prompt_words, 4);
    assert_eq!(cfg.quiz.verse_alternatives, 3);
  }

  #[test]
  fn partial_sections_keep_remaining_defaults() {
    let cfg = parse_config(
      r#"
        [data]
        corpus_path = "/srv/quran/corpus.json"

        [quiz]
        rng_seed = 42
      "#,
    )
    .unwrap();
    assert_eq!(cfg.data.corpus_path, PathBuf::from("/srv/quran/corpus.json"));
    assert_eq!(cfg.data.language_model_path, DataPaths::default().language_model_path);
    assert_eq!(cfg.quiz.rng_seed, Some(42));
    assert_eq!(cfg.quiz.min_verse_length, 50);
  }

  #[test]
  fn zero_prompt_words_is_rejected() {
    assert!(parse_config("[quiz]\nprompt_words = 0").is_err());
    assert!(parse_config("[quiz]\nprompt_words = \"four\"").is_err());
  }
}
