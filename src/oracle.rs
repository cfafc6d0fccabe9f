//! Statistical oracles consulted for distractors.
//!
//! Both models are trained elsewhere and shipped as JSON; they are loaded once at
//! startup and only read afterwards. The sequencer sees them through the
//! `LanguageOracle` / `SimilarityOracle` traits so tests can swap in stubs.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::domain::Verse;
use crate::error::QuizError;

/// A candidate next token with its score. Higher is more likely.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
  pub token: String,
  pub score: f64,
}

pub trait LanguageOracle: Send + Sync {
  /// Ranked next-token candidates for `prefix`, best first. May be empty.
  fn predict_next(&self, prefix: &str) -> Vec<Prediction>;
}

#[derive(Clone, Debug)]
pub struct SimilarMatch<'a> {
  pub score: f64,
  pub verse: &'a Verse,
}

pub trait SimilarityOracle: Send + Sync {
  /// At most `n` candidates ranked by similarity to `query`, best first.
  /// Equal scores keep the order of `candidates`.
  fn top_matches<'a>(&self, query: &str, candidates: &[&'a Verse], n: usize) -> Vec<SimilarMatch<'a>>;
}

fn load_json<T: DeserializeOwned>(what: &'static str, path: &Path) -> Result<T, QuizError> {
  let startup = |reason: String| QuizError::Startup { what, path: path.display().to_string(), reason };
  let raw = std::fs::read_to_string(path).map_err(|e| startup(e.to_string()))?;
  serde_json::from_str(&raw).map_err(|e| startup(e.to_string()))
}

/// Back-off n-gram next-word model.
///
/// `counts` maps a space-joined context (the last `order - 1` words or fewer,
/// down to the empty context) to next-token counts.
#[derive(Clone, Debug, Deserialize)]
pub struct NgramModel {
  pub order: usize,
  pub counts: HashMap<String, HashMap<String, u64>>,
}

impl NgramModel {
  #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
  pub fn load(path: impl AsRef<Path>) -> Result<Self, QuizError> {
    let path = path.as_ref();
    let model: NgramModel = load_json("language model", path)?;
    if model.order < 1 {
      return Err(QuizError::Startup {
        what: "language model",
        path: path.display().to_string(),
        reason: "order must be at least 1".into(),
      });
    }
    info!(target: "hafizh_backend", order = model.order, contexts = model.counts.len(), "Language model loaded");
    Ok(model)
  }
}

impl LanguageOracle for NgramModel {
  fn predict_next(&self, prefix: &str) -> Vec<Prediction> {
    let words: Vec<&str> = prefix.split_whitespace().collect();
    let longest = self.order.saturating_sub(1).min(words.len());

    for n in (0..=longest).rev() {
      let context = words[words.len() - n..].join(" ");
      let Some(next) = self.counts.get(&context) else { continue };
      let total: u64 = next.values().sum();
      if total == 0 {
        continue;
      }
      let mut ranked: Vec<Prediction> = next
        .iter()
        .map(|(token, &count)| Prediction { token: token.clone(), score: count as f64 / total as f64 })
        .collect();
      ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.token.cmp(&b.token)));
      debug!(target: "quiz", context_words = n, candidates = ranked.len(), "n-gram prediction");
      return ranked;
    }
    Vec::new()
  }
}

/// Weighted term vector with its norm cached.
#[derive(Clone, Debug)]
struct TermVector {
  weights: HashMap<String, f64>,
  norm: f64,
}

impl TermVector {
  fn cosine(&self, other: &TermVector) -> f64 {
    let denom = self.norm * other.norm;
    if denom == 0.0 {
      return 0.0;
    }
    let dot: f64 = self.weights.iter().filter_map(|(t, x)| other.weights.get(t).map(|y| x * y)).sum();
    dot / denom
  }
}

/// TF-IDF cosine ranker over whitespace tokens.
///
/// Verse vectors are built once by `index`; candidates missing from the
/// index are vectorized on the fly.
#[derive(Clone, Debug, Deserialize)]
pub struct TfIdfModel {
  pub idf: HashMap<String, f64>,
  /// Weight for terms absent from `idf`.
  #[serde(default = "default_idf")]
  pub default_idf: f64,
  #[serde(skip)]
  indexed: HashMap<u32, TermVector>,
}

fn default_idf() -> f64 {
  1.0
}

impl TfIdfModel {
  #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
  pub fn load(path: impl AsRef<Path>) -> Result<Self, QuizError> {
    let model: TfIdfModel = load_json("similarity model", path.as_ref())?;
    info!(target: "hafizh_backend", terms = model.idf.len(), "Similarity model loaded");
    Ok(model)
  }

  /// Precompute the vectors of `verses`, keyed by verse id.
  pub fn index(mut self, verses: &[Verse]) -> Self {
    let indexed = verses.iter().map(|v| (v.id, self.vectorize(&v.text))).collect();
    self.indexed = indexed;
    info!(target: "hafizh_backend", verses = self.indexed_len(), "Similarity index built");
    self
  }

  pub fn indexed_len(&self) -> usize {
    self.indexed.len()
  }

  fn vectorize(&self, text: &str) -> TermVector {
    let mut weights: HashMap<String, f64> = HashMap::new();
    for term in text.split_whitespace() {
      *weights.entry(term.to_string()).or_default() += 1.0;
    }
    for (term, weight) in weights.iter_mut() {
      *weight *= self.idf.get(term).copied().unwrap_or(self.default_idf);
    }
    let norm = weights.values().map(|x| x * x).sum::<f64>().sqrt();
    TermVector { weights, norm }
  }
}

impl SimilarityOracle for TfIdfModel {
  fn top_matches<'a>(&self, query: &str, candidates: &[&'a Verse], n: usize) -> Vec<SimilarMatch<'a>> {
    let q = self.vectorize(query);
    let mut scored: Vec<SimilarMatch<'a>> = candidates
      .iter()
      .map(|&verse| {
        let score = match self.indexed.get(&verse.id) {
          Some(v) => q.cosine(v),
          None => q.cosine(&self.vectorize(&verse.text)),
        };
        SimilarMatch { score, verse }
      })
      .collect();
    // stable: ties stay in corpus order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(n);
    scored
  }
}
