//! Test fixtures: a tiny corpus and deterministic stand-ins for the oracles.

use std::sync::{Arc, Mutex};

use crate::config::QuizSettings;
use crate::corpus::Corpus;
use crate::domain::{Chapter, Verse};
use crate::oracle::{LanguageOracle, Prediction, SimilarMatch, SimilarityOracle};
use crate::sequencer::QuestionSequencer;

pub fn chapter(number: u16, english_name: &str) -> Chapter {
  Chapter { number, name: String::new(), english_name: english_name.into() }
}

pub fn verse(id: u32, chapter: u16, juz: u16, number: u16, text: &str) -> Verse {
  Verse { id, chapter, juz, number, text: text.into() }
}

/// Three surahs over three juz. Only verses 2, 5, 6 and 7 are longer than 50
/// characters; verse 7 is the last of the corpus.
pub fn sample_corpus() -> Corpus {
  Corpus::from_parts(
    vec![chapter(1, "Al-Faatiha"), chapter(2, "Al-Baqara"), chapter(3, "Aal-i-Imraan")],
    vec![
      verse(1, 1, 1, 1, "bismi allahi alrrahmani alrraheemi"),
      verse(2, 1, 1, 2, "alhamdu lillahi rabbi alaalameena alrrahmani alrraheemi maliki yawmi alddeeni"),
      verse(3, 1, 1, 3, "iyyaka naabudu"),
      verse(4, 2, 1, 1, "alif lam meem"),
      verse(5, 2, 1, 2, "thalika alkitabu la rayba feehi hudan lilmuttaqeena"),
      verse(6, 2, 2, 3, "allatheena yuminoona bialghaybi wayuqeemoona alssalata wamimma razaqnahum yunfiqoona"),
      verse(7, 3, 3, 1, "alif lam meem allahu la ilaha illa huwa alhayyu alqayyoomu nazzala alaykal kitaba"),
    ],
  )
  .expect("fixture corpus is consistent")
}

/// Returns the same ranked tokens for every prefix and records each prefix.
pub struct FixedLanguage {
  tokens: Vec<String>,
  prompts: Mutex<Vec<String>>,
}

impl FixedLanguage {
  pub fn new(tokens: &[&str]) -> Self {
    Self { tokens: tokens.iter().map(|t| t.to_string()).collect(), prompts: Mutex::new(Vec::new()) }
  }

  pub fn prompts(&self) -> Vec<String> {
    self.prompts.lock().unwrap().clone()
  }
}

impl LanguageOracle for FixedLanguage {
  fn predict_next(&self, prefix: &str) -> Vec<Prediction> {
    self.prompts.lock().unwrap().push(prefix.to_string());
    let n = self.tokens.len();
    self.tokens
      .iter()
      .enumerate()
      .map(|(i, t)| Prediction { token: t.clone(), score: (n - i) as f64 })
      .collect()
  }
}

/// Ranks candidates in corpus order.
pub struct CorpusOrder;

impl SimilarityOracle for CorpusOrder {
  fn top_matches<'a>(&self, _query: &str, candidates: &[&'a Verse], n: usize) -> Vec<SimilarMatch<'a>> {
    candidates.iter().take(n).map(|&verse| SimilarMatch { score: 1.0, verse }).collect()
  }
}

pub fn sequencer_with(language: Arc<dyn LanguageOracle>) -> QuestionSequencer {
  QuestionSequencer::new(Arc::new(sample_corpus()), language, Arc::new(CorpusOrder), QuizSettings::default())
}

pub fn sample_sequencer() -> QuestionSequencer {
  sequencer_with(Arc::new(FixedLanguage::new(&["maliki", "rabbi", "alrrahmani", "wa"])))
}
