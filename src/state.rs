//! Application state: corpus, oracles, the challenge store and the shared random stream.
//!
//! This module owns:
//!   - the corpus and both oracles (loaded once, read-only afterwards)
//!   - the question sequencer built on top of them
//!   - the in-memory challenge/question store
//!   - the RNG used for verse selection, backfill and shuffling
//!
//! Loading fails hard: without corpus and models the service must not serve.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::config::{AppConfig, QuizSettings};
use crate::corpus::Corpus;
use crate::domain::{QuizMode, Scope};
use crate::error::QuizError;
use crate::oracle::{LanguageOracle, NgramModel, SimilarityOracle, TfIdfModel};
use crate::sequencer::{QuestionSequencer, Quiz};
use crate::store::ChallengeStore;

pub struct AppState {
    pub sequencer: QuestionSequencer,
    pub store: ChallengeStore,
    rng: Mutex<StdRng>,
}

impl AppState {
    /// Load corpus and models named by the config and build the state.
    #[instrument(level = "info", skip_all)]
    pub fn load(cfg: &AppConfig) -> Result<Self, QuizError> {
        let corpus = Corpus::load(&cfg.data.corpus_path)?;
        let language = NgramModel::load(&cfg.data.language_model_path)?;
        let similarity = TfIdfModel::load(&cfg.data.similarity_model_path)?.index(corpus.verses());
        Ok(Self::new(
            Arc::new(corpus),
            Arc::new(language),
            Arc::new(similarity),
            cfg.quiz.clone(),
        ))
    }

    pub fn new(
        corpus: Arc<Corpus>,
        language: Arc<dyn LanguageOracle>,
        similarity: Arc<dyn SimilarityOracle>,
        settings: QuizSettings,
    ) -> Self {
        let rng = match settings.rng_seed {
            Some(seed) => {
                info!(target: "hafizh_backend", seed, "Using seeded RNG");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        Self {
            store: ChallengeStore::new(corpus.clone()),
            sequencer: QuestionSequencer::new(corpus, language, similarity, settings),
            rng: Mutex::new(rng),
        }
    }

    /// Generate a quiz with the shared random stream.
    pub async fn generate(&self, mode: QuizMode, scope: &Scope) -> Result<Quiz, QuizError> {
        let mut rng = self.rng.lock().await;
        self.sequencer.generate(&mut *rng, mode, scope)
    }
}
