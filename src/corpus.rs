//! Read-only corpus access: chapters and verses, loaded once from JSON at startup.
//!
//! Expected file shape:
//! ```json
//! { "chapters": [{ "number": 1, "name": "...", "english_name": "Al-Faatiha" }],
//!   "verses":   [{ "id": 1, "chapter": 1, "juz": 1, "number": 1, "text": "..." }] }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::{Chapter, Scope, ScopeVerses, Verse};
use crate::error::QuizError;

#[derive(Deserialize)]
struct CorpusFile {
  chapters: Vec<Chapter>,
  verses: Vec<Verse>,
}

/// Structural problems in corpus data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorpusError {
  #[error("verse {verse} references unknown chapter {chapter}")]
  UnknownChapter { verse: u32, chapter: u16 },
  #[error("duplicate verse id {0}")]
  DuplicateVerse(u32),
}

#[derive(Debug)]
pub struct Corpus {
  chapters: BTreeMap<u16, Chapter>,
  verses: Vec<Verse>,
  by_id: HashMap<u32, usize>,
}

impl Corpus {
  /// Build the corpus, rejecting verses of unknown chapters and duplicate ids.
  /// Verses are kept in id order.
  pub fn from_parts(chapters: Vec<Chapter>, mut verses: Vec<Verse>) -> Result<Self, CorpusError> {
    let chapters: BTreeMap<u16, Chapter> = chapters.into_iter().map(|c| (c.number, c)).collect();
    verses.sort_by_key(|v| v.id);

    let mut by_id = HashMap::with_capacity(verses.len());
    for (idx, v) in verses.iter().enumerate() {
      if !chapters.contains_key(&v.chapter) {
        return Err(CorpusError::UnknownChapter { verse: v.id, chapter: v.chapter });
      }
      if by_id.insert(v.id, idx).is_some() {
        return Err(CorpusError::DuplicateVerse(v.id));
      }
    }
    Ok(Self { chapters, verses, by_id })
  }

  #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
  pub fn load(path: impl AsRef<Path>) -> Result<Self, QuizError> {
    let path = path.as_ref();
    let startup = |reason: String| QuizError::Startup {
      what: "corpus",
      path: path.display().to_string(),
      reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| startup(e.to_string()))?;
    let file: CorpusFile = serde_json::from_str(&raw).map_err(|e| startup(e.to_string()))?;
    let corpus = Self::from_parts(file.chapters, file.verses).map_err(|e| startup(e.to_string()))?;
    info!(target: "hafizh_backend", chapters = corpus.chapters.len(), verses = corpus.verses.len(), "Corpus loaded");
    Ok(corpus)
  }

  pub fn verses(&self) -> &[Verse] {
    &self.verses
  }

  pub fn chapter(&self, number: u16) -> Option<&Chapter> {
    self.chapters.get(&number)
  }

  pub fn chapter_display_name(&self, verse: &Verse) -> &str {
    self.chapter(verse.chapter).map(|c| c.english_name.as_str()).unwrap_or_default()
  }

  pub fn verse_by_id(&self, id: u32) -> Result<&Verse, QuizError> {
    self.by_id
      .get(&id)
      .map(|&idx| &self.verses[idx])
      .ok_or_else(|| QuizError::NotFound(format!("ayah {} does not exist", id)))
  }

  /// Membership surface used by the validator.
  pub fn verses_in_scope(&self, scope: &Scope) -> Result<HashSet<u32>, QuizError> {
    Ok(scope.verses(self)?.into_iter().map(|v| v.id).collect())
  }

  /// Verses of the scope with strictly more than `min_length` characters.
  pub fn eligible_verses(&self, scope: &Scope, min_length: usize) -> Result<Vec<&Verse>, QuizError> {
    Ok(scope.verses(self)?.into_iter().filter(|v| v.text_len() > min_length).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::ScopeType;
  use crate::testutil::{chapter, sample_corpus, verse};
  use std::io::Write;

  #[test]
  fn eligible_verses_use_strict_character_threshold() {
    let corpus = Corpus::from_parts(
      vec![chapter(1, "Al-Faatiha")],
      vec![
        verse(1, 1, 1, 1, &"a".repeat(50)),
        verse(2, 1, 1, 2, &"b".repeat(51)),
        // 26 two-byte characters: long in bytes, short in characters
        verse(3, 1, 1, 3, &"ب".repeat(26)),
      ],
    )
    .unwrap();
    let eligible = corpus.eligible_verses(&Scope::new(ScopeType::Surah, 1), 50).unwrap();
    assert_eq!(eligible.iter().map(|v| v.id).collect::<Vec<_>>(), vec![2]);
  }

  #[test]
  fn verses_in_scope_covers_only_scope_members() {
    let corpus = sample_corpus();
    let ids = corpus.verses_in_scope(&Scope::new(ScopeType::Surah, 2)).unwrap();
    assert!(!ids.is_empty());
    for v in corpus.verses() {
      assert_eq!(ids.contains(&v.id), v.chapter == 2);
    }
  }

  #[test]
  fn verse_lookup_reports_missing_ids() {
    let corpus = sample_corpus();
    assert_eq!(corpus.verse_by_id(1).unwrap().id, 1);
    assert!(matches!(corpus.verse_by_id(10_000), Err(QuizError::NotFound(_))));
  }

  #[test]
  fn rejects_unknown_chapters_and_duplicate_ids() {
    let err = Corpus::from_parts(vec![chapter(1, "A")], vec![verse(1, 2, 1, 1, "x")]).unwrap_err();
    assert_eq!(err, CorpusError::UnknownChapter { verse: 1, chapter: 2 });
    let err = Corpus::from_parts(
      vec![chapter(1, "A")],
      vec![verse(1, 1, 1, 1, "x"), verse(1, 1, 1, 2, "y")],
    )
    .unwrap_err();
    assert_eq!(err, CorpusError::DuplicateVerse(1));
  }

  #[test]
  fn inconsistent_corpus_file_is_a_startup_error() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(
      f,
      r#"{{"chapters":[{{"number":1,"english_name":"Al-Faatiha"}}],
          "verses":[{{"id":1,"chapter":9,"juz":1,"number":1,"text":"x"}}]}}"#
    )
    .unwrap();
    match Corpus::load(f.path()).unwrap_err() {
      QuizError::Startup { what, reason, .. } => {
        assert_eq!(what, "corpus");
        assert_eq!(reason, "verse 1 references unknown chapter 9");
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[test]
  fn load_reads_json_file_and_fails_on_missing_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(
      f,
      r#"{{"chapters":[{{"number":1,"name":"x","english_name":"Al-Faatiha"}}],
          "verses":[{{"id":1,"chapter":1,"juz":1,"number":1,"text":"alhamdu lillahi"}}]}}"#
    )
    .unwrap();
    let corpus = Corpus::load(f.path()).unwrap();
    assert_eq!(corpus.chapter_display_name(corpus.verse_by_id(1).unwrap()), "Al-Faatiha");

    let missing = Corpus::load("/definitely/not/here.json").unwrap_err();
    assert!(matches!(missing, QuizError::Startup { what: "corpus", .. }));
  }
}
