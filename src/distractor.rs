//! Distractor synthesis: turn a ranked candidate stream into a shuffled option set
//! holding the correct answer once plus up to `NUMBER_OF_OPTIONS - 1` distinct distractors.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{AnswerOption, NUMBER_OF_OPTIONS};

fn contains_text(options: &[AnswerOption], text: &str) -> bool {
  options.iter().any(|o| o.text == text)
}

/// Build an option set for `correct`.
///
/// Candidates are taken in rank order, skipping exact (case-sensitive) text
/// duplicates, so a candidate equal to the correct answer is dropped. If the
/// stream runs dry and a `backfill` pool is given, the remainder is drawn
/// without replacement from it. The result is shuffled.
///
/// Without backfill the set can come out short when the stream has fewer
/// distinct alternatives than needed.
pub fn synthesize<R, I>(rng: &mut R, correct: &str, candidates: I, backfill: Option<&[&str]>) -> Vec<AnswerOption>
where
  R: Rng + ?Sized,
  I: IntoIterator<Item = String>,
{
  let mut options = vec![AnswerOption::correct(correct)];

  for candidate in candidates {
    if options.len() == NUMBER_OF_OPTIONS {
      break;
    }
    if contains_text(&options, &candidate) {
      continue;
    }
    options.push(AnswerOption::distractor(candidate));
  }

  if let Some(pool) = backfill {
    if options.len() < NUMBER_OF_OPTIONS {
      let mut pool = pool.to_vec();
      pool.shuffle(rng);
      for word in pool {
        if options.len() == NUMBER_OF_OPTIONS {
          break;
        }
        if !contains_text(&options, word) {
          options.push(AnswerOption::distractor(word));
        }
      }
    }
  }

  options.shuffle(rng);
  options
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use std::collections::HashSet;

  fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
  }

  fn assert_well_formed(options: &[AnswerOption], correct: &str) {
    assert_eq!(options.len(), NUMBER_OF_OPTIONS);
    let correct_opts: Vec<_> = options.iter().filter(|o| o.is_correct).collect();
    assert_eq!(correct_opts.len(), 1);
    assert_eq!(correct_opts[0].text, correct);
    let unique: HashSet<_> = options.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(unique.len(), options.len());
    assert!(options.iter().all(|o| !o.selected));
  }

  #[test]
  fn takes_top_ranked_candidates_and_stops_at_four() {
    let mut rng = StdRng::seed_from_u64(7);
    let opts = synthesize(&mut rng, "rabbi", strings(&["a", "b", "c", "d", "e"]), None);
    assert_well_formed(&opts, "rabbi");
    let texts: HashSet<_> = opts.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, HashSet::from(["rabbi", "a", "b", "c"]));
  }

  #[test]
  fn candidate_equal_to_answer_is_dropped() {
    let mut rng = StdRng::seed_from_u64(1);
    let opts = synthesize(&mut rng, "rabbi", strings(&["rabbi", "a", "a", "b", "c"]), None);
    assert_well_formed(&opts, "rabbi");
    assert!(opts.iter().any(|o| o.text == "c"));
  }

  #[test]
  fn dedup_is_case_sensitive() {
    let mut rng = StdRng::seed_from_u64(2);
    let opts = synthesize(&mut rng, "Rabbi", strings(&["rabbi", "x", "y"]), None);
    assert_well_formed(&opts, "Rabbi");
    assert!(opts.iter().any(|o| o.text == "rabbi" && !o.is_correct));
  }

  #[test]
  fn backfills_from_pool_without_repeats() {
    let pool = ["alhamdu", "lillahi", "rabbi", "alhamdu"];
    for seed in 0..20 {
      let mut rng = StdRng::seed_from_u64(seed);
      let opts = synthesize(&mut rng, "alaalameena", strings(&["rabbi"]), Some(&pool[..]));
      assert_well_formed(&opts, "alaalameena");
      assert!(opts.iter().all(|o| o.is_correct || pool.contains(&o.text.as_str())));
    }
  }

  #[test]
  fn without_backfill_a_short_stream_gives_a_short_set() {
    let mut rng = StdRng::seed_from_u64(3);
    let opts = synthesize(&mut rng, "verse", strings(&["other"]), None);
    assert_eq!(opts.len(), 2);
  }

  #[test]
  fn shuffle_moves_the_correct_answer_around() {
    let mut positions = HashSet::new();
    for seed in 0..40 {
      let mut rng = StdRng::seed_from_u64(seed);
      let opts = synthesize(&mut rng, "w", strings(&["a", "b", "c"]), None);
      positions.insert(opts.iter().position(|o| o.is_correct).unwrap());
    }
    assert_eq!(positions.len(), NUMBER_OF_OPTIONS);
  }
}
