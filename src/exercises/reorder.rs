//! Word-order drill with five scrambling sub-levels.
//!
//! | sub-level | shuffled unit           | source                       |
//! |-----------|-------------------------|------------------------------|
//! | 1         | words within each line  | one stanza                   |
//! | 2         | words within each line  | one stanza, lines shuffled   |
//! | 3         | one bag of words        | one stanza                   |
//! | 4         | words within each line  | first two stanzas            |
//! | 5         | one bag of words        | first two stanzas            |
//!
//! The sub-level is a progression axis of its own. It moves up when the
//! stanza cursor runs through the corpus or enough stanzas are solved, and
//! moves down by one when the tracker reports exhausted lives. Level and lives
//! themselves are only ever changed through the tracker.

use std::sync::Arc;

use rand::{rngs::StdRng, seq::SliceRandom, Rng};
use tracing::{debug, info, instrument, warn};

use crate::domain::{AttemptEffect, Corpus, LineStructure};
use crate::error::DrillError;
use crate::exercises::{Checked, Exercise};
use crate::progress::ProgressTracker;
use crate::util::{extract_words, non_empty_lines};

pub const MAX_SUB_LEVEL: u8 = 5;
/// From sub-level 3 up, this many solved stanzas advance the sub-level.
const STANZAS_PER_BAG_ROUND: usize = 3;

pub fn is_line_based(sub_level: u8) -> bool {
  matches!(sub_level, 1 | 2 | 4)
}

/// Returns `(original, shuffled)` for `source` at `sub_level`.
pub fn build_reorder_task<R: Rng + ?Sized>(source: &str, sub_level: u8, rng: &mut R) -> (LineStructure, LineStructure) {
  if is_line_based(sub_level) {
    let mut lines = non_empty_lines(source);
    if sub_level == 2 {
      lines.shuffle(rng);
    }
    let original: Vec<Vec<String>> = lines.iter().map(|l| extract_words(l)).collect();
    let shuffled = original
      .iter()
      .map(|words| {
        let mut words = words.clone();
        words.shuffle(rng);
        words
      })
      .collect();
    (LineStructure::Lines(original), LineStructure::Lines(shuffled))
  } else {
    let original = extract_words(source);
    let mut shuffled = original.clone();
    shuffled.shuffle(rng);
    (LineStructure::Bag(original), LineStructure::Bag(shuffled))
  }
}

pub struct ReorderPuzzle {
  corpus: Arc<Corpus>,
  sub_level: u8,
  cursor: usize,
  completed: usize,
  original: LineStructure,
  shuffled: LineStructure,
  tracker: ProgressTracker,
  rng: StdRng,
}

impl ReorderPuzzle {
  pub fn new(corpus: Arc<Corpus>, rng: StdRng) -> Self {
    let mut puzzle = Self {
      corpus,
      sub_level: 1,
      cursor: 0,
      completed: 0,
      original: LineStructure::Lines(Vec::new()),
      shuffled: LineStructure::Lines(Vec::new()),
      tracker: ProgressTracker::new(),
      rng,
    };
    puzzle.prepare_task();
    puzzle
  }

  pub fn sub_level(&self) -> u8 { self.sub_level }
  pub fn completed(&self) -> usize { self.completed }
  pub fn shuffled(&self) -> &LineStructure { &self.shuffled }
  pub fn original(&self) -> &LineStructure { &self.original }

  fn advance_sub_level(&mut self) {
    self.sub_level = (self.sub_level + 1).min(MAX_SUB_LEVEL);
    self.cursor = 0;
    self.completed = 0;
    info!(target: "drill", sub_level = self.sub_level, "Reorder sub-level advanced");
  }

  fn lower_sub_level(&mut self) {
    self.sub_level = self.sub_level.saturating_sub(1).max(1);
    self.cursor = 0;
    self.completed = 0;
    info!(target: "drill", sub_level = self.sub_level, "Reorder sub-level lowered");
  }

  /// Exact reconstruction check. No side effects.
  pub fn matches(&self, answer: &LineStructure) -> Result<bool, DrillError> {
    match (&self.original, answer) {
      (LineStructure::Lines(original), LineStructure::Lines(given)) if original.len() == given.len() => {
        Ok(original == given)
      }
      (LineStructure::Bag(original), LineStructure::Bag(given)) => Ok(original == given),
      _ => Err(DrillError::InvalidAnswerShape {
        expected: self.original.shape(),
        got: answer.shape(),
      }),
    }
  }

  #[instrument(level = "debug", skip(self, answer), fields(sub_level = self.sub_level, words = answer.word_count()))]
  pub fn check_answer(&mut self, answer: &LineStructure) -> Checked {
    let correct = match self.matches(answer) {
      Ok(ok) => ok,
      Err(e) => {
        warn!(target: "drill", error = %e, "Reorder answer rejected");
        false
      }
    };
    let mut effect = self.tracker.record_attempt(correct);

    if correct {
      self.completed += 1;
      let round_done = if self.sub_level < 3 {
        self.completed == self.corpus.len()
      } else {
        self.completed >= STANZAS_PER_BAG_ROUND
      };
      if round_done {
        // The streak rule may already have leveled up on this attempt.
        if effect != AttemptEffect::LevelUp {
          self.tracker.level_up();
          effect = AttemptEffect::LevelUp;
        }
        self.advance_sub_level();
      }
    } else if let AttemptEffect::LivesExhausted { .. } = effect {
      self.lower_sub_level();
    }

    info!(target: "drill", exercise = "reorder", %correct, sub_level = self.sub_level, completed = self.completed, level = self.tracker.level(), "Reorder answer checked");
    Checked { correct, effect }
  }
}

impl Exercise for ReorderPuzzle {
  fn prepare_task(&mut self) {
    if self.cursor >= self.corpus.len() {
      debug!(target: "drill", "Stanza cursor ran through the corpus");
      self.advance_sub_level();
    }

    let source = if self.sub_level < 4 {
      let stanza = self.corpus.stanzas()[self.cursor].clone();
      self.cursor += 1;
      stanza
    } else {
      self.corpus.first_two_joined()
    };

    let (original, shuffled) = build_reorder_task(&source, self.sub_level, &mut self.rng);
    self.original = original;
    self.shuffled = shuffled;
    debug!(target: "drill", sub_level = self.sub_level, cursor = self.cursor, words = self.original.word_count(), "Reorder task prepared");
  }

  fn progress(&self) -> &ProgressTracker {
    &self.tracker
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;

  const TWO_LINES: &str = "Мороз и солнце; день чудесный!\nЕще ты дремлешь, друг прелестный";

  fn puzzle(stanzas: &[&str], seed: u64) -> ReorderPuzzle {
    let corpus = Corpus::new(stanzas.iter().map(|s| s.to_string()).collect()).unwrap();
    ReorderPuzzle::new(Arc::new(corpus), StdRng::seed_from_u64(seed))
  }

  fn sorted(mut words: Vec<String>) -> Vec<String> {
    words.sort();
    words
  }

  fn solve(p: &mut ReorderPuzzle) -> Checked {
    let answer = p.original().clone();
    p.check_answer(&answer)
  }

  fn fail(p: &mut ReorderPuzzle) -> Checked {
    p.check_answer(&LineStructure::Bag(vec!["нет".into()]))
  }

  #[test]
  fn sub_level_one_shuffles_inside_lines_only() {
    for seed in 0..10 {
      let p = puzzle(&[TWO_LINES], seed);
      assert_eq!(p.sub_level(), 1);
      let (LineStructure::Lines(original), LineStructure::Lines(shuffled)) = (p.original(), p.shuffled()) else {
        panic!("sub-level 1 must be line based");
      };
      assert_eq!(original.len(), 2);
      assert_eq!(original[0], extract_words("Мороз и солнце; день чудесный!"));
      assert_eq!(original[1], extract_words("Еще ты дремлешь, друг прелестный"));
      for (o, s) in original.iter().zip(shuffled) {
        assert_eq!(sorted(o.clone()), sorted(s.clone()));
      }
    }
  }

  #[test]
  fn original_order_passes_and_any_swap_fails() {
    let p = puzzle(&[TWO_LINES], 4);
    assert_eq!(p.matches(p.original()), Ok(true));

    let LineStructure::Lines(original) = p.original().clone() else { unreachable!() };
    for line in 0..original.len() {
      for i in 0..original[line].len() {
        for j in (i + 1)..original[line].len() {
          let mut swapped = original.clone();
          swapped[line].swap(i, j);
          assert_eq!(p.matches(&LineStructure::Lines(swapped)), Ok(false));
        }
      }
    }
  }

  #[test]
  fn shape_mismatch_is_rejected_as_wrong() {
    let mut p = puzzle(&[TWO_LINES], 4);
    let LineStructure::Lines(original) = p.original().clone() else { unreachable!() };
    let one_line = LineStructure::Lines(vec![original[0].clone()]);
    assert!(matches!(p.matches(&one_line), Err(DrillError::InvalidAnswerShape { .. })));
    assert!(!p.check_answer(&one_line).correct);
    assert_eq!(p.progress().lives(), 1);
  }

  #[test]
  fn exhausted_cursor_advances_sub_level() {
    let mut p = puzzle(&["раз два", "три четыре"], 1);
    assert_eq!((p.sub_level(), p.cursor), (1, 1));
    p.prepare_task();
    assert_eq!((p.sub_level(), p.cursor), (1, 2));
    p.prepare_task();
    assert_eq!((p.sub_level(), p.cursor), (2, 1));
    assert_eq!(p.progress().level(), 1);
  }

  #[test]
  fn sub_level_two_answer_follows_shuffled_line_order() {
    let mut p = puzzle(&["раз два\nтри четыре\nпять шесть"], 2);
    p.prepare_task();
    assert_eq!(p.sub_level(), 2);
    let LineStructure::Lines(original) = p.original() else { panic!("line based") };
    assert_eq!(sorted(original.iter().flatten().cloned().collect()).len(), 6);
    assert!(solve(&mut p).correct);
  }

  #[test]
  fn solving_every_stanza_levels_up_and_advances() {
    let mut p = puzzle(&["раз два", "три четыре"], 8);
    assert_eq!(solve(&mut p), Checked { correct: true, effect: AttemptEffect::Streak });
    p.prepare_task();
    assert_eq!(solve(&mut p), Checked { correct: true, effect: AttemptEffect::LevelUp });
    assert_eq!(p.progress().level(), 2);
    assert_eq!(p.sub_level(), 2);
    assert_eq!(p.completed(), 0);
    p.prepare_task();
    assert_eq!(p.cursor, 1);
  }

  fn at_bag_sub_level(seed: u64) -> ReorderPuzzle {
    let mut p = puzzle(&["раз два", "три четыре", "пять шесть"], seed);
    for _ in 0..6 {
      p.prepare_task();
    }
    assert_eq!((p.sub_level(), p.cursor), (3, 1));
    p
  }

  #[test]
  fn bag_sub_level_uses_one_flat_bag() {
    let mut p = at_bag_sub_level(3);
    assert_eq!(p.original(), &LineStructure::Bag(vec!["раз".into(), "два".into()]));
    let as_lines = LineStructure::Lines(vec![vec!["раз".into(), "два".into()]]);
    assert!(!p.check_answer(&as_lines).correct);
  }

  #[test]
  fn three_bag_solves_advance_without_double_level_up() {
    let mut p = at_bag_sub_level(5);
    assert!(solve(&mut p).correct);
    p.prepare_task();
    assert!(solve(&mut p).correct);
    p.prepare_task();
    let checked = solve(&mut p);
    assert_eq!(checked.effect, AttemptEffect::LevelUp);
    assert_eq!(p.progress().level(), 2);
    assert_eq!(p.sub_level(), 4);
  }

  #[test]
  fn sub_level_four_joins_first_two_stanzas() {
    let mut p = puzzle(&["раз два\nтри", "четыре пять", "шесть"], 6);
    p.sub_level = 4;
    p.prepare_task();
    let LineStructure::Lines(original) = p.original() else { panic!("line based") };
    assert_eq!(original.len(), 3);
    assert_eq!(original[2], vec!["четыре".to_string(), "пять".to_string()]);

    p.sub_level = 5;
    p.prepare_task();
    assert_eq!(p.original().word_count(), 5);
  }

  #[test]
  fn sub_level_is_capped_at_five() {
    let mut p = puzzle(&["раз два"], 6);
    p.sub_level = 5;
    p.prepare_task();
    for _ in 0..3 {
      assert!(solve(&mut p).correct);
      p.prepare_task();
    }
    assert_eq!(p.sub_level(), MAX_SUB_LEVEL);
  }

  #[test]
  fn exhausted_lives_lower_sub_level_once() {
    let mut p = at_bag_sub_level(9);
    assert_eq!(fail(&mut p).effect, AttemptEffect::LifeLost);
    assert_eq!(p.sub_level(), 3);
    assert_eq!(fail(&mut p).effect, AttemptEffect::LivesExhausted { demoted: false });
    assert_eq!(p.sub_level(), 2);
    assert_eq!((p.progress().level(), p.progress().lives()), (1, 2));
  }

  #[test]
  fn demotion_after_level_up_is_applied_once() {
    let mut p = at_bag_sub_level(11);
    for _ in 0..3 {
      assert!(solve(&mut p).correct);
      p.prepare_task();
    }
    assert_eq!((p.progress().level(), p.sub_level()), (2, 4));

    assert_eq!(fail(&mut p).effect, AttemptEffect::LifeLost);
    assert_eq!(fail(&mut p).effect, AttemptEffect::LivesExhausted { demoted: true });
    assert_eq!((p.progress().level(), p.progress().lives()), (1, 2));
    assert_eq!(p.sub_level(), 3);
    assert_eq!(p.completed(), 0);
  }

  #[test]
  fn sub_level_never_drops_below_one() {
    let mut p = puzzle(&["раз два"], 0);
    fail(&mut p);
    fail(&mut p);
    assert_eq!(p.sub_level(), 1);
  }
}
