//! Level / lives / streak bookkeeping shared by every exercise.
//!
//! Each exercise owns its own tracker; nothing here is shared between
//! exercise kinds.

use serde::Serialize;
use tracing::debug;

use crate::domain::{AttemptEffect, Outcome};

pub const MAX_LIVES: u8 = 2;
pub const STREAK_FOR_LEVEL_UP: u32 = 3;

#[derive(Clone, Debug)]
pub struct ProgressTracker {
  level: u32,
  lives: u8,
  consecutive_correct: u32,
  history: Vec<Outcome>,
}

/// Display copy of the tracker state.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
  pub level: u32,
  pub lives: u8,
  pub consecutive_correct: u32,
  pub activity_history: Vec<Outcome>,
}

impl Default for ProgressTracker {
  fn default() -> Self {
    Self { level: 1, lives: MAX_LIVES, consecutive_correct: 0, history: Vec::new() }
  }
}

impl ProgressTracker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn level(&self) -> u32 { self.level }
  pub fn lives(&self) -> u8 { self.lives }
  pub fn consecutive_correct(&self) -> u32 { self.consecutive_correct }
  pub fn history(&self) -> &[Outcome] { &self.history }

  /// Feed one checked answer into the tracker.
  pub fn record_attempt(&mut self, is_correct: bool) -> AttemptEffect {
    let effect = if is_correct {
      self.history.push(Outcome::Success);
      self.consecutive_correct += 1;
      if self.consecutive_correct == STREAK_FOR_LEVEL_UP {
        self.level_up();
        AttemptEffect::LevelUp
      } else {
        AttemptEffect::Streak
      }
    } else {
      self.history.push(Outcome::Failure);
      self.consecutive_correct = 0;
      self.lose_life()
    };
    debug!(target: "drill", ?effect, level = self.level, lives = self.lives, streak = self.consecutive_correct, "Attempt recorded");
    effect
  }

  pub fn level_up(&mut self) {
    self.level += 1;
    self.consecutive_correct = 0;
    self.lives = MAX_LIVES;
  }

  /// Lives never rest at zero: the last one is restored in the same step,
  /// dropping a level unless already at level 1.
  pub fn lose_life(&mut self) -> AttemptEffect {
    self.lives = self.lives.saturating_sub(1);
    if self.lives > 0 {
      return AttemptEffect::LifeLost;
    }
    let demoted = self.level > 1;
    if demoted {
      self.level -= 1;
    }
    self.lives = MAX_LIVES;
    AttemptEffect::LivesExhausted { demoted }
  }

  pub fn snapshot(&self) -> ProgressSnapshot {
    ProgressSnapshot {
      level: self.level(),
      lives: self.lives(),
      consecutive_correct: self.consecutive_correct(),
      activity_history: self.history().to_vec(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn starts_at_level_one_with_full_lives() {
    let t = ProgressTracker::new();
    assert_eq!((t.level(), t.lives(), t.consecutive_correct()), (1, 2, 0));
    assert!(t.history().is_empty());
  }

  #[test]
  fn exhausting_lives_never_leaves_zero_visible() {
    for start_level in 1..=5u32 {
      let mut t = ProgressTracker::new();
      for _ in 1..start_level {
        t.level_up();
      }
      assert_eq!(t.level(), start_level);

      assert_eq!(t.lose_life(), AttemptEffect::LifeLost);
      assert_eq!(t.lives(), 1);
      let effect = t.lose_life();
      assert_eq!(t.lives(), 2);
      assert_eq!(effect, AttemptEffect::LivesExhausted { demoted: start_level > 1 });
      assert_eq!(t.level(), start_level.saturating_sub(1).max(1));
    }
  }

  #[test]
  fn three_correct_in_a_row_level_up_once() {
    let mut t = ProgressTracker::new();
    // Streak broken first, so it restarts from zero.
    t.record_attempt(true);
    t.record_attempt(false);
    assert_eq!(t.consecutive_correct(), 0);

    assert_eq!(t.record_attempt(true), AttemptEffect::Streak);
    assert_eq!(t.record_attempt(true), AttemptEffect::Streak);
    assert_eq!(t.record_attempt(true), AttemptEffect::LevelUp);
    assert_eq!(t.level(), 2);
    assert_eq!(t.consecutive_correct(), 0);
    assert_eq!(t.lives(), 2);

    // Two more correct answers are not enough for another level.
    t.record_attempt(true);
    t.record_attempt(true);
    assert_eq!(t.level(), 2);
  }

  #[test]
  fn level_up_from_mid_streak_counts_from_current_value() {
    let mut t = ProgressTracker::new();
    t.record_attempt(true);
    t.record_attempt(true);
    assert_eq!(t.consecutive_correct(), 2);
    assert_eq!(t.record_attempt(true), AttemptEffect::LevelUp);
    assert_eq!(t.consecutive_correct(), 0);
  }

  #[test]
  fn failure_resets_streak_and_costs_a_life() {
    let mut t = ProgressTracker::new();
    t.record_attempt(true);
    assert_eq!(t.record_attempt(false), AttemptEffect::LifeLost);
    assert_eq!(t.consecutive_correct(), 0);
    assert_eq!(t.lives(), 1);
  }

  #[test]
  fn level_one_is_the_floor() {
    let mut t = ProgressTracker::new();
    t.record_attempt(false);
    assert_eq!(t.record_attempt(false), AttemptEffect::LivesExhausted { demoted: false });
    assert_eq!((t.level(), t.lives()), (1, 2));
  }

  #[test]
  fn demotion_after_level_up() {
    let mut t = ProgressTracker::new();
    for _ in 0..3 {
      t.record_attempt(true);
    }
    t.record_attempt(false);
    assert_eq!(t.record_attempt(false), AttemptEffect::LivesExhausted { demoted: true });
    assert_eq!((t.level(), t.lives()), (1, 2));
  }

  #[test]
  fn history_is_append_only_in_order() {
    let mut t = ProgressTracker::new();
    t.record_attempt(true);
    t.record_attempt(false);
    t.record_attempt(true);
    let snap = t.snapshot();
    assert_eq!(snap.activity_history, vec![Outcome::Success, Outcome::Failure, Outcome::Success]);
    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["activityHistory"][1], "failure");
    assert_eq!(json["consecutiveCorrect"], 1);
  }
}
