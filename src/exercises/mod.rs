//! The three drill exercises and what they have in common.
//!
//! Every exercise owns its own `ProgressTracker` and RNG, regenerates its
//! task from scratch on `prepare_task`, and forwards each checked answer to
//! the tracker.

use serde::Serialize;

use crate::domain::AttemptEffect;
use crate::progress::ProgressTracker;

pub mod gap_fill;
pub mod reorder;
pub mod sequence;

pub use gap_fill::GapFillPuzzle;
pub use reorder::ReorderPuzzle;
pub use sequence::SequencePuzzle;

/// Result of `check_answer`: the verdict plus what it did to the tracker.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Checked {
  pub correct: bool,
  pub effect: AttemptEffect,
}

pub trait Exercise {
  /// Throw the current task away and build a new one.
  fn prepare_task(&mut self);

  fn progress(&self) -> &ProgressTracker;
}
