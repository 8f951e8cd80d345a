//! Error types for corpus loading, answer checking and session dispatch.
//!
//! Gameplay mismatches are never errors: a wrong answer is `false`.
//! `InvalidAnswerShape` exists so the exercises can log *why* an answer was
//! rejected before turning it into `false`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrillError {
  /// No stanza with at least one word is available.
  #[error("corpus is empty: at least one stanza with at least one word is required")]
  EmptyCorpus,

  /// The submitted answer does not have the shape of the current task.
  #[error("answer shape mismatch: expected {expected}, got {got}")]
  InvalidAnswerShape { expected: String, got: String },

  /// A stanza index outside the corpus was selected.
  #[error("stanza {index} is out of range (corpus has {len} stanzas)")]
  StanzaOutOfRange { index: usize, len: usize },

  #[error("unknown session: {0}")]
  UnknownSession(String),
}
