//! Fill-in-the-blank drill.
//!
//! Flow:
//! 1) Tokenize the selected stanza into word occurrences with offsets.
//! 2) Pick `min(level, occurrences)` of them at random.
//! 3) Splice numbered placeholders `_(n)_` in, right to left, so earlier
//!    offsets stay valid.
//! 4) Compare submitted words to the blanks in reading order.
//!
//! Each occurrence is its own token, so repeated words are blanked exactly
//! where they were chosen.

use std::sync::Arc;

use rand::{rngs::StdRng, seq::index, Rng};
use tracing::{debug, info, instrument, warn};

use crate::domain::{Blank, Corpus};
use crate::error::DrillError;
use crate::exercises::{Checked, Exercise};
use crate::progress::ProgressTracker;
use crate::util::{normalize_answer, word_spans};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GapTask {
  pub text_with_gaps: String,
  /// Left to right, the order they appear in `text_with_gaps`.
  pub blanks: Vec<Blank>,
}

pub fn placeholder(n: usize) -> String {
  format!("_({})_", n)
}

/// Build one gap-fill task out of `stanza` at the given level.
pub fn build_gap_task<R: Rng + ?Sized>(stanza: &str, stanza_index: usize, level: u32, rng: &mut R) -> GapTask {
  let spans = word_spans(stanza);
  let gap_count = (level as usize).min(spans.len());

  let mut chosen = index::sample(rng, spans.len(), gap_count).into_vec();
  chosen.sort_unstable();

  let mut text = stanza.to_string();
  for (n, &idx) in chosen.iter().enumerate().rev() {
    let span = &spans[idx];
    text.replace_range(span.byte_start..span.byte_end, &placeholder(n + 1));
  }

  let blanks = chosen
    .iter()
    .map(|&idx| Blank {
      word: spans[idx].word.clone(),
      position: spans[idx].char_offset,
      stanza: stanza_index,
    })
    .collect();

  GapTask { text_with_gaps: text, blanks }
}

pub struct GapFillPuzzle {
  corpus: Arc<Corpus>,
  stanza: usize,
  task: GapTask,
  tracker: ProgressTracker,
  rng: StdRng,
}

impl GapFillPuzzle {
  pub fn new(corpus: Arc<Corpus>, rng: StdRng) -> Self {
    let mut puzzle = Self {
      corpus,
      stanza: 0,
      task: GapTask::default(),
      tracker: ProgressTracker::new(),
      rng,
    };
    puzzle.prepare_task();
    puzzle
  }

  pub fn stanza(&self) -> usize { self.stanza }
  pub fn text_with_gaps(&self) -> &str { &self.task.text_with_gaps }
  pub fn blanks(&self) -> &[Blank] { &self.task.blanks }

  /// Correct words in blank order, revealed after a failed attempt.
  pub fn expected_words(&self) -> Vec<String> {
    self.task.blanks.iter().map(|b| b.word.clone()).collect()
  }

  /// Switch to another stanza and prepare a task from it.
  pub fn select_stanza(&mut self, index: usize) -> Result<(), DrillError> {
    self.corpus.check_index(index)?;
    self.stanza = index;
    self.prepare_task();
    Ok(())
  }

  /// Every blank must match, in order. No side effects.
  pub fn matches(&self, answers: &[String]) -> Result<bool, DrillError> {
    if answers.len() != self.task.blanks.len() {
      return Err(DrillError::InvalidAnswerShape {
        expected: format!("{} words", self.task.blanks.len()),
        got: format!("{} words", answers.len()),
      });
    }
    Ok(answers
      .iter()
      .zip(&self.task.blanks)
      .all(|(given, blank)| normalize_answer(given) == normalize_answer(&blank.word)))
  }

  #[instrument(level = "debug", skip(self, answers), fields(stanza = self.stanza, answers = answers.len()))]
  pub fn check_answer(&mut self, answers: &[String]) -> Checked {
    let correct = match self.matches(answers) {
      Ok(ok) => ok,
      Err(e) => {
        warn!(target: "drill", error = %e, "Gap-fill answer rejected");
        false
      }
    };
    let effect = self.tracker.record_attempt(correct);
    info!(target: "drill", exercise = "gap_fill", %correct, level = self.tracker.level(), "Gap-fill answer checked");
    Checked { correct, effect }
  }
}

impl Exercise for GapFillPuzzle {
  fn prepare_task(&mut self) {
    let stanza = &self.corpus.stanzas()[self.stanza];
    self.task = build_gap_task(stanza, self.stanza, self.tracker.level(), &mut self.rng);
    debug!(target: "drill", stanza = self.stanza, gaps = self.task.blanks.len(), "Gap-fill task prepared");
  }

  fn progress(&self) -> &ProgressTracker {
    &self.tracker
  }
}
