//! Word-sequence drill: one random word from every line of the selected
//! stanzas, shown shuffled; the learner puts them back in reading order.

use std::sync::Arc;

use rand::{rngs::StdRng, seq::SliceRandom, Rng};
use tracing::{debug, info, instrument, warn};

use crate::domain::{AttemptEffect, Corpus, SequenceItem};
use crate::error::DrillError;
use crate::exercises::{Checked, Exercise};
use crate::progress::ProgressTracker;
use crate::util::{extract_words, non_empty_lines};

/// Answer key for `stanzas` (all indices must be valid), in traversal order.
pub fn sample_sequence<R: Rng + ?Sized>(corpus: &Corpus, stanzas: &[usize], rng: &mut R) -> Vec<SequenceItem> {
  let mut items = Vec::new();
  for &stanza in stanzas {
    for (line_index, line) in non_empty_lines(&corpus.stanzas()[stanza]).into_iter().enumerate() {
      let words = extract_words(line);
      if let Some(word) = words.choose(rng) {
        items.push(SequenceItem {
          word: word.clone(),
          line_index,
          source_line: line.to_string(),
        });
      }
    }
  }
  items
}

pub struct SequencePuzzle {
  corpus: Arc<Corpus>,
  selected: Vec<usize>,
  answer_key: Vec<SequenceItem>,
  shuffled: Vec<String>,
  tracker: ProgressTracker,
  rng: StdRng,
}

impl SequencePuzzle {
  pub fn new(corpus: Arc<Corpus>, rng: StdRng) -> Self {
    let mut puzzle = Self {
      corpus,
      selected: vec![0],
      answer_key: Vec::new(),
      shuffled: Vec::new(),
      tracker: ProgressTracker::new(),
      rng,
    };
    puzzle.prepare_task();
    puzzle
  }

  pub fn selected(&self) -> &[usize] { &self.selected }
  pub fn answer_key(&self) -> &[SequenceItem] { &self.answer_key }
  pub fn shuffled(&self) -> &[String] { &self.shuffled }

  pub fn sequence_words(&self) -> Vec<String> {
    self.answer_key.iter().map(|i| i.word.clone()).collect()
  }

  /// Source lines of the current task, revealed after a failed attempt.
  pub fn original_lines(&self) -> Vec<String> {
    self.answer_key().iter().map(|i| i.source_line.clone()).collect()
  }

  /// Replace the stanza selection and prepare a task from it.
  /// Duplicates are dropped; an empty selection means the first stanza.
  pub fn select_stanzas(&mut self, indices: &[usize]) -> Result<(), DrillError> {
    for &index in indices {
      self.corpus.check_index(index)?;
    }
    let mut selected = Vec::with_capacity(indices.len());
    for &index in indices {
      if !selected.contains(&index) {
        selected.push(index);
      }
    }
    if selected.is_empty() {
      selected.push(0);
    }
    self.selected = selected;
    self.prepare_task();
    Ok(())
  }

  /// Position-by-position comparison with the answer key. No side effects.
  pub fn matches(&self, answer: &[String]) -> Result<bool, DrillError> {
    if answer.len() != self.answer_key.len() {
      return Err(DrillError::InvalidAnswerShape {
        expected: format!("{} words", self.answer_key.len()),
        got: format!("{} words", answer.len()),
      });
    }
    Ok(answer.iter().zip(&self.answer_key).all(|(given, item)| *given == item.word))
  }

  #[instrument(level = "debug", skip(self, answer), fields(stanzas = self.selected.len(), words = answer.len()))]
  pub fn check_answer(&mut self, answer: &[String]) -> Checked {
    let correct = match self.matches(answer) {
      Ok(ok) => ok,
      Err(e) => {
        warn!(target: "drill", error = %e, "Sequence answer rejected");
        false
      }
    };
    let effect = self.tracker.record_attempt(correct);
    if effect == AttemptEffect::LevelUp {
      let widened = (self.selected.len() + 1).min(self.corpus.len());
      self.selected = (0..widened).collect();
      info!(target: "drill", stanzas = widened, "Sequence selection widened");
    }
    info!(target: "drill", exercise = "sequence", %correct, level = self.tracker.level(), "Sequence answer checked");
    Checked { correct, effect }
  }
}

impl Exercise for SequencePuzzle {
  fn prepare_task(&mut self) {
    self.answer_key = sample_sequence(&self.corpus, &self.selected, &mut self.rng);
    self.shuffled = self.sequence_words();
    self.shuffled.shuffle(&mut self.rng);
    debug!(target: "drill", stanzas = ?self.selected, words = self.answer_key.len(), "Sequence task prepared");
  }

  fn progress(&self) -> &ProgressTracker {
    &self.tracker
  }
}
