//! Domain models shared by the exercises: outcomes, blanks, line structures,
//! sequence items and the validated stanza corpus.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DrillError;
use crate::util::extract_words;

/// Which exercise a request or reply refers to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
  GapFill,
  Reorder,
  Sequence,
}

/// One entry of the activity history.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  Success,
  Failure,
}

/// What a single recorded attempt did to the progress tracker.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptEffect {
  /// Correct, streak extended, no level change.
  Streak,
  /// Correct, and the level went up (third in a row, or a finished
  /// reorder round).
  LevelUp,
  /// Wrong, one life gone, at least one left.
  LifeLost,
  /// Wrong, last life gone; lives were restored at once.
  /// `demoted` is false when already at level 1.
  LivesExhausted { demoted: bool },
}

/// A word removed from a gap-fill text.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Blank {
  pub word: String,
  /// Character offset of the word in the source stanza.
  pub position: usize,
  pub stanza: usize,
}

/// Shape of a reorder task (or of a learner's answer to one).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineStructure {
  /// Line by line; words are reordered inside each line.
  Lines(Vec<Vec<String>>),
  /// One flat bag of words.
  Bag(Vec<String>),
}

impl LineStructure {
  pub fn word_count(&self) -> usize {
    match self {
      LineStructure::Lines(lines) => lines.iter().map(Vec::len).sum(),
      LineStructure::Bag(words) => words.len(),
    }
  }

  /// Short description used in shape-mismatch diagnostics.
  pub fn shape(&self) -> String {
    match self {
      LineStructure::Lines(lines) => format!("{} lines", lines.len()),
      LineStructure::Bag(words) => format!("bag of {} words", words.len()),
    }
  }
}

/// One sampled word of a sequence task.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SequenceItem {
  pub word: String,
  pub line_index: usize,
  pub source_line: String,
}

/// Immutable, validated list of stanzas.
///
/// Every stanza kept here contains at least one word, and there is at least
/// one stanza, so the exercises can always prepare a task.
#[derive(Clone, Debug)]
pub struct Corpus {
  stanzas: Vec<String>,
}

impl Corpus {
  pub fn new(stanzas: Vec<String>) -> Result<Self, DrillError> {
    let mut kept = Vec::with_capacity(stanzas.len());
    for (index, stanza) in stanzas.into_iter().enumerate() {
      if extract_words(&stanza).is_empty() {
        warn!(target: "poem_trainer", index, "Dropping stanza without any words");
        continue;
      }
      kept.push(stanza);
    }
    if kept.is_empty() {
      return Err(DrillError::EmptyCorpus);
    }
    Ok(Self { stanzas: kept })
  }

  pub fn len(&self) -> usize {
    self.stanzas.len()
  }

  pub fn stanzas(&self) -> &[String] {
    &self.stanzas
  }

  pub fn check_index(&self, index: usize) -> Result<(), DrillError> {
    if index < self.stanzas.len() {
      Ok(())
    } else {
      Err(DrillError::StanzaOutOfRange { index, len: self.stanzas.len() })
    }
  }

  /// The first two stanzas joined by a newline (just the first one if the
  /// corpus holds a single stanza).
  pub fn first_two_joined(&self) -> String {
    self.stanzas.iter().take(2).cloned().collect::<Vec<_>>().join("\n")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_list_is_rejected() {
    assert_eq!(Corpus::new(vec![]).unwrap_err(), DrillError::EmptyCorpus);
  }

  #[test]
  fn stanzas_without_words_are_dropped() {
    let corpus = Corpus::new(vec!["123 !!".into(), "Мороз и солнце".into()]).unwrap();
    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.stanzas()[0], "Мороз и солнце");

    let err = Corpus::new(vec!["...".into(), "latin only".into()]).unwrap_err();
    assert_eq!(err, DrillError::EmptyCorpus);
  }

  #[test]
  fn out_of_range_index_is_an_error() {
    let corpus = Corpus::new(vec!["снег".into()]).unwrap();
    assert_eq!(
      corpus.check_index(3).unwrap_err(),
      DrillError::StanzaOutOfRange { index: 3, len: 1 }
    );
  }

  #[test]
  fn first_two_joined_handles_short_corpus() {
    let one = Corpus::new(vec!["раз".into()]).unwrap();
    assert_eq!(one.first_two_joined(), "раз");
    let three = Corpus::new(vec!["раз".into(), "два".into(), "три".into()]).unwrap();
    assert_eq!(three.first_two_joined(), "раз\nдва");
  }

  #[test]
  fn line_structure_serializes_with_shape_tag() {
    let lines = LineStructure::Lines(vec![vec!["а".into()]]);
    assert_eq!(serde_json::to_string(&lines).unwrap(), r#"{"lines":[["а"]]}"#);
    let bag: LineStructure = serde_json::from_str(r#"{"bag":["и","ель"]}"#).unwrap();
    assert_eq!(bag, LineStructure::Bag(vec!["и".into(), "ель".into()]));
  }

  #[test]
  fn reply_only_enums_serialize_in_wire_form() {
    let effect = AttemptEffect::LivesExhausted { demoted: true };
    assert_eq!(serde_json::to_string(&effect).unwrap(), r#"{"kind":"lives_exhausted","demoted":true}"#);
    assert_eq!(serde_json::to_string(&AttemptEffect::LevelUp).unwrap(), r#"{"kind":"level_up"}"#);
    assert_eq!(serde_json::to_string(&[Outcome::Success, Outcome::Failure]).unwrap(), r#"["success","failure"]"#);
  }
}
