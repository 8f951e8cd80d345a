//! Small text helpers used across the exercises.

/// One word occurrence inside a source text.
///
/// Byte bounds are used for splicing; `char_offset` is the user-facing
/// position (counted in characters, not bytes).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordSpan {
  pub word: String,
  pub byte_start: usize,
  pub byte_end: usize,
  pub char_offset: usize,
}

/// True if the char is a letter of the Russian alphabet (including ё/Ё).
pub fn is_target_letter(ch: char) -> bool {
  matches!(ch, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

/// Every maximal run of target letters, in text order.
/// Punctuation, digits, Latin letters and whitespace all act as separators.
pub fn word_spans(text: &str) -> Vec<WordSpan> {
  let mut spans = Vec::new();
  // (byte start, char offset) of the word being scanned
  let mut open: Option<(usize, usize)> = None;

  for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
    if is_target_letter(ch) {
      if open.is_none() {
        open = Some((byte_idx, char_idx));
      }
    } else if let Some((start, offset)) = open.take() {
      spans.push(WordSpan {
        word: text[start..byte_idx].to_string(),
        byte_start: start,
        byte_end: byte_idx,
        char_offset: offset,
      });
    }
  }
  if let Some((start, offset)) = open {
    spans.push(WordSpan {
      word: text[start..].to_string(),
      byte_start: start,
      byte_end: text.len(),
      char_offset: offset,
    });
  }
  spans
}

/// Words only, without positions.
pub fn extract_words(text: &str) -> Vec<String> {
  word_spans(text).into_iter().map(|s| s.word).collect()
}

/// Trimmed, non-empty lines of a stanza.
pub fn non_empty_lines(text: &str) -> Vec<&str> {
  text
    .split('\n')
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .collect()
}

/// Canonical form used to compare a typed word against the expected one:
/// keep letters and spaces, collapse whitespace, lowercase, fold ё into е.
pub fn normalize_answer(s: &str) -> String {
  let cleaned: String = s
    .chars()
    .filter(|c| is_target_letter(*c) || *c == ' ')
    .collect();
  cleaned
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
    .replace('ё', "е")
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request payloads.
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  let total = s.chars().count();
  if total <= max_chars {
    s.to_string()
  } else {
    let head: String = s.chars().take(max_chars).collect();
    format!("{}… ({} chars total)", head, total)
  }
}
