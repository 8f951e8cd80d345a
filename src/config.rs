//! Loading the stanza corpus from TOML, plus the small env-driven settings.
//!
//! Expected file schema:
//!
//! ```toml
//! poems = [
//!   "first line\nsecond line",
//!   "another stanza",
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::seeds::default_poems;

pub const DEFAULT_POEMS_PATH: &str = "poems.toml";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PoemsFile {
  #[serde(default)]
  pub poems: Option<Vec<String>>,
}

/// POEMS_CONFIG_PATH, or `poems.toml` in the working directory.
pub fn poems_path_from_env() -> PathBuf {
  std::env::var("POEMS_CONFIG_PATH")
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from(DEFAULT_POEMS_PATH))
}

/// TRAINER_SEED makes every new session deterministic.
pub fn seed_from_env() -> Option<u64> {
  let raw = std::env::var("TRAINER_SEED").ok()?;
  match raw.parse::<u64>() {
    Ok(seed) => Some(seed),
    Err(e) => {
      warn!(target: "poem_trainer", %raw, error = %e, "Ignoring unparsable TRAINER_SEED");
      None
    }
  }
}

/// Read stanzas from `path`. Any problem (missing file, IO, parse, missing
/// `poems` key) falls back to the built-in stanzas.
pub fn load_poems_from(path: &Path) -> Vec<String> {
  let shown = path.display().to_string();
  if !path.exists() {
    info!(target: "poem_trainer", path = %shown, "No corpus file; using built-in stanzas");
    return default_poems();
  }
  match std::fs::read_to_string(path) {
    Ok(s) => match toml::from_str::<PoemsFile>(&s) {
      Ok(PoemsFile { poems: Some(poems) }) => {
        info!(target: "poem_trainer", path = %shown, stanzas = poems.len(), "Loaded corpus (TOML)");
        poems
      }
      Ok(PoemsFile { poems: None }) => {
        warn!(target: "poem_trainer", path = %shown, "Corpus file has no `poems` key; using built-in stanzas");
        default_poems()
      }
      Err(e) => {
        error!(target: "poem_trainer", path = %shown, error = %e, "Failed to parse TOML corpus");
        default_poems()
      }
    },
    Err(e) => {
      error!(target: "poem_trainer", path = %shown, error = %e, "Failed to read TOML corpus file");
      default_poems()
    }
  }
}

pub fn load_poems() -> Vec<String> {
  load_poems_from(&poems_path_from_env())
}
