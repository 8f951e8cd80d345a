//! Poem Trainer · stanza drill engine
//!
//! - Gap fill, word reorder and word sequence drills over a list of stanzas
//! - Per-exercise level / lives / streak tracking
//! - JSON-lines driver on stdin/stdout (logs go to stderr)
//!
//! Important env variables:
//!   POEMS_CONFIG_PATH : TOML file with `poems = [...]` (default "poems.toml";
//!                       built-in stanzas are used when it is missing)
//!   TRAINER_SEED      : u64, makes every session deterministic
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod seeds;
mod progress;
mod exercises;
mod state;
mod protocol;
mod logic;
mod console;

use tracing::{info, instrument};

use crate::domain::Corpus;
use crate::state::SessionStore;

#[instrument(level = "info", skip_all)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // An empty corpus is fatal: no exercise could ever prepare a task.
  let corpus = Corpus::new(config::load_poems())?;
  info!(target: "poem_trainer", stanzas = corpus.len(), "Corpus ready");

  let mut store = SessionStore::new(corpus, config::seed_from_env());

  let stdin = std::io::stdin();
  let stdout = std::io::stdout();
  console::run(&mut store, stdin.lock(), stdout.lock())?;
  Ok(())
}
