//! Stdio message loop. Each input line is parsed as JSON and forwarded to
//! core logic. We reply with a single JSON line per request.

use std::io::{self, BufRead, Write};

use tracing::{debug, info, instrument, warn};

use crate::logic::handle_message;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::SessionStore;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip_all)]
pub fn run<R: BufRead, W: Write>(store: &mut SessionStore, mut input: R, mut output: W) -> io::Result<()> {
  info!(target: "poem_trainer", "Reading requests from stdin");
  let mut buf = Vec::new();
  loop {
    buf.clear();
    if input.read_until(b'\n', &mut buf)? == 0 {
      break;
    }

    // Undecodable bytes get an error reply like bad JSON does; the loop goes on.
    let reply = match std::str::from_utf8(&buf) {
      Ok(line) => {
        let txt = line.trim();
        if txt.is_empty() {
          continue;
        }
        parse_and_handle(store, txt)
      }
      Err(e) => {
        warn!(target: "poem_trainer", error = %e, "Request is not valid UTF-8");
        ServerMessage::Error { message: format!("Invalid UTF-8: {}", e) }
      }
    };

    let out = serde_json::to_string(&reply).unwrap_or_else(|e| {
      serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
    });
    writeln!(output, "{}", out)?;
    output.flush()?;
  }
  info!(target: "poem_trainer", open_sessions = store.len(), "Input closed");
  Ok(())
}

fn parse_and_handle(store: &mut SessionStore, txt: &str) -> ServerMessage {
  match serde_json::from_str::<ClientMessage>(txt) {
    Ok(incoming) => {
      debug!(target: "poem_trainer", request = %trunc_for_log(txt, 200), "Request received");
      handle_message(store, incoming)
    }
    Err(e) => ServerMessage::Error { message: format!("Invalid JSON: {}", e) },
  }
}
