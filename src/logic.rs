//! Request handling shared by every presentation driver.
//!
//! Handlers receive the session store explicitly. Each request performs one
//! full state transition and yields exactly one reply; failures become
//! `ServerMessage::Error` and never stop the driver.

use tracing::{info, instrument, warn};

use crate::domain::ExerciseKind;
use crate::error::DrillError;
use crate::exercises::Checked;
use crate::protocol::{solution_out, task_out, ClientMessage, ServerMessage};
use crate::state::{Session, SessionStore};

const ALL_EXERCISES: [ExerciseKind; 3] = [ExerciseKind::GapFill, ExerciseKind::Reorder, ExerciseKind::Sequence];

#[instrument(level = "info", skip_all)]
pub fn handle_message(store: &mut SessionStore, msg: ClientMessage) -> ServerMessage {
  match dispatch(store, msg) {
    Ok(reply) => reply,
    Err(e) => {
      warn!(target: "poem_trainer", error = %e, "Request failed");
      ServerMessage::Error { message: e.to_string() }
    }
  }
}

fn dispatch(store: &mut SessionStore, msg: ClientMessage) -> Result<ServerMessage, DrillError> {
  match msg {
    ClientMessage::Ping => Ok(ServerMessage::Pong),

    ClientMessage::ListStanzas => Ok(ServerMessage::Stanzas {
      stanzas: store.corpus().stanzas().to_vec(),
    }),

    ClientMessage::OpenSession { seed } => {
      let session_id = store.open(seed);
      let session = store.get(&session_id)?;
      let tasks = ALL_EXERCISES.iter().map(|&k| task_out(session, k)).collect();
      Ok(ServerMessage::SessionOpened { session_id, tasks })
    }

    ClientMessage::CloseSession { session_id } => {
      store.close(&session_id)?;
      Ok(ServerMessage::SessionClosed { session_id })
    }

    ClientMessage::NewTask { session_id, exercise } => {
      let session = store.get_mut(&session_id)?;
      session.exercise_mut(exercise).prepare_task();
      info!(target: "drill", session = %session_id, ?exercise, "New task served");
      Ok(ServerMessage::Task { task: task_out(session, exercise) })
    }

    ClientMessage::SelectStanza { session_id, index } => {
      let session = store.get_mut(&session_id)?;
      session.gap_fill.select_stanza(index)?;
      Ok(ServerMessage::Task { task: task_out(session, ExerciseKind::GapFill) })
    }

    ClientMessage::SelectStanzas { session_id, indices } => {
      let session = store.get_mut(&session_id)?;
      session.sequence.select_stanzas(&indices)?;
      Ok(ServerMessage::Task { task: task_out(session, ExerciseKind::Sequence) })
    }

    ClientMessage::SubmitGapFill { session_id, answers } => {
      let session = store.get_mut(&session_id)?;
      let checked = session.gap_fill.check_answer(&answers);
      Ok(conclude(session, ExerciseKind::GapFill, checked))
    }

    ClientMessage::SubmitReorder { session_id, answer } => {
      let session = store.get_mut(&session_id)?;
      let checked = session.reorder.check_answer(&answer);
      Ok(conclude(session, ExerciseKind::Reorder, checked))
    }

    ClientMessage::SubmitSequence { session_id, answer } => {
      let session = store.get_mut(&session_id)?;
      let checked = session.sequence.check_answer(&answer);
      Ok(conclude(session, ExerciseKind::Sequence, checked))
    }

    ClientMessage::Progress { session_id, exercise } => {
      let session = store.get(&session_id)?;
      Ok(ServerMessage::Progress {
        exercise,
        progress: session.exercise(exercise).progress().snapshot(),
      })
    }
  }
}

/// Reveal the checked task, then move on to the next one.
fn conclude(session: &mut Session, exercise: ExerciseKind, checked: Checked) -> ServerMessage {
  let solution = solution_out(session, exercise);
  session.exercise_mut(exercise).prepare_task();
  ServerMessage::AnswerResult {
    exercise,
    correct: checked.correct,
    effect: checked.effect,
    solution,
    progress: session.exercise(exercise).progress().snapshot(),
    next: task_out(session, exercise),
  }
}
