//! Request/reply messages of the stdio driver (serde ready).
//! One JSON object per line in, one JSON object per line out.

use serde::{Deserialize, Serialize};

use crate::domain::{AttemptEffect, ExerciseKind, LineStructure};
use crate::exercises::{GapFillPuzzle, ReorderPuzzle, SequencePuzzle};
use crate::progress::ProgressSnapshot;
use crate::state::Session;

/// Messages the presentation layer can send.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
    ListStanzas,
    OpenSession {
        #[serde(default)]
        seed: Option<u64>,
    },
    CloseSession {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    NewTask {
        #[serde(rename = "sessionId")]
        session_id: String,
        exercise: ExerciseKind,
    },
    /// Gap fill works on one stanza at a time.
    SelectStanza {
        #[serde(rename = "sessionId")]
        session_id: String,
        index: usize,
    },
    /// Sequence works on a set of stanzas.
    SelectStanzas {
        #[serde(rename = "sessionId")]
        session_id: String,
        indices: Vec<usize>,
    },
    SubmitGapFill {
        #[serde(rename = "sessionId")]
        session_id: String,
        answers: Vec<String>,
    },
    SubmitReorder {
        #[serde(rename = "sessionId")]
        session_id: String,
        answer: LineStructure,
    },
    SubmitSequence {
        #[serde(rename = "sessionId")]
        session_id: String,
        answer: Vec<String>,
    },
    Progress {
        #[serde(rename = "sessionId")]
        session_id: String,
        exercise: ExerciseKind,
    },
}

/// Messages sent back, exactly one per request.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Pong,
    Stanzas {
        stanzas: Vec<String>,
    },
    SessionOpened {
        #[serde(rename = "sessionId")]
        session_id: String,
        tasks: Vec<TaskOut>,
    },
    SessionClosed {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Task {
        task: TaskOut,
    },
    AnswerResult {
        exercise: ExerciseKind,
        correct: bool,
        effect: AttemptEffect,
        /// Solution of the task that was just checked.
        solution: SolutionOut,
        progress: ProgressSnapshot,
        /// Freshly prepared follow-up task.
        next: TaskOut,
    },
    Progress {
        exercise: ExerciseKind,
        progress: ProgressSnapshot,
    },
    Error {
        message: String,
    },
}

/// What the learner sees of a task. Never contains the answer.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "exercise", rename_all = "snake_case")]
pub enum TaskOut {
    GapFill {
        stanza: usize,
        text_with_gaps: String,
        gap_count: usize,
    },
    Reorder {
        sub_level: u8,
        completed: usize,
        shuffled: LineStructure,
    },
    Sequence {
        stanzas: Vec<usize>,
        words: Vec<String>,
    },
}

/// Revealed answer of a checked task.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "exercise", rename_all = "snake_case")]
pub enum SolutionOut {
    GapFill { words: Vec<String> },
    Reorder { answer: LineStructure },
    Sequence { words: Vec<String>, lines: Vec<String> },
}

pub fn gap_fill_out(p: &GapFillPuzzle) -> TaskOut {
    TaskOut::GapFill {
        stanza: p.stanza(),
        text_with_gaps: p.text_with_gaps().to_string(),
        gap_count: p.blanks().len(),
    }
}

pub fn reorder_out(p: &ReorderPuzzle) -> TaskOut {
    TaskOut::Reorder {
        sub_level: p.sub_level(),
        completed: p.completed(),
        shuffled: p.shuffled().clone(),
    }
}

pub fn sequence_out(p: &SequencePuzzle) -> TaskOut {
    TaskOut::Sequence {
        stanzas: p.selected().to_vec(),
        words: p.shuffled().to_vec(),
    }
}

pub fn task_out(session: &Session, kind: ExerciseKind) -> TaskOut {
    match kind {
        ExerciseKind::GapFill => gap_fill_out(&session.gap_fill),
        ExerciseKind::Reorder => reorder_out(&session.reorder),
        ExerciseKind::Sequence => sequence_out(&session.sequence),
    }
}

/// Must be called before the next task is prepared.
pub fn solution_out(session: &Session, kind: ExerciseKind) -> SolutionOut {
    match kind {
        ExerciseKind::GapFill => SolutionOut::GapFill {
            words: session.gap_fill.expected_words(),
        },
        ExerciseKind::Reorder => SolutionOut::Reorder {
            answer: session.reorder.original().clone(),
        },
        ExerciseKind::Sequence => SolutionOut::Sequence {
            words: session.sequence.sequence_words(),
            lines: session.sequence.original_lines(),
        },
    }
}
