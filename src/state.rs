//! Session state: one puzzle of each kind per learner session.
//!
//! This module owns:
//!   - the shared, immutable corpus
//!   - the session map (by UUID)
//!
//! The store is handed to every handler explicitly; nothing here is global.

use std::{collections::HashMap, sync::Arc};

use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Corpus, ExerciseKind};
use crate::error::DrillError;
use crate::exercises::{Exercise, GapFillPuzzle, ReorderPuzzle, SequencePuzzle};

pub struct Session {
    pub gap_fill: GapFillPuzzle,
    pub reorder: ReorderPuzzle,
    pub sequence: SequencePuzzle,
}

impl Session {
    /// Each puzzle gets its own RNG; with a seed they are derived from it so a
    /// session replays identically.
    pub fn new(corpus: Arc<Corpus>, seed: Option<u64>) -> Self {
        let rng_for = |offset: u64| match seed {
            Some(s) => StdRng::seed_from_u64(s.wrapping_add(offset)),
            None => StdRng::from_entropy(),
        };
        Self {
            gap_fill: GapFillPuzzle::new(corpus.clone(), rng_for(0)),
            reorder: ReorderPuzzle::new(corpus.clone(), rng_for(1)),
            sequence: SequencePuzzle::new(corpus, rng_for(2)),
        }
    }

    pub fn exercise(&self, kind: ExerciseKind) -> &dyn Exercise {
        match kind {
            ExerciseKind::GapFill => &self.gap_fill,
            ExerciseKind::Reorder => &self.reorder,
            ExerciseKind::Sequence => &self.sequence,
        }
    }

    pub fn exercise_mut(&mut self, kind: ExerciseKind) -> &mut dyn Exercise {
        match kind {
            ExerciseKind::GapFill => &mut self.gap_fill,
            ExerciseKind::Reorder => &mut self.reorder,
            ExerciseKind::Sequence => &mut self.sequence,
        }
    }
}

pub struct SessionStore {
    corpus: Arc<Corpus>,
    sessions: HashMap<String, Session>,
    default_seed: Option<u64>,
}

impl SessionStore {
    pub fn new(corpus: Corpus, default_seed: Option<u64>) -> Self {
        info!(target: "poem_trainer", stanzas = corpus.len(), seeded = default_seed.is_some(), "Session store ready");
        Self {
            corpus: Arc::new(corpus),
            sessions: HashMap::new(),
            default_seed,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Create a session with every puzzle already prepared. Returns its id.
    #[instrument(level = "info", skip(self))]
    pub fn open(&mut self, seed: Option<u64>) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(self.corpus.clone(), seed.or(self.default_seed));
        self.sessions.insert(id.clone(), session);
        info!(target: "poem_trainer", session = %id, open_sessions = self.sessions.len(), "Session opened");
        id
    }

    pub fn get(&self, id: &str) -> Result<&Session, DrillError> {
        self.sessions
            .get(id)
            .ok_or_else(|| DrillError::UnknownSession(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Session, DrillError> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| DrillError::UnknownSession(id.to_string()))
    }

    #[instrument(level = "info", skip(self))]
    pub fn close(&mut self, id: &str) -> Result<(), DrillError> {
        self.sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DrillError::UnknownSession(id.to_string()))?;
        info!(target: "poem_trainer", session = %id, open_sessions = self.sessions.len(), "Session closed");
        Ok(())
    }
}
