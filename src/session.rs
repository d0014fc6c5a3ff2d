//! Generation Session
//! Per-generator API keys and output slots, plus the shared last-error slot.

use crate::dify::{GenerationKind, GenerationOutcome};

/// One value per [`GenerationKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerKind<T> {
    slots: [T; 3],
}

impl<T> PerKind<T> {
    pub fn get(&self, kind: GenerationKind) -> &T {
        &self.slots[kind.index()]
    }

    pub fn get_mut(&mut self, kind: GenerationKind) -> &mut T {
        &mut self.slots[kind.index()]
    }
}

/// In-memory state shared by the three generator tabs. Nothing here is persisted.
#[derive(Debug, Default)]
pub struct Session {
    pub api_keys: PerKind<String>,
    pub outputs: PerKind<String>,
    pub last_error: Option<String>,
    in_flight: PerKind<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a request for `kind` was sent.
    pub fn request_started(&mut self, kind: GenerationKind) {
        *self.in_flight.get_mut(kind) += 1;
    }

    pub fn is_pending(&self, kind: GenerationKind) -> bool {
        *self.in_flight.get(kind) > 0
    }

    pub fn any_pending(&self) -> bool {
        GenerationKind::ALL.iter().any(|k| self.is_pending(*k))
    }

    /// Apply a finished request. Success overwrites the kind's output and
    /// clears the error; failure only replaces the error.
    pub fn apply_outcome(&mut self, outcome: GenerationOutcome) {
        let pending = self.in_flight.get_mut(outcome.kind);
        *pending = pending.saturating_sub(1);

        match outcome.result {
            Ok(answer) => {
                *self.outputs.get_mut(outcome.kind) = answer;
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }
}
