//! One-shot completion signal for a single build attempt.

use std::path::PathBuf;

use parking_lot::{Condvar, Mutex};

/// State of a build as seen by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    /// A builder owns the slot and has not finished.
    Pending,
    /// Artifact fully written at this path.
    Ready(PathBuf),
    /// The build failed; the slot is already out of the cache.
    Failed(String),
}

impl BuildState {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Ready(path) => Some(path),
            _ => None,
        }
    }
}

/// Completed exactly once by its builder, awaited by any number of threads.
///
/// Every claim creates a new slot, so a retry after failure never shares a
/// signal with the attempt that failed.
#[derive(Debug)]
pub struct BuildSlot {
    state: Mutex<BuildState>,
    done: Condvar,
}

impl BuildSlot {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BuildState::Pending),
            done: Condvar::new(),
        }
    }

    /// Current state without blocking on completion.
    pub fn state(&self) -> BuildState {
        self.state.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.state.lock(), BuildState::Pending)
    }

    /// Move out of `Pending` and wake every waiter.
    ///
    /// Returns `false` (and changes nothing) if already completed.
    pub fn complete(&self, outcome: BuildState) -> bool {
        let mut state = self.state.lock();
        if !matches!(*state, BuildState::Pending) || matches!(outcome, BuildState::Pending) {
            return false;
        }
        *state = outcome;
        self.done.notify_all();
        true
    }

    /// Block until the slot is completed and return the outcome.
    pub fn wait(&self) -> BuildState {
        let mut state = self.state.lock();
        while matches!(*state, BuildState::Pending) {
            self.done.wait(&mut state);
        }
        state.clone()
    }
}

impl Default for BuildSlot {
    fn default() -> Self {
        Self::new()
    }
}
