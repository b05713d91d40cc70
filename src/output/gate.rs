use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::foundation::error::{BadgeError, BadgeResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum GateState {
    #[default]
    Open,
    Closed,
    Committed,
}

/// Single-use admission point for publishing one artifact.
///
/// Stores run the step that makes an artifact visible (rename, insert) through
/// [`admit`](Self::admit). Whoever owns the label calls [`close`](Self::close) to abandon it.
/// The two are serialized, so after `close` returns `true` nothing is published for that label,
/// and after it returns `false` the artifact is already visible.
#[derive(Debug, Default)]
pub struct PublishGate {
    state: Mutex<GateState>,
}

impl PublishGate {
    /// Open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `true` once the gate has been closed.
    pub fn is_closed(&self) -> bool {
        *self.lock() == GateState::Closed
    }

    /// Run `commit` while holding the gate, unless it is closed.
    ///
    /// A closed gate fails with [`BadgeError::Timeout`] without calling `commit`.
    pub fn admit<T>(&self, commit: impl FnOnce() -> BadgeResult<T>) -> BadgeResult<T> {
        let mut state = self.lock();
        if *state == GateState::Closed {
            return Err(BadgeError::timeout(
                "batch deadline elapsed before the badge was published",
            ));
        }
        let out = commit()?;
        *state = GateState::Committed;
        Ok(out)
    }

    /// Close the gate, waiting for a commit in flight.
    ///
    /// Returns `false` when a commit already went through.
    pub fn close(&self) -> bool {
        let mut state = self.lock();
        if *state == GateState::Committed {
            return false;
        }
        *state = GateState::Closed;
        true
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        // The state is a single Copy value, so a poisoned lock still holds a valid one.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/gate.rs"]
mod tests;
