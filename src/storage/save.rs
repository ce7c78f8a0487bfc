//! Debounced save coordination.
//!
//! Rapid successive edits must produce a single durable write, so flushes
//! are deferred behind a fixed delay and every new mutation supersedes the
//! previously armed deadline. The coordinator is a plain state machine
//! driven by the store's single logical owner; no store reference ever
//! crosses an execution context. A cancelled deadline performs no write
//! and raises no error.

use std::time::{Duration, Instant};

/// Delay between the last mutation and the deferred flush.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_secs(3);

/// Flush scheduling state. At most one flush is ever pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Pending { due: Instant },
}

/// Schedules deferred, coalesced flushes of the entity store.
#[derive(Debug)]
pub struct SaveCoordinator {
    state: SaveState,
    delay: Duration,
}

impl SaveCoordinator {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            state: SaveState::Idle,
            delay,
        }
    }

    #[must_use]
    pub const fn with_default_delay() -> Self {
        Self::new(DEFAULT_SAVE_DELAY)
    }

    #[must_use]
    pub const fn state(&self) -> SaveState {
        self.state
    }

    /// Arm (or re-arm) the deferred flush. Any previously pending deadline
    /// is replaced, never stacked.
    pub fn record_mutation(&mut self, now: Instant) {
        self.state = SaveState::Pending { due: now + self.delay };
    }

    /// The instant the owner should next call [`Self::take_due`], if any.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            SaveState::Idle => None,
            SaveState::Pending { due } => Some(due),
        }
    }

    /// Consume the pending deadline if it has come due. Returns `true`
    /// exactly once per armed deadline; the caller then performs the
    /// flush.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.state {
            SaveState::Pending { due } if now >= due => {
                self.state = SaveState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Silently drop a pending flush. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        let was_pending = matches!(self.state, SaveState::Pending { .. });
        self.state = SaveState::Idle;
        was_pending
    }
}

impl Default for SaveCoordinator {
    fn default() -> Self {
        Self::with_default_delay()
    }
}
