//! Per-purpose timer slots.
//!
//! A slot holds at most one pending [`TimerHandle`]. Arming replaces the
//! previous handle; a handle only counts as current while its generation
//! matches the one stored in the slot, so a callback scheduled by an older
//! `open`/`close` can be recognized and dropped.

use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPurpose {
    /// Fires `close()` after the auto-dismiss duration.
    AutoDismiss,
    /// Hides the surface and resets content once the exit transition ends.
    FinalizeClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub purpose: TimerPurpose,
    pub generation: u64,
    pub deadline: Instant,
}

impl TimerHandle {
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline <= now
    }
}

#[derive(Debug, Clone)]
pub struct TimerSlot {
    purpose: TimerPurpose,
    pending: Option<TimerHandle>,
}

impl TimerSlot {
    pub fn new(purpose: TimerPurpose) -> Self {
        Self {
            purpose,
            pending: None,
        }
    }

    /// Arm the slot, replacing whatever was pending.
    pub fn arm(&mut self, generation: u64, deadline: Instant) -> TimerHandle {
        let handle = TimerHandle {
            purpose: self.purpose,
            generation,
            deadline,
        };
        if let Some(previous) = self.pending.replace(handle) {
            tracing::trace!(
                purpose = ?self.purpose,
                superseded = previous.generation,
                generation,
                "timer re-armed"
            );
        }
        handle
    }

    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    pub fn is_current(&self, handle: &TimerHandle) -> bool {
        self.pending
            .is_some_and(|p| p.purpose == handle.purpose && p.generation == handle.generation)
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|handle| handle.deadline.saturating_duration_since(now))
    }
}
