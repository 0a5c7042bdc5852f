use chrono::{DateTime, Local};
use std::collections::VecDeque;

use crate::toast::{DisplayState, ToastSnapshot};

/// Number of entries kept on screen
const CAPACITY: usize = 200;

/// One line of the activity panel
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

/// Recent lifecycle changes of the demo toast, newest first
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    /// (state, surface_open) at the last observation
    last_seen: Option<(DisplayState, bool)>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push_front(ActivityEntry {
            at: Local::now(),
            message: message.into(),
        });
        self.entries.truncate(CAPACITY);
    }

    /// Record a line when the toast's state or surface flag changed since
    /// the last call. Returns whether anything was recorded.
    pub fn observe(&mut self, snapshot: &ToastSnapshot) -> bool {
        let current = (snapshot.state, snapshot.surface_open);
        if self.last_seen == Some(current) {
            return false;
        }
        self.last_seen = Some(current);

        let message = match current {
            (DisplayState::Open, _) => "state → open",
            (DisplayState::Closed, true) => "state → closed (animating out)",
            (DisplayState::Closed, false) => "surface hidden, content reset",
        };
        self.push(message);
        true
    }

    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(state: DisplayState, surface_open: bool) -> ToastSnapshot {
        ToastSnapshot {
            state,
            surface_open,
            ..ToastSnapshot::default()
        }
    }

    #[test]
    fn test_observe_records_only_changes() {
        let mut log = ActivityLog::new();
        assert!(log.observe(&snapshot(DisplayState::Closed, false)));
        assert!(!log.observe(&snapshot(DisplayState::Closed, false)));
        assert!(log.observe(&snapshot(DisplayState::Open, true)));
        assert!(log.observe(&snapshot(DisplayState::Closed, true)));
        assert!(log.observe(&snapshot(DisplayState::Closed, false)));
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_newest_first() {
        let mut log = ActivityLog::new();
        log.push("first");
        log.push("second");
        let messages: Vec<&str> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn test_capacity_is_bounded() {
        let mut log = ActivityLog::new();
        for i in 0..(CAPACITY + 10) {
            log.push(format!("entry {i}"));
        }
        assert_eq!(log.len(), CAPACITY);
    }
}
