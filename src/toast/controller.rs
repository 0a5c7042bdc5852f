//! Toast lifecycle state machine.
//!
//! ```text
//! Closed(reset) --open--> Open --(auto-dismiss | close)--> Closed(leaving)
//! Closed(leaving) --finalize--> Closed(reset, surface hidden)
//! Closed(leaving) --open--> Open (finalize cancelled, entrance resumes)
//! Open --open--> Open (content and auto-dismiss replaced)
//! ```
//!
//! Closing is two-phase: `close()` flips [`DisplayState`] at once so the exit
//! transition can start, while the surface stays open and keeps its content
//! until the finalize timer fires `transition_duration` later.
//!
//! Every operation has an `*_at(now)` form taking the current instant so the
//! host (or a test) decides how time advances. Timers never fire on their
//! own: call [`ToastController::tick`] from an event loop, or run the
//! controller on [`driver`](super::driver).

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

use super::color::ToastColor;
use super::content::Content;
use super::options::OpenOptions;
use super::timer::{TimerHandle, TimerPurpose, TimerSlot};

/// Auto-dismiss delay used when an `open` call does not supply one.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);
/// Length of the entrance and exit transitions.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// Logical visibility. Changes synchronously on `open`/`close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    #[default]
    Closed,
    Open,
}

/// Where the entrance/exit animation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPhase {
    #[default]
    Hidden,
    Entering,
    Shown,
    Leaving,
}

/// Point-in-time view of a toast, for rendering and reporting.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ToastSnapshot {
    pub state: DisplayState,
    /// What `is_open()` reported.
    pub surface_open: bool,
    pub content: String,
    pub color: Option<ToastColor>,
    pub duration_ms: u64,
    pub phase: TransitionPhase,
    /// Visible fraction, 0.0 (hidden) to 1.0 (fully shown).
    pub visibility: f32,
    pub auto_dismiss_in_ms: Option<u64>,
    pub finalize_in_ms: Option<u64>,
}

impl ToastSnapshot {
    pub fn is_visible(&self) -> bool {
        self.state == DisplayState::Open
    }
}

#[derive(Debug, Clone)]
pub struct ToastController {
    state: DisplayState,
    surface_open: bool,
    content: Content,
    color: Option<ToastColor>,
    duration: Duration,
    default_duration: Duration,
    transition_duration: Duration,
    /// Start of the running entrance (state Open) or exit (state Closed).
    transition_started: Option<Instant>,
    auto_dismiss: TimerSlot,
    finalize: TimerSlot,
    generation: u64,
}

impl Default for ToastController {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastController {
    pub fn new() -> Self {
        Self {
            state: DisplayState::Closed,
            surface_open: false,
            content: Content::default(),
            color: None,
            duration: DEFAULT_DURATION,
            default_duration: DEFAULT_DURATION,
            transition_duration: DEFAULT_TRANSITION_DURATION,
            transition_started: None,
            auto_dismiss: TimerSlot::new(TimerPurpose::AutoDismiss),
            finalize: TimerSlot::new(TimerPurpose::FinalizeClose),
            generation: 0,
        }
    }

    pub fn with_transition_duration(mut self, duration: Duration) -> Self {
        self.set_transition_duration(duration);
        self
    }

    /// Auto-dismiss delay restored on every reset. Zero is ignored.
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        if duration.is_zero() {
            debug!("ignoring zero default duration");
        } else {
            self.default_duration = duration;
            self.duration = duration;
        }
        self
    }

    /// Zero is ignored; the transition length must be positive.
    pub fn set_transition_duration(&mut self, duration: Duration) {
        if duration.is_zero() {
            debug!("ignoring zero transition duration");
            return;
        }
        self.transition_duration = duration;
    }

    pub fn open(&mut self, options: &OpenOptions) -> TimerHandle {
        self.open_at(options, Instant::now())
    }

    /// Show the toast with `options` and schedule its auto-dismiss.
    ///
    /// Re-opening an open toast replaces content and restarts the
    /// auto-dismiss timer without restarting the entrance. Re-opening a
    /// closing toast cancels the pending finalize so the newer content is
    /// never reset by it.
    pub fn open_at(&mut self, options: &OpenOptions, now: Instant) -> TimerHandle {
        if let Some(text) = options.message() {
            self.content = Content::new(text);
        }
        if let Some(duration) = options.auto_dismiss() {
            self.duration = duration;
        }
        if let Some(color) = ToastColor::resolve(options.explicit_color(), options.category) {
            self.color = Some(color);
        }

        if let Some(stale) = self.finalize.cancel() {
            debug!(generation = stale.generation, "open cancelled pending finalize");
        }

        match (self.state, self.surface_open) {
            (DisplayState::Open, _) => {}
            (DisplayState::Closed, true) => {
                // Resume the entrance from however much is still visible.
                let visible = self.visibility_at(now);
                self.transition_started =
                    Some(backdate(now, self.transition_duration.mul_f32(visible)));
            }
            (DisplayState::Closed, false) => self.transition_started = Some(now),
        }
        self.state = DisplayState::Open;
        self.surface_open = true;

        let handle = self.arm(TimerPurpose::AutoDismiss, now + self.duration);
        debug!(
            duration_ms = self.duration.as_millis() as u64,
            generation = handle.generation,
            "toast opened"
        );
        handle
    }

    pub fn close(&mut self) -> TimerHandle {
        self.close_at(Instant::now())
    }

    /// Start the exit transition and schedule the finalize timer.
    ///
    /// Content stays in place until finalize fires. Closing an already
    /// closed toast only re-arms finalize.
    pub fn close_at(&mut self, now: Instant) -> TimerHandle {
        self.auto_dismiss.cancel();

        if self.state == DisplayState::Open {
            let visible = self.visibility_at(now);
            self.transition_started = Some(backdate(
                now,
                self.transition_duration.mul_f32(1.0 - visible),
            ));
            self.state = DisplayState::Closed;
        }

        let handle = self.arm(TimerPurpose::FinalizeClose, now + self.transition_duration);
        debug!(generation = handle.generation, "toast closing");
        handle
    }

    /// Apply a timer callback. Returns `false` when the handle is not yet
    /// due or has been superseded by a later `open`/`close`.
    pub fn fire(&mut self, handle: TimerHandle, now: Instant) -> bool {
        if !handle.is_due(now) {
            return false;
        }
        let slot = self.slot_mut(handle.purpose);
        if !slot.is_current(&handle) {
            debug!(
                purpose = ?handle.purpose,
                generation = handle.generation,
                "ignoring stale timer"
            );
            return false;
        }
        slot.cancel();

        match handle.purpose {
            TimerPurpose::AutoDismiss => {
                debug!("auto-dismiss elapsed");
                self.close_at(handle.deadline);
            }
            TimerPurpose::FinalizeClose => self.finalize(),
        }
        true
    }

    /// Fire every timer whose deadline is at or before `now`, earliest
    /// first. Returns the purposes that fired.
    pub fn tick(&mut self, now: Instant) -> Vec<TimerPurpose> {
        let mut fired = Vec::new();
        while let Some(handle) = self.earliest_pending().filter(|h| h.is_due(now)) {
            if !self.fire(handle, now) {
                break;
            }
            fired.push(handle.purpose);
        }
        fired
    }

    /// Deadline of the next pending timer, for hosts that sleep until then.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.earliest_pending().map(|handle| handle.deadline)
    }

    pub fn pending(&self, purpose: TimerPurpose) -> Option<TimerHandle> {
        match purpose {
            TimerPurpose::AutoDismiss => self.auto_dismiss.pending(),
            TimerPurpose::FinalizeClose => self.finalize.pending(),
        }
    }

    /// Whether the presentation surface is open. Stays true through the
    /// exit transition until finalize fires.
    pub fn is_open(&self) -> bool {
        self.surface_open
    }

    /// The "is-visible" flag, mirroring [`DisplayState`].
    pub fn is_visible(&self) -> bool {
        self.state == DisplayState::Open
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// `None` means the host's primary color.
    pub fn color(&self) -> Option<&ToastColor> {
        self.color.as_ref()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn transition_duration(&self) -> Duration {
        self.transition_duration
    }

    pub fn phase_at(&self, now: Instant) -> (TransitionPhase, f32) {
        if !self.surface_open {
            return (TransitionPhase::Hidden, 0.0);
        }
        let progress = self
            .transition_started
            .map_or(1.0, |start| {
                ratio(now.saturating_duration_since(start), self.transition_duration)
            });

        match self.state {
            DisplayState::Open if progress >= 1.0 => (TransitionPhase::Shown, 1.0),
            DisplayState::Open => (TransitionPhase::Entering, progress),
            DisplayState::Closed => (TransitionPhase::Leaving, 1.0 - progress),
        }
    }

    pub fn snapshot(&self) -> ToastSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> ToastSnapshot {
        let (phase, visibility) = self.phase_at(now);
        let millis = |d: Duration| d.as_millis() as u64;
        ToastSnapshot {
            state: self.state,
            surface_open: self.surface_open,
            content: self.content.as_str().to_string(),
            color: self.color.clone(),
            duration_ms: millis(self.duration),
            phase,
            visibility,
            auto_dismiss_in_ms: self.auto_dismiss.remaining(now).map(millis),
            finalize_in_ms: self.finalize.remaining(now).map(millis),
        }
    }

    fn visibility_at(&self, now: Instant) -> f32 {
        self.phase_at(now).1
    }

    fn finalize(&mut self) {
        self.surface_open = false;
        self.transition_started = None;
        self.content.clear();
        self.duration = self.default_duration;
        self.color = None;
        debug!("toast hidden and reset");
    }

    fn arm(&mut self, purpose: TimerPurpose, deadline: Instant) -> TimerHandle {
        self.generation += 1;
        let generation = self.generation;
        self.slot_mut(purpose).arm(generation, deadline)
    }

    fn slot_mut(&mut self, purpose: TimerPurpose) -> &mut TimerSlot {
        match purpose {
            TimerPurpose::AutoDismiss => &mut self.auto_dismiss,
            TimerPurpose::FinalizeClose => &mut self.finalize,
        }
    }

    fn earliest_pending(&self) -> Option<TimerHandle> {
        [self.auto_dismiss.pending(), self.finalize.pending()]
            .into_iter()
            .flatten()
            .min_by_key(|handle| handle.deadline)
    }
}

fn ratio(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).min(1.0)
}

fn backdate(now: Instant, by: Duration) -> Instant {
    now.checked_sub(by).unwrap_or(now)
}
