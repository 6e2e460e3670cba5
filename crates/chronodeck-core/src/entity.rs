//! Pause-aware elapsed/remaining time computation.
//!
//! A [`TemporalEntity`] is a pure state machine over a monotonic clock. It
//! holds no thread and schedules nothing; the caller reads
//! `elapsed_ms`/`remaining_ms` once per frame and forwards button
//! interactions to `start`/`pause`/`resume`/`reset`.
//!
//! Elapsed time is drift-free under arbitrary pause patterns:
//!
//! ```text
//! elapsed = (now - start) - accumulated_pause - (paused ? now - pause_start : 0)
//! ```
//!
//! with `elapsed == 0` while unstarted and defensive clamping so the value is
//! never negative.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::clock::ClockSource;
use crate::format::{format_hms, format_hms_centis};

/// Stable opaque identifier for a timer or stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Counts down from a fixed duration.
    Timer,
    /// Counts up indefinitely.
    Stopwatch,
}

/// Shared timer/stopwatch state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalEntity {
    id: EntityId,
    kind: EntityKind,
    /// Count-down target; `None` for stopwatches.
    duration_ms: Option<u64>,
    /// Clock reading when the entity was started; `None` until `start()`.
    start_epoch_ms: Option<u64>,
    /// Total time spent paused since the last reset, excluding any
    /// still-open pause.
    accumulated_pause_ms: u64,
    /// Clock reading when the current pause began; `Some` while paused.
    pause_start_ms: Option<u64>,
    label: String,
}

impl TemporalEntity {
    pub fn timer(duration_ms: u64, label: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            kind: EntityKind::Timer,
            duration_ms: Some(duration_ms),
            start_epoch_ms: None,
            accumulated_pause_ms: 0,
            pause_start_ms: None,
            label: label.into(),
        }
    }

    pub fn stopwatch(label: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            kind: EntityKind::Stopwatch,
            duration_ms: None,
            start_epoch_ms: None,
            accumulated_pause_ms: 0,
            pause_start_ms: None,
            label: label.into(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    pub fn is_started(&self) -> bool {
        self.start_epoch_ms.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.pause_start_ms.is_some()
    }

    /// True running time since the last reset. Zero while unstarted, frozen
    /// while paused, never negative.
    pub fn elapsed_ms(&self, clock: &dyn ClockSource) -> u64 {
        let Some(start) = self.start_epoch_ms else {
            return 0;
        };
        let now = clock.now_ms();
        let mut paused = self.accumulated_pause_ms;
        if let Some(pause_start) = self.pause_start_ms {
            paused = paused.saturating_add(now.saturating_sub(pause_start));
        }
        now.saturating_sub(start).saturating_sub(paused)
    }

    /// Time left before the count-down target, clamped at zero. `None` for
    /// stopwatches.
    pub fn remaining_ms(&self, clock: &dyn ClockSource) -> Option<u64> {
        self.duration_ms
            .map(|d| d.saturating_sub(self.elapsed_ms(clock)))
    }

    /// A timer is done once its elapsed time reaches the target. Stopwatches
    /// are never done.
    pub fn is_done(&self, clock: &dyn ClockSource) -> bool {
        match self.duration_ms {
            Some(d) => self.elapsed_ms(clock) >= d,
            None => false,
        }
    }

    /// Fraction of the count-down consumed, clamped to `0.0..=1.0`.
    /// Always `0.0` for stopwatches.
    pub fn progress(&self, clock: &dyn ClockSource) -> f64 {
        match self.duration_ms {
            Some(d) if d > 0 => (self.elapsed_ms(clock) as f64 / d as f64).min(1.0),
            _ => 0.0,
        }
    }

    /// Display string for the current reading: remaining `HH:MM:SS` for
    /// timers, elapsed `HH:MM:SS.cc` for stopwatches.
    pub fn display_time(&self, clock: &dyn ClockSource) -> String {
        match self.kind {
            EntityKind::Timer => {
                format_hms(self.remaining_ms(clock).unwrap_or(0) / 1000)
            }
            EntityKind::Stopwatch => format_hms_centis(self.elapsed_ms(clock)),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Re-target the count-down duration. Used by the pomodoro cycle when it
    /// re-purposes its entity for the next phase.
    pub fn set_duration_ms(&mut self, duration_ms: u64) {
        self.duration_ms = Some(duration_ms);
    }

    /// Record the start epoch. No-op if already started, so accumulated
    /// progress is never lost to a double start.
    pub fn start(&mut self, clock: &dyn ClockSource) -> bool {
        if self.start_epoch_ms.is_some() {
            return false;
        }
        self.start_epoch_ms = Some(clock.now_ms());
        debug!(id = %self.id, label = %self.label, "entity started");
        true
    }

    /// Open a pause. Idempotent: a second `pause()` is a no-op.
    pub fn pause(&mut self, clock: &dyn ClockSource) -> bool {
        if self.pause_start_ms.is_some() {
            return false;
        }
        self.pause_start_ms = Some(clock.now_ms());
        true
    }

    /// Close the open pause, folding it into the accumulated total.
    /// No-op if not paused.
    pub fn resume(&mut self, clock: &dyn ClockSource) -> bool {
        let Some(pause_start) = self.pause_start_ms.take() else {
            return false;
        };
        let paused_for = clock.now_ms().saturating_sub(pause_start);
        self.accumulated_pause_ms = self.accumulated_pause_ms.saturating_add(paused_for);
        true
    }

    /// Return to the unstarted state. The audio side effect of a reset is
    /// handled by the controller via
    /// [`AudioCueScheduler::release`](crate::audio::AudioCueScheduler::release).
    pub fn reset(&mut self) -> bool {
        let changed = self.start_epoch_ms.is_some()
            || self.accumulated_pause_ms != 0
            || self.pause_start_ms.is_some();
        self.start_epoch_ms = None;
        self.accumulated_pause_ms = 0;
        self.pause_start_ms = None;
        if changed {
            debug!(id = %self.id, label = %self.label, "entity reset");
        }
        changed
    }
}
