//! Work/break alternation built on a single re-targeted [`TemporalEntity`].
//!
//! ## State Transitions
//!
//! ```text
//! Work -> Break -> Work -> ... -> Work (final) -> done
//! ```
//!
//! The trigger is the active phase's entity running out; the cycle checks it
//! once per frame via [`PomodoroCycle::advance`]. There is no idle gap
//! between phases: the re-purposed entity is reset, relabeled and started in
//! the same transition.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::ClockSource;
use crate::entity::TemporalEntity;
use crate::error::ValidationError;
use crate::format::format_hms;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroPhase {
    Work,
    Break,
}

/// Alternating work/break cycle bounded by a repeat count.
///
/// Invariant: `break_completed <= work_completed <= total_repeats`, and the
/// active phase is Work exactly when the two counters are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroCycle {
    work_duration_ms: u64,
    break_duration_ms: u64,
    total_repeats: u32,
    work_completed: u32,
    break_completed: u32,
    active: TemporalEntity,
}

impl PomodoroCycle {
    /// Create a cycle starting with its first work phase, unstarted.
    ///
    /// Rejects `total_repeats == 0` and zero-length phases: the counters
    /// would satisfy the done-condition before any phase ran.
    pub fn new(
        work_duration_ms: u64,
        break_duration_ms: u64,
        total_repeats: u32,
    ) -> Result<Self, ValidationError> {
        if total_repeats == 0 {
            return Err(ValidationError::ZeroRepeats);
        }
        if work_duration_ms == 0 || break_duration_ms == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        let label = phase_label(PomodoroPhase::Work, 1, total_repeats, work_duration_ms);
        Ok(Self {
            work_duration_ms,
            break_duration_ms,
            total_repeats,
            work_completed: 0,
            break_completed: 0,
            active: TemporalEntity::timer(work_duration_ms, label),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> PomodoroPhase {
        if self.work_completed == self.break_completed {
            PomodoroPhase::Work
        } else {
            PomodoroPhase::Break
        }
    }

    pub fn work_completed(&self) -> u32 {
        self.work_completed
    }

    pub fn break_completed(&self) -> u32 {
        self.break_completed
    }

    pub fn total_repeats(&self) -> u32 {
        self.total_repeats
    }

    /// The entity backing the current phase.
    pub fn active(&self) -> &TemporalEntity {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut TemporalEntity {
        &mut self.active
    }

    /// Done after the final work phase: every repeat's work ran, and every
    /// gap between repeats got its break.
    pub fn is_done(&self) -> bool {
        self.work_completed == self.total_repeats
            && self.break_completed == self.total_repeats.saturating_sub(1)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Roll the state machine over if the active phase has run out.
    ///
    /// Called once per frame. Returns the phase that was entered, or `None`
    /// when nothing changed or the cycle just finished (the owner checks
    /// [`is_done`](Self::is_done) and tears the cycle down).
    pub fn advance(&mut self, clock: &dyn ClockSource) -> Option<PomodoroPhase> {
        if self.is_done() || !self.active.is_done(clock) {
            return None;
        }
        match self.phase() {
            PomodoroPhase::Work => self.work_completed += 1,
            PomodoroPhase::Break => self.break_completed += 1,
        }
        if self.is_done() {
            self.active.reset();
            debug!(
                work = self.work_completed,
                repeats = self.total_repeats,
                "pomodoro cycle finished"
            );
            return None;
        }
        let next = self.phase();
        let (duration_ms, index, total) = match next {
            PomodoroPhase::Work => (
                self.work_duration_ms,
                self.work_completed + 1,
                self.total_repeats,
            ),
            // The final repeat has no trailing break, so break phases count
            // out of total_repeats - 1.
            PomodoroPhase::Break => (
                self.break_duration_ms,
                self.break_completed + 1,
                self.total_repeats - 1,
            ),
        };
        self.active.set_duration_ms(duration_ms);
        self.active.reset();
        self.active.set_label(phase_label(next, index, total, duration_ms));
        self.active.start(clock);
        debug!(phase = ?next, index, total, "pomodoro phase started");
        Some(next)
    }
}

fn phase_label(phase: PomodoroPhase, index: u32, total: u32, duration_ms: u64) -> String {
    let name = match phase {
        PomodoroPhase::Work => "work",
        PomodoroPhase::Break => "break",
    };
    format!(
        "{index}/{total} {name} session - {}",
        format_hms(duration_ms / 1000)
    )
}
