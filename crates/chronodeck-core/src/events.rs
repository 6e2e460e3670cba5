use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, EntityKind};
use crate::focus::{FocusKind, FocusState};
use crate::pomodoro::PomodoroPhase;

/// Every externally visible state change produces an Event.
/// The host drains them once per frame from [`App::frame`](crate::app::App::frame).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    EntityStarted {
        id: EntityId,
        kind: EntityKind,
        at: DateTime<Utc>,
    },
    EntityPaused {
        id: EntityId,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    EntityResumed {
        id: EntityId,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    EntityReset {
        id: EntityId,
        at: DateTime<Utc>,
    },
    /// The pomodoro cycle rolled over into a new phase.
    PhaseAdvanced {
        phase: PomodoroPhase,
        work_completed: u32,
        break_completed: u32,
        at: DateTime<Utc>,
    },
    /// The pomodoro cycle ran its final work phase and was torn down.
    CycleCompleted {
        work_completed: u32,
        break_completed: u32,
        at: DateTime<Utc>,
    },
    /// The completion cue started sounding for an entity.
    CueStarted {
        id: EntityId,
        /// Seek offset applied when the timer is shorter than the lead time.
        seek_secs: Option<f64>,
        at: DateTime<Utc>,
    },
    /// The completion cue was stopped and rewound.
    CueStopped {
        id: EntityId,
        at: DateTime<Utc>,
    },
    /// The global focus slot changed.
    FocusChanged {
        state: FocusState,
        at: DateTime<Utc>,
    },
    PopoutOpened {
        kind: FocusKind,
        id: EntityId,
        at: DateTime<Utc>,
    },
    PopoutClosed {
        kind: FocusKind,
        id: EntityId,
        at: DateTime<Utc>,
    },
    /// The window manager could not create the popout surface; the request
    /// was dropped and the entity's focus flag reverted.
    PopoutFailed {
        kind: FocusKind,
        id: EntityId,
        at: DateTime<Utc>,
    },
}
