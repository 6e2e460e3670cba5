//! # Chronodeck Core Library
//!
//! Temporal state engine and focus/window routing for the Chronodeck
//! productivity app: countdown timers, a stopwatch and a pomodoro work/break
//! cycle, each focusable into a fullscreen or detached popout view.
//!
//! ## Architecture
//!
//! - **Temporal entities**: pause-aware elapsed/remaining time computed as
//!   differences of a monotonic clock -- drift-free under arbitrary
//!   start/pause/resume/reset sequences, no internal threads
//! - **Pomodoro cycle**: work/break alternation built on one re-targeted
//!   entity, advanced once per frame
//! - **Audio cue scheduling**: serialised access to the host's single shared
//!   audio device, triggering the completion cue inside a lead-time window
//! - **Focus routing**: one exclusive fullscreen slot plus any number of
//!   independent popout windows, with deferred window-manager commands
//!
//! Everything runs single-threaded and frame-driven: the host calls
//! [`App::frame`] once per rendering tick and drains the produced [`Event`]s.
//!
//! ## Key Components
//!
//! - [`App`]: top-level controller owning all shared state
//! - [`TemporalEntity`]: timer/stopwatch state machine
//! - [`PomodoroCycle`]: work/break state machine
//! - [`AudioCueScheduler`]: completion cue arbitration
//! - [`FocusRouter`]: focus state and popout lifecycle

pub mod app;
pub mod audio;
pub mod clock;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod focus;
pub mod format;
pub mod pomodoro;

pub use app::App;
pub use audio::{AudioCueScheduler, AudioSink, CueTrigger, DEFAULT_LEAD_TIME_MS};
pub use clock::{ClockSource, ManualClock, MonotonicClock};
pub use config::Config;
pub use entity::{EntityId, EntityKind, TemporalEntity};
pub use error::{ConfigError, CoreError, ValidationError, WindowError};
pub use events::Event;
pub use focus::{
    FocusKind, FocusRouter, FocusState, FocusType, PopoutWindow, WindowCommand, WindowHandle,
    WindowManager,
};
pub use pomodoro::{PomodoroCycle, PomodoroPhase};
