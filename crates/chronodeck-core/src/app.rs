//! Top-level application controller.
//!
//! The [`App`] owns every piece of shared state -- entity collections, the
//! focus router, the cue scheduler and the clock -- and is passed by
//! reference to whatever needs it. The host hands in its audio and window
//! collaborators each frame; nothing here is a global.
//!
//! Execution is single-threaded and frame-driven: [`App::frame`] makes
//! exactly one pass over the pomodoro state machine, the audio cue schedule
//! and the deferred window commands, then hands the accumulated events back
//! to the host.

use chrono::Utc;
use tracing::warn;

use crate::audio::{AudioCueScheduler, AudioSink};
use crate::clock::ClockSource;
use crate::entity::{EntityId, TemporalEntity};
use crate::error::ValidationError;
use crate::events::Event;
use crate::focus::{FocusKind, FocusRouter, FocusState, FocusType, WindowCommand, WindowHandle, WindowManager};
use crate::pomodoro::PomodoroCycle;

pub struct App<C: ClockSource> {
    clock: C,
    timers: Vec<TemporalEntity>,
    stopwatches: Vec<TemporalEntity>,
    pomodoro: Option<PomodoroCycle>,
    router: FocusRouter,
    cue: AudioCueScheduler,
    events: Vec<Event>,
}

impl<C: ClockSource> App<C> {
    pub fn new(clock: C) -> Self {
        Self::with_cue_lead_time(clock, crate::audio::DEFAULT_LEAD_TIME_MS)
    }

    pub fn with_cue_lead_time(clock: C, lead_time_ms: u64) -> Self {
        Self {
            clock,
            timers: Vec::new(),
            stopwatches: Vec::new(),
            pomodoro: None,
            router: FocusRouter::new(),
            cue: AudioCueScheduler::with_lead_time(lead_time_ms),
            events: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn timers(&self) -> &[TemporalEntity] {
        &self.timers
    }

    pub fn stopwatches(&self) -> &[TemporalEntity] {
        &self.stopwatches
    }

    pub fn pomodoro(&self) -> Option<&PomodoroCycle> {
        self.pomodoro.as_ref()
    }

    pub fn focus_state(&self) -> FocusState {
        self.router.state()
    }

    pub fn router(&self) -> &FocusRouter {
        &self.router
    }

    pub fn entity(&self, id: EntityId) -> Option<&TemporalEntity> {
        self.timers
            .iter()
            .chain(self.stopwatches.iter())
            .chain(self.pomodoro.as_ref().map(|c| c.active()))
            .find(|e| e.id() == id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut TemporalEntity> {
        find_entity_mut(
            &mut self.timers,
            &mut self.stopwatches,
            &mut self.pomodoro,
            id,
        )
    }

    // ── Entity collections ───────────────────────────────────────────

    pub fn add_timer(&mut self, duration_ms: u64, label: impl Into<String>) -> EntityId {
        let timer = TemporalEntity::timer(duration_ms, label);
        let id = timer.id();
        self.router.register(FocusKind::Timer, id);
        self.timers.push(timer);
        id
    }

    pub fn add_stopwatch(&mut self, label: impl Into<String>) -> EntityId {
        let stopwatch = TemporalEntity::stopwatch(label);
        let id = stopwatch.id();
        self.router.register(FocusKind::Stopwatch, id);
        self.stopwatches.push(stopwatch);
        id
    }

    /// Create the pomodoro cycle. At most one cycle exists at a time; a live
    /// cycle must finish or be removed first.
    pub fn start_pomodoro(
        &mut self,
        work_duration_ms: u64,
        break_duration_ms: u64,
        total_repeats: u32,
    ) -> Result<EntityId, ValidationError> {
        let cycle = PomodoroCycle::new(work_duration_ms, break_duration_ms, total_repeats)?;
        let id = cycle.active().id();
        if let Some(old) = self.pomodoro.take() {
            self.router.unregister(old.active().id());
        }
        self.router.register(FocusKind::Pomodoro, id);
        self.pomodoro = Some(cycle);
        Ok(id)
    }

    /// Remove an entity from its owning collection. This is the only form of
    /// cancellation: focus, popout and audio ownership are all released.
    pub fn remove_entity(&mut self, id: EntityId, sink: &mut dyn AudioSink) {
        self.cue.release(id, sink);
        self.router.unregister(id);
        self.timers.retain(|t| t.id() != id);
        self.stopwatches.retain(|s| s.id() != id);
        if self.pomodoro.as_ref().is_some_and(|c| c.active().id() == id) {
            self.pomodoro = None;
        }
    }

    // ── Interaction forwarding ───────────────────────────────────────

    pub fn start(&mut self, id: EntityId) {
        let Some(entity) =
            find_entity_mut(&mut self.timers, &mut self.stopwatches, &mut self.pomodoro, id)
        else {
            return;
        };
        let kind = entity.kind();
        if entity.start(&self.clock) {
            self.events.push(Event::EntityStarted {
                id,
                kind,
                at: Utc::now(),
            });
        }
    }

    pub fn pause(&mut self, id: EntityId) {
        let Some(entity) =
            find_entity_mut(&mut self.timers, &mut self.stopwatches, &mut self.pomodoro, id)
        else {
            return;
        };
        if entity.pause(&self.clock) {
            let elapsed_ms = entity.elapsed_ms(&self.clock);
            self.events.push(Event::EntityPaused {
                id,
                elapsed_ms,
                at: Utc::now(),
            });
        }
    }

    pub fn resume(&mut self, id: EntityId) {
        let Some(entity) =
            find_entity_mut(&mut self.timers, &mut self.stopwatches, &mut self.pomodoro, id)
        else {
            return;
        };
        if entity.resume(&self.clock) {
            let elapsed_ms = entity.elapsed_ms(&self.clock);
            self.events.push(Event::EntityResumed {
                id,
                elapsed_ms,
                at: Utc::now(),
            });
        }
    }

    /// Reset an entity and stop/rewind the completion cue if it owns it.
    pub fn reset(&mut self, id: EntityId, sink: &mut dyn AudioSink) {
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        if entity.reset() {
            self.events.push(Event::EntityReset { id, at: Utc::now() });
        }
        if self.cue.release(id, sink) {
            self.events.push(Event::CueStopped { id, at: Utc::now() });
        }
    }

    pub fn request_focus(&mut self, kind: FocusKind, id: EntityId, desired: FocusType) -> FocusState {
        let before = (self.router.state(), self.router.local_focus(id));
        let state = self.router.request_focus(kind, id, desired);
        if (state, self.router.local_focus(id)) != before {
            self.events.push(Event::FocusChanged {
                state,
                at: Utc::now(),
            });
        }
        state
    }

    /// External close event from the window manager, keyed by handle.
    pub fn window_closed(&mut self, handle: WindowHandle) {
        if let Some(popout) = self.router.on_window_closed(handle) {
            self.events.push(Event::PopoutClosed {
                kind: popout.kind,
                id: popout.id,
                at: Utc::now(),
            });
        }
    }

    // ── Frame loop ───────────────────────────────────────────────────

    /// The single cooperative pass over all entities and the router.
    /// Returns the events accumulated since the previous frame.
    pub fn frame(
        &mut self,
        sink: &mut dyn AudioSink,
        windows: &mut dyn WindowManager,
    ) -> Vec<Event> {
        self.advance_pomodoro(sink);
        self.poll_cues(sink);
        self.drain_window_commands(windows);
        std::mem::take(&mut self.events)
    }

    fn advance_pomodoro(&mut self, sink: &mut dyn AudioSink) {
        let Some(cycle) = self.pomodoro.as_mut() else {
            return;
        };
        let id = cycle.active().id();
        if let Some(phase) = cycle.advance(&self.clock) {
            // The cue that announced the old phase's end must not bleed into
            // the new phase.
            let (work, brk) = (cycle.work_completed(), cycle.break_completed());
            if self.cue.release(id, sink) {
                self.events.push(Event::CueStopped { id, at: Utc::now() });
            }
            self.events.push(Event::PhaseAdvanced {
                phase,
                work_completed: work,
                break_completed: brk,
                at: Utc::now(),
            });
        }
        let Some(cycle) = self.pomodoro.as_ref() else {
            return;
        };
        if cycle.is_done() {
            let (work, brk) = (cycle.work_completed(), cycle.break_completed());
            if self.cue.release(id, sink) {
                self.events.push(Event::CueStopped { id, at: Utc::now() });
            }
            // Tear down: unregistering releases the focus slot and flags the
            // popout (if one is live) for auto-close.
            self.router.unregister(id);
            self.pomodoro = None;
            self.events.push(Event::CycleCompleted {
                work_completed: work,
                break_completed: brk,
                at: Utc::now(),
            });
        }
    }

    fn poll_cues(&mut self, sink: &mut dyn AudioSink) {
        for timer in &self.timers {
            if let Some(trigger) = self.cue.poll(timer, &self.clock, sink) {
                self.events.push(Event::CueStarted {
                    id: timer.id(),
                    seek_secs: trigger.seek_secs,
                    at: Utc::now(),
                });
            }
        }
        if let Some(cycle) = self.pomodoro.as_ref() {
            if let Some(trigger) = self.cue.poll(cycle.active(), &self.clock, sink) {
                self.events.push(Event::CueStarted {
                    id: cycle.active().id(),
                    seek_secs: trigger.seek_secs,
                    at: Utc::now(),
                });
            }
        }
    }

    fn drain_window_commands(&mut self, windows: &mut dyn WindowManager) {
        for command in self.router.drain_commands() {
            match command {
                WindowCommand::Create { kind, id } => {
                    // The entity may have been removed between the request
                    // and this frame.
                    if !self.router.is_registered(id) {
                        continue;
                    }
                    match windows.create_window(kind, id) {
                        Ok(handle) => {
                            self.router.bind_popout(kind, id, handle);
                            self.events.push(Event::PopoutOpened {
                                kind,
                                id,
                                at: Utc::now(),
                            });
                        }
                        Err(e) => {
                            warn!(%id, error = %e, "popout creation failed");
                            self.router.abort_popout(id);
                            self.events.push(Event::PopoutFailed {
                                kind,
                                id,
                                at: Utc::now(),
                            });
                        }
                    }
                }
                WindowCommand::Destroy { handle } => {
                    windows.destroy_window(handle);
                    if let Some(popout) = self.router.on_window_closed(handle) {
                        self.events.push(Event::PopoutClosed {
                            kind: popout.kind,
                            id: popout.id,
                            at: Utc::now(),
                        });
                    }
                }
            }
        }
    }
}

/// Standalone lookup so callers can keep a disjoint borrow of the clock.
fn find_entity_mut<'a>(
    timers: &'a mut [TemporalEntity],
    stopwatches: &'a mut [TemporalEntity],
    pomodoro: &'a mut Option<PomodoroCycle>,
    id: EntityId,
) -> Option<&'a mut TemporalEntity> {
    timers
        .iter_mut()
        .chain(stopwatches.iter_mut())
        .chain(pomodoro.as_mut().map(|c| c.active_mut()))
        .find(|e| e.id() == id)
}
