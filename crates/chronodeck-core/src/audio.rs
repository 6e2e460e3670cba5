//! Completion cue scheduling for the shared audio device.
//!
//! The sink is a process-wide singleton owned by the host; the scheduler
//! serialises access so at most one entity is the "currently sounding" owner
//! at a time. Ownership is first-come: whichever timer-like entity first
//! crosses its lead-time threshold takes the sink, and poll requests from
//! other entities are ignored until the owner is released by a reset, a
//! phase rollover or teardown.

use tracing::debug;

use crate::clock::ClockSource;
use crate::entity::{EntityId, TemporalEntity};

/// How far before completion the cue starts, so the audible build-up lands
/// on the entity's own end.
pub const DEFAULT_LEAD_TIME_MS: u64 = 10_500;

/// Shared audio device surface, as exposed by the host.
pub trait AudioSink {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, seconds: f64);
    fn is_playing(&self) -> bool;
}

/// Record of a cue trigger, for event reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueTrigger {
    /// Seek offset applied before `play()` when the timer was shorter than
    /// the lead time.
    pub seek_secs: Option<f64>,
}

/// Decides when to trigger and stop the shared completion cue.
#[derive(Debug)]
pub struct AudioCueScheduler {
    lead_time_ms: u64,
    /// Entity currently owning playback, if any.
    owner: Option<EntityId>,
}

impl AudioCueScheduler {
    pub fn new() -> Self {
        Self::with_lead_time(DEFAULT_LEAD_TIME_MS)
    }

    pub fn with_lead_time(lead_time_ms: u64) -> Self {
        Self {
            lead_time_ms,
            owner: None,
        }
    }

    pub fn lead_time_ms(&self) -> u64 {
        self.lead_time_ms
    }

    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Evaluate one timer-like entity against the lead-time threshold.
    /// Called once per frame per entity.
    ///
    /// Triggers at most one `play()` per run: the sink's playing flag is the
    /// guard, so a second poll while the cue sounds is a no-op. When the
    /// timer is shorter than the lead time the cue is seeked forward so its
    /// tail still aligns with the timer's end.
    pub fn poll(
        &mut self,
        entity: &TemporalEntity,
        clock: &dyn ClockSource,
        sink: &mut dyn AudioSink,
    ) -> Option<CueTrigger> {
        // Stopwatches have no completion to cue.
        let duration_ms = entity.duration_ms()?;
        if !entity.is_started() || entity.is_paused() || entity.is_done(clock) {
            return None;
        }
        let remaining_ms = duration_ms.saturating_sub(entity.elapsed_ms(clock));
        if remaining_ms > self.lead_time_ms {
            return None;
        }
        if sink.is_playing() {
            return None;
        }
        if self.owner.is_some_and(|owner| owner != entity.id()) {
            // Another entity holds the sink; no queueing.
            return None;
        }

        let seek_secs = if duration_ms < self.lead_time_ms {
            let offset = self.lead_time_ms as f64 / 1000.0 - duration_ms as f64 / 1000.0;
            sink.seek_to(offset);
            Some(offset)
        } else {
            None
        };
        sink.play();
        self.owner = Some(entity.id());
        debug!(id = %entity.id(), remaining_ms, ?seek_secs, "completion cue triggered");
        Some(CueTrigger { seek_secs })
    }

    /// Stop and rewind the cue on behalf of a resetting or finished entity.
    ///
    /// No-op unless the entity owns the sink. Returns whether the sink was
    /// released.
    pub fn release(&mut self, id: EntityId, sink: &mut dyn AudioSink) -> bool {
        if self.owner != Some(id) {
            return false;
        }
        self.owner = None;
        if sink.is_playing() {
            sink.pause();
        }
        sink.seek_to(0.0);
        debug!(%id, "completion cue released");
        true
    }
}

impl Default for AudioCueScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    /// Sink double recording the call sequence.
    #[derive(Debug, Default)]
    struct RecordingSink {
        playing: bool,
        position_secs: f64,
        play_calls: u32,
        pause_calls: u32,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self) {
            self.playing = true;
            self.play_calls += 1;
        }

        fn pause(&mut self) {
            self.playing = false;
            self.pause_calls += 1;
        }

        fn seek_to(&mut self, seconds: f64) {
            self.position_secs = seconds;
        }

        fn is_playing(&self) -> bool {
            self.playing
        }
    }

    #[test]
    fn triggers_once_inside_lead_window() {
        let clock = ManualClock::new(0);
        let mut sink = RecordingSink::default();
        let mut scheduler = AudioCueScheduler::new();
        let mut timer = TemporalEntity::timer(60_000, "1 min");
        timer.start(&clock);

        // remaining = 15_000 > 10_500: nothing yet.
        clock.advance(45_000);
        assert_eq!(scheduler.poll(&timer, &clock, &mut sink), None);
        assert_eq!(sink.play_calls, 0);

        // remaining = 10_000: cue starts, no seek needed.
        clock.advance(5_000);
        let trigger = scheduler.poll(&timer, &clock, &mut sink).unwrap();
        assert_eq!(trigger.seek_secs, None);
        assert_eq!(sink.play_calls, 1);

        // remaining = 5_000: still playing, no second play.
        clock.advance(5_000);
        assert_eq!(scheduler.poll(&timer, &clock, &mut sink), None);
        assert_eq!(sink.play_calls, 1);
    }

    #[test]
    fn short_timer_seeks_before_playing() {
        let clock = ManualClock::new(0);
        let mut sink = RecordingSink::default();
        let mut scheduler = AudioCueScheduler::new();
        let mut timer = TemporalEntity::timer(5_000, "5 sec");
        timer.start(&clock);

        let trigger = scheduler.poll(&timer, &clock, &mut sink).unwrap();
        assert_eq!(trigger.seek_secs, Some(5.5));
        assert_eq!(sink.position_secs, 5.5);
        assert_eq!(sink.play_calls, 1);
    }

    #[test]
    fn release_pauses_and_rewinds() {
        let clock = ManualClock::new(0);
        let mut sink = RecordingSink::default();
        let mut scheduler = AudioCueScheduler::new();
        let mut timer = TemporalEntity::timer(5_000, "5 sec");
        timer.start(&clock);

        scheduler.poll(&timer, &clock, &mut sink).unwrap();
        assert!(sink.is_playing());

        timer.reset();
        assert!(scheduler.release(timer.id(), &mut sink));
        assert!(!sink.is_playing());
        assert_eq!(sink.position_secs, 0.0);
        assert_eq!(scheduler.owner(), None);
    }

    #[test]
    fn release_ignores_non_owner() {
        let clock = ManualClock::new(0);
        let mut sink = RecordingSink::default();
        let mut scheduler = AudioCueScheduler::new();
        let mut timer = TemporalEntity::timer(5_000, "owner");
        timer.start(&clock);
        scheduler.poll(&timer, &clock, &mut sink).unwrap();

        let other = TemporalEntity::timer(5_000, "other");
        assert!(!scheduler.release(other.id(), &mut sink));
        assert!(sink.is_playing());
    }

    #[test]
    fn second_entity_cannot_steal_the_sink() {
        let clock = ManualClock::new(0);
        let mut sink = RecordingSink::default();
        let mut scheduler = AudioCueScheduler::new();
        let mut a = TemporalEntity::timer(8_000, "a");
        let mut b = TemporalEntity::timer(8_000, "b");
        a.start(&clock);
        b.start(&clock);

        assert!(scheduler.poll(&a, &clock, &mut sink).is_some());
        assert_eq!(scheduler.owner(), Some(a.id()));
        assert_eq!(scheduler.poll(&b, &clock, &mut sink), None);
        assert_eq!(sink.play_calls, 1);

        // Once the owner releases, the other entity may take over.
        a.reset();
        scheduler.release(a.id(), &mut sink);
        assert!(scheduler.poll(&b, &clock, &mut sink).is_some());
        assert_eq!(scheduler.owner(), Some(b.id()));
    }

    #[test]
    fn paused_and_unstarted_timers_never_cue() {
        let clock = ManualClock::new(0);
        let mut sink = RecordingSink::default();
        let mut scheduler = AudioCueScheduler::new();
        let mut timer = TemporalEntity::timer(5_000, "5 sec");

        assert_eq!(scheduler.poll(&timer, &clock, &mut sink), None);

        timer.start(&clock);
        timer.pause(&clock);
        assert_eq!(scheduler.poll(&timer, &clock, &mut sink), None);
        assert_eq!(sink.play_calls, 0);
    }

    #[test]
    fn done_timer_does_not_retrigger() {
        let clock = ManualClock::new(0);
        let mut sink = RecordingSink::default();
        let mut scheduler = AudioCueScheduler::new();
        let mut timer = TemporalEntity::timer(5_000, "5 sec");
        timer.start(&clock);
        scheduler.poll(&timer, &clock, &mut sink).unwrap();

        // Cue sound finishes on its own, timer runs past its end.
        sink.pause();
        clock.advance(6_000);
        assert!(timer.is_done(&clock));
        assert_eq!(scheduler.poll(&timer, &clock, &mut sink), None);
        assert_eq!(sink.play_calls, 1);
    }
}
