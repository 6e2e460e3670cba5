//! End-to-end frame-loop tests: controller, router, cue scheduler and the
//! window-manager collaborator working together over a manual clock.

use chronodeck_core::audio::AudioSink;
use chronodeck_core::error::WindowError;
use chronodeck_core::{
    App, EntityId, Event, FocusKind, FocusState, FocusType, ManualClock, WindowHandle,
    WindowManager,
};

#[derive(Debug, Default)]
struct FakeSink {
    playing: bool,
    position_secs: f64,
    play_calls: u32,
}

impl AudioSink for FakeSink {
    fn play(&mut self) {
        self.playing = true;
        self.play_calls += 1;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek_to(&mut self, seconds: f64) {
        self.position_secs = seconds;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[derive(Debug, Default)]
struct FakeWindows {
    next_handle: u64,
    live: Vec<WindowHandle>,
    fail_next: bool,
}

impl WindowManager for FakeWindows {
    fn create_window(&mut self, _kind: FocusKind, _id: EntityId) -> Result<WindowHandle, WindowError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(WindowError::CreateFailed("no surface".into()));
        }
        self.next_handle += 1;
        let handle = WindowHandle(self.next_handle);
        self.live.push(handle);
        Ok(handle)
    }

    fn destroy_window(&mut self, handle: WindowHandle) {
        self.live.retain(|h| *h != handle);
    }
}

fn harness() -> (App<ManualClock>, FakeSink, FakeWindows) {
    (
        App::new(ManualClock::new(0)),
        FakeSink::default(),
        FakeWindows::default(),
    )
}

#[test]
fn timer_cue_fires_once_and_reset_rewinds() {
    let (mut app, mut sink, mut windows) = harness();
    let id = app.add_timer(60_000, "1 min");
    app.start(id);

    app.clock().advance(50_000);
    let events = app.frame(&mut sink, &mut windows);
    assert!(events.iter().any(|e| matches!(e, Event::CueStarted { .. })));
    assert_eq!(sink.play_calls, 1);

    app.clock().advance(5_000);
    let events = app.frame(&mut sink, &mut windows);
    assert!(!events.iter().any(|e| matches!(e, Event::CueStarted { .. })));
    assert_eq!(sink.play_calls, 1);

    app.reset(id, &mut sink);
    assert!(!sink.playing);
    assert_eq!(sink.position_secs, 0.0);
}

#[test]
fn short_timer_cue_is_seeked() {
    let (mut app, mut sink, mut windows) = harness();
    let id = app.add_timer(5_000, "5 sec");
    app.start(id);

    let events = app.frame(&mut sink, &mut windows);
    let seek = events.iter().find_map(|e| match e {
        Event::CueStarted { seek_secs, .. } => *seek_secs,
        _ => None,
    });
    assert_eq!(seek, Some(5.5));
    assert_eq!(sink.position_secs, 5.5);
}

#[test]
fn pomodoro_runs_to_completion_and_tears_down() {
    let (mut app, mut sink, mut windows) = harness();
    let id = app.start_pomodoro(2_000, 1_000, 3).unwrap();
    app.start(id);

    let mut phase_events = 0;
    let mut completed = false;
    for _ in 0..200 {
        app.clock().advance(250);
        for event in app.frame(&mut sink, &mut windows) {
            match event {
                Event::PhaseAdvanced { .. } => phase_events += 1,
                Event::CycleCompleted {
                    work_completed,
                    break_completed,
                    ..
                } => {
                    completed = true;
                    assert_eq!(work_completed, 3);
                    assert_eq!(break_completed, 2);
                }
                _ => {}
            }
        }
        if completed {
            break;
        }
    }

    assert!(completed);
    // 3 work + 2 break phases means 4 transitions after the initial phase.
    assert_eq!(phase_events, 4);
    assert!(app.pomodoro().is_none());

    // Nothing restarts afterwards.
    app.clock().advance(60_000);
    let events = app.frame(&mut sink, &mut windows);
    assert!(events.is_empty());
}

#[test]
fn pomodoro_popout_auto_closes_on_completion() {
    let (mut app, mut sink, mut windows) = harness();
    let id = app.start_pomodoro(1_000, 1_000, 1).unwrap();
    app.start(id);
    app.request_focus(FocusKind::Pomodoro, id, FocusType::Popout);

    // Window creation lands within the next frame.
    app.frame(&mut sink, &mut windows);
    assert_eq!(windows.live.len(), 1);
    assert_eq!(app.router().local_focus(id), FocusType::Popout);

    // Drive the single work phase to completion; teardown destroys the
    // popout surface through the window manager within the same frame pass.
    app.clock().advance(1_000);
    let events = app.frame(&mut sink, &mut windows);
    assert!(windows.live.is_empty());
    assert!(app.pomodoro().is_none());
    assert!(events.iter().any(|e| matches!(e, Event::PopoutClosed { .. })));
    assert!(events.iter().any(|e| matches!(e, Event::CycleCompleted { .. })));
}

#[test]
fn fullscreen_handoff_between_entities() {
    let (mut app, _sink, _windows) = harness();
    let a = app.add_timer(60_000, "a");
    let b = app.add_stopwatch("b");

    app.request_focus(FocusKind::Timer, a, FocusType::Fullscreen);
    let state = app.request_focus(FocusKind::Stopwatch, b, FocusType::Fullscreen);

    assert_eq!(app.router().local_focus(a), FocusType::None);
    assert_eq!(app.router().local_focus(b), FocusType::Fullscreen);
    assert_eq!(state.id, Some(b));
    assert_eq!(app.focus_state(), state);
}

#[test]
fn failed_popout_creation_reverts_focus_flag() {
    let (mut app, mut sink, mut windows) = harness();
    let id = app.add_timer(60_000, "1 min");
    windows.fail_next = true;

    app.request_focus(FocusKind::Timer, id, FocusType::Popout);
    let events = app.frame(&mut sink, &mut windows);

    assert!(events.iter().any(|e| matches!(e, Event::PopoutFailed { .. })));
    assert_eq!(app.router().local_focus(id), FocusType::None);
    assert!(windows.live.is_empty());

    // A later request can still succeed.
    app.request_focus(FocusKind::Timer, id, FocusType::Popout);
    app.frame(&mut sink, &mut windows);
    assert_eq!(windows.live.len(), 1);
    assert_eq!(app.router().local_focus(id), FocusType::Popout);
}

#[test]
fn external_window_close_clears_flag() {
    let (mut app, mut sink, mut windows) = harness();
    let id = app.add_stopwatch("laps");
    app.request_focus(FocusKind::Stopwatch, id, FocusType::Popout);
    app.frame(&mut sink, &mut windows);
    let handle = app.router().popout_handle(id).unwrap();

    // The user closes the detached window; the host reports the handle.
    windows.destroy_window(handle);
    app.window_closed(handle);
    let events = app.frame(&mut sink, &mut windows);

    assert_eq!(app.router().local_focus(id), FocusType::None);
    assert!(events.iter().any(|e| matches!(e, Event::PopoutClosed { .. })));
}

#[test]
fn removing_an_entity_releases_everything() {
    let (mut app, mut sink, mut windows) = harness();
    let id = app.add_timer(5_000, "5 sec");
    app.start(id);
    app.request_focus(FocusKind::Timer, id, FocusType::Popout);
    app.frame(&mut sink, &mut windows);
    assert!(sink.playing); // short timer, cue already inside lead window
    assert_eq!(windows.live.len(), 1);

    app.remove_entity(id, &mut sink);
    app.frame(&mut sink, &mut windows);

    assert!(!sink.playing);
    assert!(windows.live.is_empty());
    assert!(app.timers().is_empty());
    assert_eq!(app.focus_state(), FocusState::default());
}
