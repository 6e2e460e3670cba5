use std::thread;

use chronodeck_core::{App, Config, Event, MonotonicClock};

use super::common::{self, HeadlessWindows, TerminalBell};

/// Drive a full work/break cycle to completion in the terminal.
pub fn run(
    config: &Config,
    work: Option<String>,
    break_duration: Option<String>,
    repeat: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let work_ms = work
        .map(|s| common::parse_duration_ms(&s))
        .transpose()?
        .unwrap_or(config.work_secs * 1000);
    let break_ms = break_duration
        .map(|s| common::parse_duration_ms(&s))
        .transpose()?
        .unwrap_or(config.break_secs * 1000);
    let repeats = repeat.unwrap_or(config.repeats);

    let mut app = App::with_cue_lead_time(MonotonicClock::new(), config.lead_time_ms);
    let mut sink = TerminalBell::default();
    let mut windows = HeadlessWindows::default();

    let id = app.start_pomodoro(work_ms, break_ms, repeats)?;
    app.start(id);

    loop {
        for event in app.frame(&mut sink, &mut windows) {
            match event {
                Event::PhaseAdvanced { .. } => println!(),
                Event::CycleCompleted {
                    work_completed,
                    break_completed,
                    ..
                } => {
                    println!();
                    println!(
                        "cycle complete: {work_completed} work / {break_completed} break sessions"
                    );
                    return Ok(());
                }
                _ => {}
            }
        }
        if let Some(cycle) = app.pomodoro() {
            common::print_status_line(
                cycle.active().label(),
                &cycle.active().display_time(app.clock()),
            );
        }
        thread::sleep(common::FRAME_INTERVAL);
    }
}
