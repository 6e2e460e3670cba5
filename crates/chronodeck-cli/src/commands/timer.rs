use std::thread;

use chronodeck_core::{App, Config, MonotonicClock};

use super::common::{self, HeadlessWindows, TerminalBell};

/// Run a countdown timer to completion in the terminal.
pub fn run(
    config: &Config,
    duration: Option<String>,
    label: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let duration_ms = match duration {
        Some(d) => common::parse_duration_ms(&d)?,
        None => config.default_timer_secs * 1000,
    };
    let label = label.unwrap_or_else(|| "timer".to_string());

    let mut app = App::with_cue_lead_time(MonotonicClock::new(), config.lead_time_ms);
    let mut sink = TerminalBell::default();
    let mut windows = HeadlessWindows::default();

    let id = app.add_timer(duration_ms, label.as_str());
    app.start(id);

    loop {
        app.frame(&mut sink, &mut windows);
        let Some(timer) = app.entity(id) else {
            break;
        };
        common::print_status_line(timer.label(), &timer.display_time(app.clock()));
        if timer.is_done(app.clock()) {
            break;
        }
        thread::sleep(common::FRAME_INTERVAL);
    }
    println!();
    println!("{label} finished");
    Ok(())
}
