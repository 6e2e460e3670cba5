use std::thread;

use chronodeck_core::{App, MonotonicClock};

use super::common::{self, HeadlessWindows, TerminalBell};

/// Run a stopwatch, optionally stopping after a fixed span.
pub fn run(run_for: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let limit_ms = run_for
        .map(|s| common::parse_duration_ms(&s))
        .transpose()?;

    let mut app = App::new(MonotonicClock::new());
    let mut sink = TerminalBell::default();
    let mut windows = HeadlessWindows::default();

    let id = app.add_stopwatch("stopwatch");
    app.start(id);

    loop {
        app.frame(&mut sink, &mut windows);
        let Some(stopwatch) = app.entity(id) else {
            break;
        };
        common::print_status_line(stopwatch.label(), &stopwatch.display_time(app.clock()));
        if let Some(limit) = limit_ms {
            if stopwatch.elapsed_ms(app.clock()) >= limit {
                break;
            }
        }
        thread::sleep(common::FRAME_INTERVAL);
    }
    println!();
    Ok(())
}
