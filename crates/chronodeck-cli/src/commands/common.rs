//! Shared pieces of the terminal driver: duration parsing, the frame
//! interval, and the CLI's audio/window collaborator implementations.

use std::io::Write;
use std::time::Duration;

use chronodeck_core::audio::AudioSink;
use chronodeck_core::error::WindowError;
use chronodeck_core::{EntityId, FocusKind, WindowHandle, WindowManager};

/// Coarse terminal refresh; the engine itself is read-on-demand and does not
/// care about the tick rate.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Parse `1h30m`, `90s`, `5m` or a bare number of seconds into milliseconds.
pub fn parse_duration_ms(input: &str) -> Result<u64, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".into());
    }
    if let Ok(secs) = s.parse::<u64>() {
        if secs == 0 {
            return Err("duration must be nonzero".into());
        }
        return Ok(secs * 1000);
    }
    let mut total_secs: u64 = 0;
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let value: u64 = digits
            .parse()
            .map_err(|_| format!("invalid duration '{input}'"))?;
        digits.clear();
        let unit = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return Err(format!("invalid duration unit '{c}'")),
        };
        total_secs = total_secs.saturating_add(value.saturating_mul(unit));
    }
    if !digits.is_empty() {
        return Err(format!("missing unit after '{digits}' in '{input}'"));
    }
    if total_secs == 0 {
        return Err("duration must be nonzero".into());
    }
    Ok(total_secs * 1000)
}

/// Terminal "audio device": one BEL character per cue. The playing flag
/// stays set until released, which is what keeps the engine from ringing
/// the bell every frame.
#[derive(Debug, Default)]
pub struct TerminalBell {
    playing: bool,
}

impl AudioSink for TerminalBell {
    fn play(&mut self) {
        print!("\x07");
        let _ = std::io::stdout().flush();
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek_to(&mut self, _seconds: f64) {}

    fn is_playing(&self) -> bool {
        self.playing
    }
}

/// The CLI never shows detached surfaces; handles are minted and forgotten.
#[derive(Debug, Default)]
pub struct HeadlessWindows {
    next: u64,
}

impl WindowManager for HeadlessWindows {
    fn create_window(
        &mut self,
        _kind: FocusKind,
        _id: EntityId,
    ) -> Result<WindowHandle, WindowError> {
        self.next += 1;
        Ok(WindowHandle(self.next))
    }

    fn destroy_window(&mut self, _handle: WindowHandle) {}
}

/// Redraw the current reading in place.
pub fn print_status_line(label: &str, time: &str) {
    print!("\r{label}  {time} ");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_seconds() {
        assert_eq!(parse_duration_ms("90"), Ok(90_000));
    }

    #[test]
    fn parses_unit_forms() {
        assert_eq!(parse_duration_ms("90s"), Ok(90_000));
        assert_eq!(parse_duration_ms("5m"), Ok(300_000));
        assert_eq!(parse_duration_ms("1h30m"), Ok(5_400_000));
        assert_eq!(parse_duration_ms("1h2m3s"), Ok(3_723_000));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_duration_ms("").is_err());
        assert!(parse_duration_ms("0").is_err());
        assert!(parse_duration_ms("5x").is_err());
        assert!(parse_duration_ms("5m3").is_err());
    }
}
