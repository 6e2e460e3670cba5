//! Time display formatting shared by every surface that renders an entity.

/// Format whole seconds as `HH:MM:SS`.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Format milliseconds as `HH:MM:SS.cc` (centisecond precision), the
/// stopwatch display form.
pub fn format_hms_centis(ms: u64) -> String {
    let centis = (ms % 1000) / 10;
    format!("{}.{centis:02}", format_hms(ms / 1000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3600 + 25 * 60), "01:25:00");
    }

    #[test]
    fn formats_centiseconds() {
        assert_eq!(format_hms_centis(0), "00:00:00.00");
        assert_eq!(format_hms_centis(1_234), "00:00:01.23");
        assert_eq!(format_hms_centis(59_999), "00:00:59.99");
    }
}
