//! TOML configuration.
//!
//! Tuning knobs only: default durations for new entities and the audio lead
//! time. Nothing here is engine state -- every run still starts with empty
//! collections and no focus.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::DEFAULT_LEAD_TIME_MS;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default countdown length for newly created timers, in seconds.
    pub default_timer_secs: u64,
    /// Default pomodoro work phase length, in seconds.
    pub work_secs: u64,
    /// Default pomodoro break phase length, in seconds.
    pub break_secs: u64,
    /// Default pomodoro repeat count.
    pub repeats: u32,
    /// Remaining-time threshold at which the completion cue starts, in ms.
    pub lead_time_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_timer_secs: 60,
            work_secs: 25 * 60,
            break_secs: 5 * 60,
            repeats: 4,
            lead_time_ms: DEFAULT_LEAD_TIME_MS,
        }
    }
}

impl Config {
    /// Load from a TOML file, falling back to defaults when the file does
    /// not exist. Unknown keys are ignored; missing keys take their default.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "work_secs = 1500\nrepeats = 2").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.work_secs, 1500);
        assert_eq!(config.repeats, 2);
        assert_eq!(config.lead_time_ms, DEFAULT_LEAD_TIME_MS);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "work_secs = \"soon\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config {
            default_timer_secs: 90,
            ..Config::default()
        };
        let parsed: Config = toml::from_str(&config.to_toml()).unwrap();
        assert_eq!(parsed, config);
    }
}
