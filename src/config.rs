use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use simplelog::LevelFilter;

use crate::error::{Result, SnakeError};
use crate::TermInt;

const BASE_INTERVAL_MS: u64 = 250;
const FLOOR_INTERVAL_MS: u64 = 60;
const SPEEDUP_MS: u64 = 6;
/// Terminals at least this wide get the flat width bonus instead of the scaled one.
const WIDE_TERMINAL_COLS: TermInt = 250;
const WIDE_TERMINAL_BONUS_MS: u64 = 150;

const LOG_LEVEL_VAR: &str = "SNAKE_LOG";
const LOG_FILE_VAR: &str = "SNAKE_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "snake.log";

/// How the tick interval shrinks while the snake grows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpeedRamp {
    pub base: Duration,
    pub floor: Duration,
    pub decrement: Duration,
}

impl Default for SpeedRamp {
    fn default() -> Self {
        SpeedRamp {
            base: Duration::from_millis(BASE_INTERVAL_MS),
            floor: Duration::from_millis(FLOOR_INTERVAL_MS),
            decrement: Duration::from_millis(SPEEDUP_MS),
        }
    }
}

impl SpeedRamp {
    /// Wider terminals start faster, since the snake has further to travel.
    pub fn initial_interval(&self, term_cols: TermInt) -> Duration {
        let bonus = if term_cols < WIDE_TERMINAL_COLS {
            Duration::from_secs_f64(term_cols as f64 / 1.3 / 1000.0)
        } else {
            Duration::from_millis(WIDE_TERMINAL_BONUS_MS)
        };

        let interval = self.base.checked_sub(bonus).unwrap_or(self.floor);
        // Whole milliseconds, like the ramp steps
        let interval = Duration::from_millis(interval.as_millis() as u64);
        interval.max(self.floor)
    }

    pub fn speed_up(&self, interval: Duration) -> Duration {
        interval.checked_sub(self.decrement).unwrap_or(self.floor).max(self.floor)
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub speed: SpeedRamp,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            speed: SpeedRamp::default(),
            log_level: LevelFilter::Info,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Config::from_vars(env::var(LOG_LEVEL_VAR).ok(), env::var(LOG_FILE_VAR).ok())
    }

    fn from_vars(level: Option<String>, file: Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(level) = level {
            config.log_level = LevelFilter::from_str(level.trim()).map_err(|_| {
                SnakeError::Config(format!("{}={:?} is not a log level", LOG_LEVEL_VAR, level))
            })?;
        }

        if let Some(file) = file.filter(|f| !f.is_empty()) {
            config.log_file = PathBuf::from(file);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_terminals_scale_the_starting_interval() {
        let ramp = SpeedRamp::default();
        assert_eq!(ramp.initial_interval(20), Duration::from_millis(234));
        assert_eq!(ramp.initial_interval(80), Duration::from_millis(188));
        assert_eq!(ramp.initial_interval(249), Duration::from_millis(60));
    }

    #[test]
    fn wide_terminals_get_a_flat_bonus() {
        let ramp = SpeedRamp::default();
        assert_eq!(ramp.initial_interval(250), Duration::from_millis(100));
        assert_eq!(ramp.initial_interval(400), Duration::from_millis(100));
    }

    #[test]
    fn speed_up_stops_at_the_floor() {
        let ramp = SpeedRamp::default();
        assert_eq!(ramp.speed_up(Duration::from_millis(100)), Duration::from_millis(94));
        assert_eq!(ramp.speed_up(Duration::from_millis(63)), Duration::from_millis(60));
        assert_eq!(ramp.speed_up(Duration::from_millis(60)), Duration::from_millis(60));
        assert_eq!(ramp.speed_up(Duration::from_millis(2)), Duration::from_millis(60));
    }

    #[test]
    fn log_settings_come_from_the_environment() {
        let config = Config::from_vars(Some("debug".into()), Some("/tmp/pit.log".into())).unwrap();
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.log_file, PathBuf::from("/tmp/pit.log"));

        let config = Config::from_vars(None, Some(String::new())).unwrap();
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn bad_log_level_is_a_config_error() {
        match Config::from_vars(Some("loud".into()), None) {
            Err(SnakeError::Config(msg)) => assert!(msg.contains("SNAKE_LOG")),
            other => panic!("expected a config error, got {:?}", other.map(|_| ())),
        }
    }
}
