use std::env;

use crate::clock::{Catalog, ClockEngine, DEFAULT_TIME_CONTROL};
use crate::error::ClockError;

pub const BIND_VAR: &str = "CHESS_CLOCK_BIND";
pub const TIME_CONTROL_VAR: &str = "CHESS_CLOCK_TIME_CONTROL";
pub const EXTRA_TIME_CONTROLS_VAR: &str = "CHESS_CLOCK_EXTRA_TIME_CONTROLS";
pub const STATIC_DIR_VAR: &str = "CHESS_CLOCK_STATIC_DIR";

/// Server settings, read from the environment with fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: String,
    pub time_control: String,
    pub extra_time_controls: Vec<String>,
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: "127.0.0.1:8080".to_string(),
            time_control: DEFAULT_TIME_CONTROL.to_string(),
            extra_time_controls: Vec::new(),
            static_dir: "./static".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let value = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Config {
            bind: value(BIND_VAR).unwrap_or(defaults.bind),
            time_control: value(TIME_CONTROL_VAR).unwrap_or(defaults.time_control),
            extra_time_controls: value(EXTRA_TIME_CONTROLS_VAR)
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|label| !label.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or(defaults.extra_time_controls),
            static_dir: value(STATIC_DIR_VAR).unwrap_or(defaults.static_dir),
        }
    }

    pub fn catalog(&self) -> Result<Catalog, ClockError> {
        Catalog::with_labels(self.extra_time_controls.as_slice())
    }

    /// Builds the engine for the configured catalog and starting control.
    pub fn engine(&self) -> Result<ClockEngine, ClockError> {
        ClockEngine::new(self.catalog()?, &self.time_control)
    }
}
