use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Accepted `log_level` literals. Matching is exact, so `iNfO` is rejected.
pub const LOG_LEVELS: [&str; 15] = [
    "info", "trace", "debug", "warn", "error", // lowercase
    "TRACE", "INFO", "DEBUG", "WARN", "ERROR", // uppercase
    "Trace", "Info", "Debug", "Warn", "Error", // title case
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Strict parse against [`LOG_LEVELS`].
    pub fn from_literal(s: &str) -> Option<Self> {
        if LOG_LEVELS.contains(&s) {
            Some(Self::parse_lossy(s))
        } else {
            None
        }
    }

    /// Case-insensitive mapping. Anything unrecognised, including the empty
    /// string, falls back to `Info`.
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_literal(s).ok_or_else(|| ConfigError::InvalidLogLevel(s.to_string()))
    }
}

/// Program variables after all sources have been merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub log_level: Option<LogLevel>, // None when no source set it
    pub config_file: Option<PathBuf>, // resolved config file path, if any
}

impl Config {
    /// Effective level, `Info` when unset.
    pub fn level(&self) -> LogLevel {
        self.log_level.unwrap_or_default()
    }
}

/// Shape of the merged `config::Config` table. Keys other than these are
/// left in the table and never looked at.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProgramVars {
    #[serde(default)]
    pub log_level: Option<String>,
}

impl ProgramVars {
    pub(crate) fn validate(self, config_file: Option<PathBuf>) -> Result<Config, ConfigError> {
        let log_level = self.log_level.as_deref().map(str::parse::<LogLevel>).transpose()?;
        Ok(Config {
            log_level,
            config_file,
        })
    }
}
