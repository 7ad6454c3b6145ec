use std::path::PathBuf;

use thiserror::Error;

use crate::config::schema::LOG_LEVELS;

/// Failures while reading program variables.
///
/// `HelpRequested` is not a real failure: the help listing has already been
/// written and the caller should exit cleanly.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("not enough arguments provided to the program")]
    NotEnoughArguments,

    #[error("help requested")]
    HelpRequested,

    #[error("invalid command line")]
    Cli(#[from] clap::Error),

    #[error("invalid log_level {0:?}, expected one of: {levels}", levels = LOG_LEVELS.join(", "))]
    InvalidLogLevel(String),

    #[error("failed to read config file {}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", .path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: yaml_rust2::ScanError,
    },

    #[error("config file {} must hold a mapping at the top level", .path.display())]
    NotAMapping { path: PathBuf },

    #[error("failed to merge configuration sources")]
    Merge(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn is_help(&self) -> bool {
        matches!(self, ConfigError::HelpRequested)
    }
}
