pub mod cli;
pub mod config;
pub mod error;
pub mod telemetry;

use std::ffi::OsString;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::error::ConfigError;

/// Read program variables from `args`, install the logger and announce startup.
///
/// A help request has already printed its listing and returns `Ok(())`.
pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cfg = match config::read_program_variables(args) {
        Ok(cfg) => cfg,
        Err(ConfigError::HelpRequested) => return Ok(()),
        Err(err) => return Err(err).context("Error reading program variables"),
    };

    telemetry::init_logging(cfg.level())?;
    announce(&cfg);
    Ok(())
}

/// The two startup records, in order.
fn announce(cfg: &Config) {
    tracing::info!("Application started");
    tracing::info!(level = %cfg.level(), "Log level set to");
}
