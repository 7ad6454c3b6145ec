//! Process-wide text logger on stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing::Subscriber;
use tracing_subscriber::{
    Registry,
    filter::{EnvFilter, LevelFilter},
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::schema::LogLevel;
use crate::telemetry::format::SourceRelativeFormat;

/// Level of the logger that won the global install.
static INSTALLED_LEVEL: OnceCell<LogLevel> = OnceCell::new();

/// Minimum severity for a configured level.
///
/// `Trace` is accepted as configuration but filters like `Info`: there is no
/// separate trace verbosity.
pub fn threshold(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Info | LogLevel::Trace => LevelFilter::INFO,
    }
}

/// Subscriber writing text lines to `writer`, with call sites shown relative
/// to `base_dir`.
pub fn build_subscriber<W>(
    level: LogLevel,
    base_dir: impl Into<PathBuf>,
    writer: W,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::default().add_directive(threshold(level).into());
    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .event_format(SourceRelativeFormat::new(base_dir))
        .with_writer(writer);

    Registry::default().with(filter).with(fmt_layer)
}

/// Install the global logger (call early in main).
///
/// Only the first call installs anything; later calls return `Ok(())` and
/// leave the installed logger untouched.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let base_dir = std::env::current_dir().context("Failed to resolve working directory")?;

    if build_subscriber(level, base_dir, std::io::stdout)
        .try_init()
        .is_ok()
    {
        let _ = INSTALLED_LEVEL.set(level);
    }
    Ok(())
}

/// Level of the installed global logger, `None` before [`init_logging`].
pub fn installed_level() -> Option<LogLevel> {
    INSTALLED_LEVEL.get().copied()
}
