use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{CommandFactory, Parser};

use crate::config::schema::LOG_LEVELS;

/// Flags understood on the command line. Each flag name doubles as the
/// environment variable (uppercased) and the flattened config file key.
#[derive(Debug, Parser)]
#[command(name = "appboot", about = "Application bootstrap", long_about = None)]
pub struct Cli {
    #[arg(
        short = 'c',
        long = "config_file",
        value_name = "FILE",
        help = "Path to the config file"
    )]
    pub config_file: Option<PathBuf>,

    #[arg(
        long = "log_level",
        value_name = "LEVEL",
        value_parser = PossibleValuesParser::new(LOG_LEVELS),
        help = "Application log level"
    )]
    pub log_level: Option<String>,
}

pub const CONFIG_FILE_FLAG: &str = "config_file";
pub const LOG_LEVEL_FLAG: &str = "log_level";

/// Flag names that may be set from the environment or a config file.
pub const FLAG_NAMES: [&str; 2] = [CONFIG_FILE_FLAG, LOG_LEVEL_FLAG];

/// Usage listing derived from the declared flag set.
pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_short_and_long_flags() {
        let cli = Cli::try_parse_from(["appboot", "-c", "app.yaml", "--log_level", "WARN"]).unwrap();
        assert_eq!(cli.config_file, Some(PathBuf::from("app.yaml")));
        assert_eq!(cli.log_level.as_deref(), Some("WARN"));

        let cli = Cli::try_parse_from(["appboot", "--config_file=other.yaml"]).unwrap();
        assert_eq!(cli.config_file, Some(PathBuf::from("other.yaml")));
        assert_eq!(cli.log_level, None);
    }

    #[test]
    fn test_log_level_outside_enumeration() {
        let err = Cli::try_parse_from(["appboot", "--log_level", "wArN"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_help_lists_flags() {
        let help = help_text();
        assert!(help.contains("--config_file"));
        assert!(help.contains("-c"));
        assert!(help.contains("--log_level"));
        assert!(help.contains("Application log level"));
    }
}
