mod args;

pub use args::{CONFIG_FILE_FLAG, Cli, FLAG_NAMES, LOG_LEVEL_FLAG, help_text};
