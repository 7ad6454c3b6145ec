mod loader;
pub mod schema;

pub use loader::{ConfigLoader, KEY_DELIMITER, read_program_variables};
pub use schema::{Config, LOG_LEVELS, LogLevel};
