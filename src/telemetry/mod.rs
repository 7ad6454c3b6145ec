#[cfg(test)]
pub(crate) mod capture;
pub mod format;
pub mod logging;

pub use logging::{init_logging, installed_level};
