//! Process-level initialization.
//!
//! Logger setup lives here so the binary and integration tests share one
//! code path.

use crate::error_handling::InitializationError;

/// Initializes the global logger at the given level.
///
/// # Errors
///
/// Returns [`InitializationError::LoggerError`] if a logger is already
/// installed.
pub fn init_logger(level: log::LevelFilter) -> Result<(), InitializationError> {
    env_logger::Builder::new()
        .filter_level(level)
        .try_init()
        .map_err(InitializationError::from)
}
