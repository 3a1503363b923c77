//! Logging preferences, installed once at startup
//!
//! Until [`init_runtime_preferences`] runs, readers see
//! `LoggingPreferences::default()`, which honours the `SQLSCAN_*` variables.

use super::events::LogLevel;
use crate::config::compile_time::logging::{
    LOG_BUFFER_SIZE, MAX_LOG_MESSAGE_LENGTH, MEMORY_LOGGER_CAPACITY,
};
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

static PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

const MIN_BUFFER: usize = 100;
const MIN_MESSAGE_LENGTH: usize = 64;

pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    PREFERENCES
        .set(preferences)
        .map_err(|_| "logging preferences already installed".to_string())
}

fn with_preferences<R>(read: impl FnOnce(&LoggingPreferences) -> R) -> R {
    match PREFERENCES.get() {
        Some(installed) => read(installed),
        None => read(&LoggingPreferences::default()),
    }
}

pub fn get_min_log_level() -> LogLevel {
    with_preferences(|p| p.min_log_level)
}

pub fn use_structured_logging() -> bool {
    with_preferences(|p| p.use_structured_logging)
}

pub fn use_console_logging() -> bool {
    with_preferences(|p| p.enable_console_logging)
}

/// Reject build profiles whose logging limits cannot hold a useful event
pub fn validate_config() -> Result<(), String> {
    if LOG_BUFFER_SIZE < MIN_BUFFER {
        return Err(format!(
            "log_buffer_size {} is below {}",
            LOG_BUFFER_SIZE, MIN_BUFFER
        ));
    }
    if MAX_LOG_MESSAGE_LENGTH < MIN_MESSAGE_LENGTH {
        return Err(format!(
            "max_log_message_length {} is below {}",
            MAX_LOG_MESSAGE_LENGTH, MIN_MESSAGE_LENGTH
        ));
    }
    if MEMORY_LOGGER_CAPACITY > LOG_BUFFER_SIZE {
        return Err("memory_logger_capacity exceeds log_buffer_size".to_string());
    }
    Ok(())
}
