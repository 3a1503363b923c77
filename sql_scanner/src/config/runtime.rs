//! Runtime preferences
//!
//! Every field defaults from an `SQLSCAN_*` environment variable, so hosts
//! that never touch these structs still honour the user's environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub use crate::logging::LogLevel;

fn env_or<T: FromStr>(name: &str, fallback: T) -> T {
    env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(fallback)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerPreferences {
    /// Debug event for every rule that returns a token
    pub trace_rule_hits: bool,
    pub collect_metrics: bool,
    /// Delimiter rule declines while the scanner is in eval mode
    pub suppress_delimiters_in_eval: bool,
}

impl Default for ScannerPreferences {
    fn default() -> Self {
        Self {
            trace_rule_hits: env_or(env_vars::TRACE_RULE_HITS, false),
            collect_metrics: env_or(env_vars::COLLECT_METRICS, true),
            suppress_delimiters_in_eval: env_or(env_vars::SUPPRESS_EVAL_DELIMITERS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterPreferences {
    /// Append `;` to each emitted statement
    pub keep_delimiters: bool,
    pub comment_only_statements: bool,
}

impl Default for SplitterPreferences {
    fn default() -> Self {
        Self {
            keep_delimiters: env_or(env_vars::KEEP_DELIMITERS, false),
            comment_only_statements: env_or(env_vars::COMMENT_ONLY_STATEMENTS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// JSON lines on stderr instead of plain text
    pub use_structured_logging: bool,
    pub enable_console_logging: bool,
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        let min_log_level = env::var(env_vars::LOG_LEVEL)
            .ok()
            .and_then(|raw| parse_log_level(&raw))
            .unwrap_or(LogLevel::Warning);
        Self {
            use_structured_logging: env_or(env_vars::STRUCTURED_LOGS, false),
            enable_console_logging: env_or(env_vars::CONSOLE_LOGS, true),
            min_log_level,
        }
    }
}

/// Accepts names (`warn`, `Warning`) or the numeric rank `0..=3`
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.trim().to_ascii_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warn" | "warning" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// All preferences in one document, e.g. a `[scanner]`/`[splitter]`/`[logging]` TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub scanner: ScannerPreferences,
    pub splitter: SplitterPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

pub mod env_vars {
    pub const TRACE_RULE_HITS: &str = "SQLSCAN_TRACE_RULE_HITS";
    pub const COLLECT_METRICS: &str = "SQLSCAN_COLLECT_METRICS";
    pub const SUPPRESS_EVAL_DELIMITERS: &str = "SQLSCAN_SUPPRESS_EVAL_DELIMITERS";
    pub const KEEP_DELIMITERS: &str = "SQLSCAN_KEEP_DELIMITERS";
    pub const COMMENT_ONLY_STATEMENTS: &str = "SQLSCAN_COMMENT_ONLY_STATEMENTS";
    pub const STRUCTURED_LOGS: &str = "SQLSCAN_STRUCTURED_LOGS";
    pub const CONSOLE_LOGS: &str = "SQLSCAN_CONSOLE_LOGS";
    pub const LOG_LEVEL: &str = "SQLSCAN_LOG_LEVEL";
}
