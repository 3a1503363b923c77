//! # SQL Scanner CLI
//!
//! Script loading and report rendering behind the `sqlscan` binary.

pub mod commands;
pub mod input;

pub use commands::{run_split, run_tokens, CommandError};
pub use input::{load_config, load_dialect, read_script, InputError};

use sql_scanner::logging::Code;

/// Anything `sqlscan` can fail with, keeping the event code of the cause
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl CliError {
    pub fn error_code(&self) -> Code {
        match self {
            CliError::Input(e) => e.error_code(),
            CliError::Command(e) => e.error_code(),
        }
    }
}
