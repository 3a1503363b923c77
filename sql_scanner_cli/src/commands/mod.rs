//! `sqlscan` subcommands
//!
//! Each command renders its report to a `String`; `main` decides where it goes.

pub mod split;
pub mod tokens;

pub use split::run_split;
pub use tokens::run_tokens;

use sql_scanner::logging::{codes, Code};
use sql_scanner::{DialectError, ScannerError};

#[derive(Debug, Clone, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Dialect(#[from] DialectError),

    #[error(transparent)]
    Scanner(#[from] ScannerError),

    #[error("Cannot render JSON output: {message}")]
    Json { message: String },
}

impl CommandError {
    pub fn error_code(&self) -> Code {
        match self {
            CommandError::Dialect(e) => e.error_code(),
            CommandError::Scanner(e) => e.error_code(),
            CommandError::Json { .. } => codes::system::INTERNAL_ERROR,
        }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(error: serde_json::Error) -> Self {
        CommandError::Json {
            message: error.to_string(),
        }
    }
}
