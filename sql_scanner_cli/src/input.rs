//! Script, dialect and runtime config loading with size and encoding checks

use sql_scanner::config::compile_time::input::MAX_SCRIPT_SIZE;
use sql_scanner::config::runtime::RuntimeConfig;
use sql_scanner::logging::{codes, Code};
use sql_scanner::{log_debug, log_error, log_success, Document, SqlDialect, TextBuffer};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, thiserror::Error)]
pub enum InputError {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("File too large: {size} bytes (max {MAX_SCRIPT_SIZE})")]
    TooLarge { path: PathBuf, size: u64 },

    #[error("File is not valid UTF-8: {path}")]
    InvalidEncoding { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error on {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Invalid dialect: {0}")]
    Dialect(#[from] sql_scanner::DialectError),

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl InputError {
    pub fn error_code(&self) -> Code {
        match self {
            InputError::NotFound { .. } => codes::input::FILE_NOT_FOUND,
            InputError::TooLarge { .. } => codes::input::FILE_TOO_LARGE,
            InputError::InvalidEncoding { .. } => codes::input::INVALID_ENCODING,
            InputError::PermissionDenied { .. } => codes::input::PERMISSION_DENIED,
            InputError::Io { .. } => codes::input::IO_ERROR,
            InputError::Dialect(e) => e.error_code(),
            InputError::Config { .. } => codes::input::INVALID_CONFIG,
        }
    }

    fn from_io(path: &Path, error: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match error.kind() {
            ErrorKind::NotFound => InputError::NotFound { path },
            ErrorKind::PermissionDenied => InputError::PermissionDenied { path },
            ErrorKind::InvalidData => InputError::InvalidEncoding { path },
            _ => InputError::Io {
                path,
                message: error.to_string(),
            },
        }
    }
}

/// Read a SQL script into a [`Document`]
pub fn read_script(path: &Path) -> Result<Document, InputError> {
    log_debug!("Reading script", "path" => path.display());

    let result = load_script(path);
    match &result {
        Ok(document) => {
            log_success!(codes::success::SCRIPT_LOADED, "Script loaded",
                "path" => path.display(),
                "characters" => document.length(),
                "lines" => document.number_of_lines()
            );
        }
        Err(error) => {
            log_error!(error.error_code(), "Cannot read script",
                "path" => path.display(),
                "error" => error
            );
        }
    }
    result
}

fn load_script(path: &Path) -> Result<Document, InputError> {
    let size = fs::metadata(path)
        .map_err(|e| InputError::from_io(path, e))?
        .len();
    if size > MAX_SCRIPT_SIZE {
        return Err(InputError::TooLarge {
            path: path.to_path_buf(),
            size,
        });
    }

    let bytes = fs::read(path).map_err(|e| InputError::from_io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|_| InputError::InvalidEncoding {
        path: path.to_path_buf(),
    })?;
    Ok(Document::new(&text))
}

/// Dialect from a TOML file, or the generic default
pub fn load_dialect(path: Option<&Path>) -> Result<SqlDialect, InputError> {
    match path {
        Some(path) => SqlDialect::from_file(path).map_err(|e| {
            log_error!(e.error_code(), "Cannot load dialect",
                "path" => path.display(),
                "error" => e
            );
            InputError::Dialect(e)
        }),
        None => Ok(SqlDialect::default()),
    }
}

/// Runtime preferences from a TOML file, or the environment defaults
pub fn load_config(path: Option<&Path>) -> Result<RuntimeConfig, InputError> {
    let Some(path) = path else {
        return Ok(RuntimeConfig::default());
    };

    let text = fs::read_to_string(path).map_err(|e| InputError::from_io(path, e))?;
    let config = RuntimeConfig::from_toml_str(&text).map_err(|e| InputError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log_debug!("Runtime config loaded", "path" => path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_read_script() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("script.sql");
        fs::write(&path, "select 1;\nselect 2;\n").unwrap();

        let document = read_script(&path).unwrap();
        assert_eq!(document.length(), 20);
        assert_eq!(document.number_of_lines(), 3);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let error = read_script(&dir.path().join("missing.sql")).unwrap_err();
        assert_matches!(error, InputError::NotFound { .. });
        assert_eq!(error.error_code(), codes::input::FILE_NOT_FOUND);
    }

    #[test]
    fn test_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.sql");
        fs::write(&path, [b's', b'e', 0xff, b'l']).unwrap();

        assert_matches!(
            read_script(&path),
            Err(InputError::InvalidEncoding { .. })
        );
    }

    #[test]
    fn test_dialect_loading() {
        assert_eq!(load_dialect(None).unwrap(), SqlDialect::default());

        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "statement_delimiters = []").unwrap();
        let error = load_dialect(Some(&path)).unwrap_err();
        assert_matches!(error, InputError::Dialect(_));
        assert_eq!(error.error_code(), codes::dialect::EMPTY_DELIMITER);
    }

    #[test]
    fn test_config_loading() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sqlscan.toml");
        fs::write(&path, "[splitter]\nkeep_delimiters = true\n").unwrap();
        assert!(load_config(Some(&path)).unwrap().splitter.keep_delimiters);

        fs::write(&path, "[splitter\n").unwrap();
        let error = load_config(Some(&path)).unwrap_err();
        assert_matches!(error, InputError::Config { .. });
        assert_eq!(error.error_code(), codes::input::INVALID_CONFIG);

        assert_matches!(
            load_config(Some(&dir.path().join("missing.toml"))),
            Err(InputError::NotFound { .. })
        );
    }
}
