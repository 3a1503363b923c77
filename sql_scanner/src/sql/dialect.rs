//! SQL dialect description consumed by the rule manager
//!
//! Dialects are plain data, loadable from TOML. The default is a small
//! generic configuration; vendor keyword sets are supplied by callers.

use crate::config::compile_time::input::MAX_DIALECT_FILE_SIZE;
use crate::config::compile_time::scanner::*;
use crate::lexical::ScannerError;
use crate::logging::codes;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Dialect loading and validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialectError {
    #[error("Cannot read dialect file {path}: {message}")]
    FileRead { path: PathBuf, message: String },

    #[error("Dialect file too large: {size} bytes (max {MAX_DIALECT_FILE_SIZE})")]
    FileTooLarge { path: PathBuf, size: u64 },

    #[error("Invalid dialect TOML: {message}")]
    InvalidToml { message: String },

    #[error("Statement delimiters must not be empty")]
    EmptyDelimiter,

    #[error("Delimiter '{delimiter}' too long: {length} characters (max {MAX_DELIMITER_LENGTH})")]
    DelimiterTooLong { delimiter: String, length: usize },

    #[error("Too many statement delimiters: {count} (max {MAX_DELIMITERS})")]
    TooManyDelimiters { count: usize },

    #[error("Too many dialect words: {count} (max {MAX_DIALECT_WORDS})")]
    TooManyWords { count: usize },

    #[error("Invalid comment markers: '{begin}' / '{end}'")]
    InvalidCommentPair { begin: String, end: String },

    #[error(transparent)]
    Scanner(#[from] ScannerError),
}

impl DialectError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            DialectError::FileRead { .. } => codes::input::IO_ERROR,
            DialectError::FileTooLarge { .. } => codes::input::FILE_TOO_LARGE,
            DialectError::InvalidToml { .. } => codes::dialect::INVALID_TOML,
            DialectError::EmptyDelimiter => codes::dialect::EMPTY_DELIMITER,
            DialectError::DelimiterTooLong { .. } => codes::dialect::DELIMITER_TOO_LONG,
            DialectError::TooManyDelimiters { .. } => codes::dialect::TOO_MANY_DELIMITERS,
            DialectError::TooManyWords { .. } => codes::dialect::TOO_MANY_WORDS,
            DialectError::InvalidCommentPair { .. } => codes::dialect::INVALID_COMMENT_PAIR,
            DialectError::Scanner(e) => e.error_code(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlDialect {
    pub name: String,

    /// Line comment prefixes; a leading `^` restricts the prefix to line starts
    pub single_line_comments: Vec<String>,

    pub multi_line_comment: Option<(String, String)>,

    /// Identifier quote; `None` keeps only the built-in `"` rule
    pub quote_symbol: Option<String>,

    pub escape_char: Option<char>,

    pub statement_delimiters: Vec<String>,

    /// Line-leading command that redefines the delimiter (`DELIMITER`)
    pub script_delimiter_redefiner: Option<String>,

    /// Symmetric block marker such as `$$`
    pub block_toggle: Option<String>,

    pub reserved_words: Vec<String>,
    pub data_types: Vec<String>,
    pub functions: Vec<String>,
    pub block_begin_words: Vec<String>,
    pub block_end_words: Vec<String>,

    pub anonymous_parameter_mark: char,
    pub named_parameter_prefix: char,
    pub anonymous_parameters_enabled: bool,
    pub named_parameters_enabled: bool,

    /// Blank lines separate statements
    pub blank_line_delimiter: bool,

    /// Keep a trailing `;` on statements that contain blocks
    pub delimiter_after_query: bool,

    /// Keep a trailing `;` on DDL statements whose last keyword is `END`
    pub delimiter_after_block: bool,

    /// Leading keywords that mark a DDL statement
    pub ddl_keywords: Vec<String>,
}

impl Default for SqlDialect {
    fn default() -> Self {
        Self {
            name: "generic".to_string(),
            single_line_comments: strings(&["--"]),
            multi_line_comment: Some(("/*".to_string(), "*/".to_string())),
            quote_symbol: Some("\"".to_string()),
            escape_char: Some('\\'),
            statement_delimiters: strings(&[";"]),
            script_delimiter_redefiner: None,
            block_toggle: None,
            reserved_words: strings(&[
                "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CREATE", "DELETE", "DESC",
                "DISTINCT", "DROP", "ELSE", "EXISTS", "FROM", "FUNCTION", "GROUP", "HAVING", "IN",
                "INDEX", "INNER", "INSERT", "INTO", "IS", "JOIN", "LEFT", "LIKE", "LIMIT", "NOT",
                "NULL", "ON", "OR", "ORDER", "OUTER", "PROCEDURE", "RIGHT", "SELECT", "SET",
                "TABLE", "THEN", "TRIGGER", "UNION", "UPDATE", "VALUES", "VIEW", "WHEN", "WHERE",
                "WITH",
            ]),
            data_types: strings(&[
                "BIGINT", "BOOLEAN", "CHAR", "DATE", "DECIMAL", "DOUBLE", "FLOAT", "INT",
                "INTEGER", "NUMERIC", "REAL", "SMALLINT", "TEXT", "TIME", "TIMESTAMP", "VARCHAR",
            ]),
            functions: strings(&[
                "AVG", "CAST", "COALESCE", "COUNT", "LOWER", "MAX", "MIN", "NULLIF", "SUM",
                "UPPER",
            ]),
            block_begin_words: strings(&["BEGIN"]),
            block_end_words: strings(&["END"]),
            anonymous_parameter_mark: '?',
            named_parameter_prefix: ':',
            anonymous_parameters_enabled: true,
            named_parameters_enabled: true,
            blank_line_delimiter: false,
            delimiter_after_query: false,
            delimiter_after_block: false,
            ddl_keywords: Vec::new(),
        }
    }
}

impl SqlDialect {
    /// Parse and validate a dialect from TOML; missing keys take default values
    pub fn from_toml_str(content: &str) -> Result<Self, DialectError> {
        let dialect: SqlDialect =
            toml::from_str(content).map_err(|e| DialectError::InvalidToml {
                message: e.to_string(),
            })?;
        dialect.validate()?;
        Ok(dialect)
    }

    pub fn from_file(path: &Path) -> Result<Self, DialectError> {
        let read_error = |e: std::io::Error| DialectError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let size = fs::metadata(path).map_err(read_error)?.len();
        if size > MAX_DIALECT_FILE_SIZE {
            return Err(DialectError::FileTooLarge {
                path: path.to_path_buf(),
                size,
            });
        }

        let content = fs::read_to_string(path).map_err(read_error)?;
        let dialect = Self::from_toml_str(&content)?;
        crate::log_debug!("Dialect loaded",
            "dialect" => dialect.name.as_str(),
            "path" => path.display(),
            "words" => dialect.word_count()
        );
        Ok(dialect)
    }

    pub fn to_toml_string(&self) -> Result<String, DialectError> {
        toml::to_string(self).map_err(|e| DialectError::InvalidToml {
            message: e.to_string(),
        })
    }

    pub fn word_count(&self) -> usize {
        self.reserved_words.len()
            + self.data_types.len()
            + self.functions.len()
            + self.block_begin_words.len()
            + self.block_end_words.len()
    }

    /// Whether `keyword` starts a DDL statement, ignoring case
    pub fn is_ddl_keyword(&self, keyword: &str) -> bool {
        self.ddl_keywords
            .iter()
            .any(|ddl| ddl.eq_ignore_ascii_case(keyword))
    }

    /// Check the dialect against the compile-time limits
    pub fn validate(&self) -> Result<(), DialectError> {
        if self.statement_delimiters.is_empty()
            || self.statement_delimiters.iter().any(|d| d.is_empty())
        {
            return Err(DialectError::EmptyDelimiter);
        }
        if self.statement_delimiters.len() > MAX_DELIMITERS {
            return Err(DialectError::TooManyDelimiters {
                count: self.statement_delimiters.len(),
            });
        }
        for delimiter in &self.statement_delimiters {
            let length = delimiter.chars().count();
            if length > MAX_DELIMITER_LENGTH {
                return Err(DialectError::DelimiterTooLong {
                    delimiter: delimiter.clone(),
                    length,
                });
            }
        }

        if let Some((begin, end)) = &self.multi_line_comment {
            if begin.is_empty() || end.is_empty() {
                return Err(DialectError::InvalidCommentPair {
                    begin: begin.clone(),
                    end: end.clone(),
                });
            }
        }
        if let Some(prefix) = self
            .single_line_comments
            .iter()
            .find(|p| p.trim_start_matches('^').is_empty())
        {
            return Err(DialectError::InvalidCommentPair {
                begin: prefix.clone(),
                end: String::new(),
            });
        }

        let words = self.word_count();
        if words > MAX_DIALECT_WORDS {
            return Err(DialectError::TooManyWords { count: words });
        }

        Ok(())
    }
}
