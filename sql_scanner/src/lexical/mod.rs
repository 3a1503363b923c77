//! Rule-based lexical scanning core
//!
//! A [`RuleBasedScanner`] holds an ordered list of [`Rule`]s and a default
//! token. Binding a range yields a [`ScanSession`]; each `next_token()` call
//! tries the rules in order against the session's [`CharacterScanner`]
//! cursor, and the first rule that recognizes a lexeme wins.
//! When every rule declines the scanner consumes one raw character and
//! returns the default token, or returns EOF at the end of the range.

pub mod metrics;
pub mod scanner;

use crate::config::compile_time::scanner::*;
use crate::logging::codes;
use crate::tokens::Token;

pub use metrics::ScanMetrics;
pub use scanner::{RuleBasedScanner, ScanSession};

/// Scanner configuration and session errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScannerError {
    #[error("Too many rules: {count} (max {MAX_RULES})")]
    TooManyRules { count: usize },

    #[error("Token limit reached: {count} tokens (max {limit})")]
    TokenLimitReached { count: usize, limit: usize },
}

impl ScannerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ScannerError::TooManyRules { .. } => codes::scanning::TOO_MANY_RULES,
            ScannerError::TokenLimitReached { .. } => codes::scanning::TOKEN_LIMIT_REACHED,
        }
    }
}

/// Cursor over the active scan range, as seen by rules
///
/// `read` always advances, so every `unread` undoes exactly one `read`, even
/// one that returned EOF.
pub trait CharacterScanner {
    /// Next character in the range, or `None` at the range end
    fn read(&mut self) -> Option<char>;

    /// Step back over the last read
    fn unread(&mut self);

    /// 0-based column of the cursor, `None` when it cannot be located
    fn column(&mut self) -> Option<usize>;

    /// Line endings recognized by the bound buffer
    fn legal_line_delimiters(&self) -> &[String];

    /// Character just before the cursor; `None` at the start of the buffer
    fn previous_char(&self) -> Option<char>;

    /// Whether the session is an evaluation-mode scan
    fn is_eval_mode(&self) -> bool;
}

/// A unit of recognition tried in priority order
///
/// A rule either consumes a lexeme and returns a non-undefined token, or
/// returns [`Token::Undefined`] with every read matched by an unread.
pub trait Rule<T>: Send {
    fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<T>;

    /// Restore default configuration; called when evaluation mode ends
    fn reset(&self) {}

    fn name(&self) -> &'static str;
}

/// Shorthand for a boxed rule list
pub type RuleList<T> = Vec<Box<dyn Rule<T>>>;

/// Step back `count` characters
pub fn unread_n(scanner: &mut dyn CharacterScanner, count: usize) {
    for _ in 0..count {
        scanner.unread();
    }
}

/// Try to read `sequence` exactly; on mismatch the cursor is restored
pub fn read_sequence(scanner: &mut dyn CharacterScanner, sequence: &[char]) -> bool {
    for (i, expected) in sequence.iter().enumerate() {
        if scanner.read() != Some(*expected) {
            unread_n(scanner, i + 1);
            return false;
        }
    }
    true
}

/// Case-insensitive variant of [`read_sequence`] for upper-cased patterns
pub fn read_sequence_ignore_case(scanner: &mut dyn CharacterScanner, upper: &[char]) -> bool {
    for (i, expected) in upper.iter().enumerate() {
        let matched = scanner.read().is_some_and(|c| to_upper(c) == *expected);
        if !matched {
            unread_n(scanner, i + 1);
            return false;
        }
    }
    true
}

/// Single-character upper-casing; characters that expand keep their case
pub fn to_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Check the generated scanner limits at startup
pub fn validate_limits() -> Result<(), String> {
    if MAX_RULES == 0 {
        return Err("MAX_RULES cannot be zero".to_string());
    }
    if MAX_TOKENS_PER_SCAN == 0 {
        return Err("MAX_TOKENS_PER_SCAN cannot be zero".to_string());
    }
    if MAX_DELIMITER_LENGTH == 0 {
        return Err("MAX_DELIMITER_LENGTH cannot be zero".to_string());
    }

    let scanner_codes = [
        codes::scanning::BAD_LOCATION,
        codes::scanning::RANGE_CLAMPED,
        codes::scanning::TOO_MANY_RULES,
        codes::scanning::TOKEN_LIMIT_REACHED,
    ];
    if let Some(code) = scanner_codes.iter().find(|code| code.info().is_none()) {
        return Err(format!("scanner code {} is not registered", code));
    }

    crate::log_debug!("Scanner limits validated",
        "max_rules" => MAX_RULES,
        "max_tokens_per_scan" => MAX_TOKENS_PER_SCAN,
        "max_delimiter_length" => MAX_DELIMITER_LENGTH
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_validate() {
        assert!(validate_limits().is_ok());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ScannerError::TooManyRules { count: 1000 }.error_code(),
            codes::scanning::TOO_MANY_RULES
        );
        let error = ScannerError::TokenLimitReached { count: 5, limit: 5 };
        assert_eq!(error.to_string(), "Token limit reached: 5 tokens (max 5)");
    }

    #[test]
    fn test_to_upper() {
        assert_eq!(to_upper('g'), 'G');
        assert_eq!(to_upper(';'), ';');
        assert_eq!(to_upper('ß'), 'ß');
    }
}
