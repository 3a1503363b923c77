//! Statement delimiter recognition with runtime reconfiguration

use crate::config::compile_time::scanner::MAX_DELIMITER_LENGTH;
use crate::lexical::{read_sequence_ignore_case, to_upper, unread_n, CharacterScanner, Rule};
use crate::tokens::Token;
use crate::{log_debug, log_warning};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct DelimiterState {
    defaults: Vec<Vec<char>>,
    active: Vec<Vec<char>>,
    suppress_in_eval: bool,
}

/// Upper-cased, longest first
fn normalize<'a>(delimiters: impl IntoIterator<Item = &'a str>) -> Vec<Vec<char>> {
    let mut normalized: Vec<Vec<char>> = delimiters
        .into_iter()
        .filter(|d| !d.is_empty())
        .map(|d| d.chars().map(to_upper).collect())
        .collect();
    normalized.sort_by(|a, b| b.len().cmp(&a.len()));
    normalized
}

/// Shared view of a [`DelimiterRule`]'s configuration
///
/// Cloning the handle shares the state, so callers and the set-delimiter
/// rule can switch the active delimiter while the scanner owns the rule.
#[derive(Debug, Clone)]
pub struct DelimiterHandle {
    state: Arc<Mutex<DelimiterState>>,
}

impl DelimiterHandle {
    fn new(delimiters: &[String]) -> Self {
        let defaults = normalize(delimiters.iter().map(String::as_str));
        Self {
            state: Arc::new(Mutex::new(DelimiterState {
                active: defaults.clone(),
                defaults,
                suppress_in_eval: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DelimiterState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Switch to a single delimiter; `None` or an empty string restores the defaults
    pub fn change_delimiter(&self, delimiter: Option<&str>) {
        match delimiter {
            None | Some("") => self.reset(),
            Some(delimiter) => {
                let length = delimiter.chars().count();
                if length > MAX_DELIMITER_LENGTH {
                    log_warning!("Ignoring over-long delimiter",
                        "length" => length,
                        "limit" => MAX_DELIMITER_LENGTH
                    );
                    return;
                }
                self.lock().active = normalize([delimiter]);
                log_debug!("Statement delimiter changed", "delimiter" => delimiter);
            }
        }
    }

    /// Restore the configured delimiters
    pub fn reset(&self) {
        let mut state = self.lock();
        state.active = state.defaults.clone();
    }

    /// Active delimiters, upper-cased, longest first
    pub fn active(&self) -> Vec<String> {
        self.lock()
            .active
            .iter()
            .map(|d| d.iter().collect())
            .collect()
    }

    pub fn is_default(&self) -> bool {
        let state = self.lock();
        state.active == state.defaults
    }

    /// Make the rule decline while the scanner is in evaluation mode
    pub fn set_suppress_in_eval(&self, suppress: bool) {
        self.lock().suppress_in_eval = suppress;
    }

    pub fn suppresses_in_eval(&self) -> bool {
        self.lock().suppress_in_eval
    }
}

/// Recognizes the active statement delimiter(s)
///
/// Matching is case-insensitive. A delimiter ending in a letter or digit
/// (`GO`) only matches when not followed by another letter or digit.
pub struct DelimiterRule<T> {
    handle: DelimiterHandle,
    payload: T,
}

impl<T> DelimiterRule<T> {
    pub fn new(delimiters: &[String], payload: T) -> Self {
        Self {
            handle: DelimiterHandle::new(delimiters),
            payload,
        }
    }

    /// Never fire while the scanner is in evaluation mode
    pub fn suppress_in_eval(self, suppress: bool) -> Self {
        self.handle.set_suppress_in_eval(suppress);
        self
    }

    pub fn handle(&self) -> DelimiterHandle {
        self.handle.clone()
    }

    pub fn change_delimiter(&self, delimiter: Option<&str>) {
        self.handle.change_delimiter(delimiter);
    }
}

impl<T: Clone + Send> Rule<T> for DelimiterRule<T> {
    fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<T> {
        let state = self.handle.lock();
        if state.suppress_in_eval && scanner.is_eval_mode() {
            return Token::Undefined;
        }

        for delimiter in &state.active {
            if !read_sequence_ignore_case(scanner, delimiter) {
                continue;
            }
            let ends_alphanumeric = delimiter.last().is_some_and(|c| c.is_alphanumeric());
            if ends_alphanumeric {
                let next = scanner.read();
                scanner.unread();
                if next.is_some_and(|c| c.is_alphanumeric()) {
                    unread_n(scanner, delimiter.len());
                    continue;
                }
            }
            return Token::Other(self.payload.clone());
        }
        Token::Undefined
    }

    fn reset(&self) {
        self.handle.reset();
    }

    fn name(&self) -> &'static str {
        "delimiter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{evaluate, StrCursor};

    fn rule(delimiters: &[&str]) -> DelimiterRule<&'static str> {
        let delimiters: Vec<String> = delimiters.iter().map(|d| d.to_string()).collect();
        DelimiterRule::new(&delimiters, "delimiter")
    }

    #[test]
    fn test_default_semicolon() {
        let rule = rule(&[";"]);
        assert_eq!(evaluate(&rule, "; x"), (Token::Other("delimiter"), 1));
        assert_eq!(evaluate(&rule, "x;"), (Token::Undefined, 0));
    }

    #[test]
    fn test_longest_delimiter_wins() {
        let rule = rule(&["/", "//"]);
        assert_eq!(evaluate(&rule, "// x"), (Token::Other("delimiter"), 2));
        assert_eq!(evaluate(&rule, "/ x"), (Token::Other("delimiter"), 1));
    }

    #[test]
    fn test_word_delimiter_requires_boundary() {
        let rule = rule(&["GO"]);
        assert_eq!(evaluate(&rule, "go\n"), (Token::Other("delimiter"), 2));
        assert_eq!(evaluate(&rule, "GO"), (Token::Other("delimiter"), 2));
        assert_eq!(evaluate(&rule, "GOTO"), (Token::Undefined, 0));
        assert_eq!(evaluate(&rule, "G;"), (Token::Undefined, 0));
    }

    #[test]
    fn test_change_and_reset() {
        let rule = rule(&[";"]);
        let handle = rule.handle();

        rule.change_delimiter(Some("$$"));
        assert_eq!(handle.active(), vec!["$$".to_string()]);
        assert_eq!(evaluate(&rule, ";"), (Token::Undefined, 0));
        assert_eq!(evaluate(&rule, "$$"), (Token::Other("delimiter"), 2));
        assert!(!handle.is_default());

        handle.change_delimiter(Some(""));
        assert!(handle.is_default());

        handle.change_delimiter(Some("go"));
        Rule::reset(&rule);
        assert_eq!(handle.active(), vec![";".to_string()]);
    }

    #[test]
    fn test_over_long_delimiter_is_ignored() {
        let rule = rule(&[";"]);
        let long = "x".repeat(MAX_DELIMITER_LENGTH + 1);
        rule.change_delimiter(Some(&long));
        assert!(rule.handle().is_default());
    }

    #[test]
    fn test_eval_suppression() {
        let rule = rule(&[";"]).suppress_in_eval(true);
        let mut cursor = StrCursor::new(";");
        cursor.eval_mode = true;
        assert_eq!(rule.evaluate(&mut cursor), Token::Undefined);
        assert_eq!(cursor.offset, 0);

        cursor.eval_mode = false;
        assert_eq!(rule.evaluate(&mut cursor), Token::Other("delimiter"));
    }

    #[test]
    fn test_suppression_toggled_through_handle() {
        let rule = rule(&[";"]).suppress_in_eval(true);
        let handle = rule.handle();
        assert!(handle.suppresses_in_eval());

        handle.set_suppress_in_eval(false);
        let mut cursor = StrCursor::new(";");
        cursor.eval_mode = true;
        assert_eq!(rule.evaluate(&mut cursor), Token::Other("delimiter"));
        assert_eq!(cursor.offset, 1);
    }
}
