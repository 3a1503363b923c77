//! Start/end sequence rules: line comments, block comments, quoted text
//!
//! Both public rules share one matcher. After the start sequence the matcher
//! reads until the end sequence, honoring an optional escape character. A
//! line delimiter ends the pattern (inclusive) when `breaks_on_eol` is set;
//! reaching EOF ends it when `breaks_on_eof` is set. Otherwise a missing end
//! sequence makes the rule decline and unread everything.

use crate::lexical::{read_sequence, unread_n, CharacterScanner, Rule};
use crate::tokens::Token;

#[derive(Debug, Clone)]
struct PatternMatcher {
    start: Vec<char>,
    end: Vec<char>,
    escape: Option<char>,
    breaks_on_eol: bool,
    breaks_on_eof: bool,
    at_line_start: bool,
}

impl PatternMatcher {
    fn new(start: &str, end: &str) -> Self {
        debug_assert!(!start.is_empty(), "pattern start sequence must not be empty");
        Self {
            start: start.chars().collect(),
            end: end.chars().collect(),
            escape: None,
            breaks_on_eol: false,
            breaks_on_eof: false,
            at_line_start: false,
        }
    }

    fn matches(&self, scanner: &mut dyn CharacterScanner) -> bool {
        if self.at_line_start && scanner.column() != Some(0) {
            return false;
        }
        if !read_sequence(scanner, &self.start) {
            return false;
        }

        let mut consumed = self.start.len();
        if self.end_detected(scanner, &mut consumed) {
            true
        } else {
            unread_n(scanner, consumed);
            false
        }
    }

    /// Doubled end quote (`''`) stands for one literal quote
    fn escape_is_doubled_quote(&self) -> bool {
        self.end.len() == 1 && self.escape == Some(self.end[0])
    }

    fn end_detected(&self, scanner: &mut dyn CharacterScanner, consumed: &mut usize) -> bool {
        let line_delimiters: Vec<Vec<char>> = if self.breaks_on_eol {
            scanner
                .legal_line_delimiters()
                .iter()
                .map(|d| d.chars().collect())
                .collect()
        } else {
            Vec::new()
        };

        loop {
            let Some(c) = scanner.read() else {
                scanner.unread();
                return self.breaks_on_eof;
            };
            *consumed += 1;

            if Some(c) == self.escape {
                if self.escape_is_doubled_quote() {
                    if scanner.read() == Some(c) {
                        *consumed += 1;
                        continue;
                    }
                    scanner.unread();
                    return true;
                }
                if scanner.read().is_some() {
                    *consumed += 1;
                } else {
                    scanner.unread();
                }
                continue;
            }

            if !self.end.is_empty() && c == self.end[0] {
                if read_sequence(scanner, &self.end[1..]) {
                    *consumed += self.end.len() - 1;
                    return true;
                }
                continue;
            }

            for delimiter in &line_delimiters {
                if delimiter.first() == Some(&c) && read_sequence(scanner, &delimiter[1..]) {
                    *consumed += delimiter.len() - 1;
                    return true;
                }
            }
        }
    }
}

/// From a start sequence to the end of the line, terminator included
#[derive(Debug, Clone)]
pub struct EndOfLineRule<T> {
    matcher: PatternMatcher,
    payload: T,
}

impl<T> EndOfLineRule<T> {
    pub fn new(start: &str, payload: T) -> Self {
        let mut matcher = PatternMatcher::new(start, "");
        matcher.breaks_on_eol = true;
        matcher.breaks_on_eof = true;
        Self { matcher, payload }
    }

    /// Only match when the start sequence begins a line
    pub fn at_line_start(mut self) -> Self {
        self.matcher.at_line_start = true;
        self
    }

    pub fn with_escape(mut self, escape: char) -> Self {
        self.matcher.escape = Some(escape);
        self
    }
}

impl<T: Clone + Send> Rule<T> for EndOfLineRule<T> {
    fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<T> {
        if self.matcher.matches(scanner) {
            Token::Other(self.payload.clone())
        } else {
            Token::Undefined
        }
    }

    fn name(&self) -> &'static str {
        "end-of-line"
    }
}

/// Text between a start and an end sequence
#[derive(Debug, Clone)]
pub struct MultiLineRule<T> {
    matcher: PatternMatcher,
    payload: T,
}

impl<T> MultiLineRule<T> {
    pub fn new(start: &str, end: &str, payload: T) -> Self {
        Self {
            matcher: PatternMatcher::new(start, end),
            payload,
        }
    }

    /// Variant that ends at the first line delimiter when the end sequence is missing
    pub fn single_line(start: &str, end: &str, payload: T) -> Self {
        let mut rule = Self::new(start, end, payload);
        rule.matcher.breaks_on_eol = true;
        rule
    }

    pub fn with_escape(mut self, escape: char) -> Self {
        self.matcher.escape = Some(escape);
        self
    }

    /// An unterminated pattern runs to the end of the range
    pub fn breaks_on_eof(mut self) -> Self {
        self.matcher.breaks_on_eof = true;
        self
    }
}

impl<T: Clone + Send> Rule<T> for MultiLineRule<T> {
    fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<T> {
        if self.matcher.matches(scanner) {
            Token::Other(self.payload.clone())
        } else {
            Token::Undefined
        }
    }

    fn name(&self) -> &'static str {
        if self.matcher.breaks_on_eol {
            "single-line"
        } else {
            "multi-line"
        }
    }
}
