use super::is_identifier_part;
use crate::lexical::{unread_n, CharacterScanner, Rule};
use crate::tokens::Token;

/// Anonymous (`?`) and named (`:name`) query parameters
#[derive(Debug, Clone)]
pub struct ParameterRule<T> {
    payload: T,
    anonymous_mark: char,
    named_prefix: char,
    anonymous_enabled: bool,
    named_enabled: bool,
}

impl<T> ParameterRule<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            anonymous_mark: '?',
            named_prefix: ':',
            anonymous_enabled: true,
            named_enabled: true,
        }
    }

    pub fn with_marks(mut self, anonymous_mark: char, named_prefix: char) -> Self {
        self.anonymous_mark = anonymous_mark;
        self.named_prefix = named_prefix;
        self
    }

    pub fn anonymous_enabled(mut self, enabled: bool) -> Self {
        self.anonymous_enabled = enabled;
        self
    }

    pub fn named_enabled(mut self, enabled: bool) -> Self {
        self.named_enabled = enabled;
        self
    }

    fn is_mark(&self, c: char) -> bool {
        c == self.anonymous_mark || c == self.named_prefix
    }
}

impl<T: Clone + Send> Rule<T> for ParameterRule<T> {
    fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<T> {
        // `x::int`, `a?`, `\?` and `/?` are not parameters
        if let Some(previous) = scanner.previous_char() {
            if is_identifier_part(previous)
                || self.is_mark(previous)
                || previous == '\\'
                || previous == '/'
            {
                return Token::Undefined;
            }
        }

        let first = match scanner.read() {
            Some(c) if self.is_mark(c) => c,
            _ => {
                scanner.unread();
                return Token::Undefined;
            }
        };

        let mut length = 1;
        while scanner.read().is_some_and(is_identifier_part) {
            length += 1;
        }
        scanner.unread();

        let anonymous = self.anonymous_enabled && length == 1 && first == self.anonymous_mark;
        let named = self.named_enabled && length > 1 && first == self.named_prefix;
        if anonymous || named {
            return Token::Other(self.payload.clone());
        }

        unread_n(scanner, length);
        Token::Undefined
    }

    fn name(&self) -> &'static str {
        "parameter"
    }
}
