//! Concrete scanning rules
//!
//! Every rule here either consumes a lexeme and returns a token, or returns
//! `Token::Undefined` after unreading everything it read.

pub mod delimiter;
pub mod number;
pub mod parameter;
pub mod pattern;
pub mod set_delimiter;
pub mod whitespace;
pub mod word;

pub use delimiter::{DelimiterHandle, DelimiterRule};
pub use number::NumberRule;
pub use parameter::ParameterRule;
pub use pattern::{EndOfLineRule, MultiLineRule};
pub use set_delimiter::SetDelimiterRule;
pub use whitespace::WhitespaceRule;
pub use word::{SqlWordDetector, SymbolSequenceDetector, WordDetector, WordRule};

/// Identifier continuation character (letters, digits, `_`, `$`)
pub fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::lexical::{CharacterScanner, Rule};
    use crate::tokens::Token;

    /// Bare cursor over a string, for exercising one rule at a time
    pub struct StrCursor {
        chars: Vec<char>,
        pub offset: usize,
        pub eval_mode: bool,
        delimiters: Vec<String>,
    }

    impl StrCursor {
        pub fn new(text: &str) -> Self {
            Self {
                chars: text.chars().collect(),
                offset: 0,
                eval_mode: false,
                delimiters: vec!["\r\n".into(), "\n".into(), "\r".into()],
            }
        }

        pub fn at(text: &str, offset: usize) -> Self {
            let mut cursor = Self::new(text);
            cursor.offset = offset;
            cursor
        }
    }

    impl CharacterScanner for StrCursor {
        fn read(&mut self) -> Option<char> {
            let c = self.chars.get(self.offset).copied();
            self.offset += 1;
            c
        }

        fn unread(&mut self) {
            self.offset -= 1;
        }

        fn column(&mut self) -> Option<usize> {
            let line_start = self.chars[..self.offset.min(self.chars.len())]
                .iter()
                .rposition(|c| *c == '\n' || *c == '\r')
                .map_or(0, |i| i + 1);
            Some(self.offset - line_start)
        }

        fn legal_line_delimiters(&self) -> &[String] {
            &self.delimiters
        }

        fn previous_char(&self) -> Option<char> {
            self.offset
                .checked_sub(1)
                .and_then(|i| self.chars.get(i).copied())
        }

        fn is_eval_mode(&self) -> bool {
            self.eval_mode
        }
    }

    /// Evaluate `rule` at the start of `text`: the token and characters consumed
    pub fn evaluate<T>(rule: &dyn Rule<T>, text: &str) -> (Token<T>, usize) {
        let mut cursor = StrCursor::new(text);
        let token = rule.evaluate(&mut cursor);
        (token, cursor.offset)
    }
}
