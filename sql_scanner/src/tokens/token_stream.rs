//! Materialized scan output
//!
//! The scanner itself keeps no token history. Callers that want the whole
//! sequence collect it here as `(token, offset, length)` records and slice
//! lexemes from the buffer on demand.

use crate::text::{BufferError, TextBuffer};
use crate::tokens::token::Token;
use crate::utils::Span;

/// A token together with the buffer range it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedToken<T> {
    pub token: Token<T>,
    pub offset: usize,
    pub length: usize,
}

impl<T> ScannedToken<T> {
    pub fn new(token: Token<T>, offset: usize, length: usize) -> Self {
        Self {
            token,
            offset,
            length,
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    pub fn span(&self) -> Span {
        Span::from_offsets(self.offset, self.end())
    }

    /// Slice this token's text out of the scanned buffer
    pub fn lexeme(&self, buffer: &dyn TextBuffer) -> Result<String, BufferError> {
        buffer.text(self.offset, self.length)
    }
}

/// Ordered tokens of one scan session, terminated by EOF
#[derive(Debug, Clone)]
pub struct TokenStream<T> {
    tokens: Vec<ScannedToken<T>>,
}

impl<T> TokenStream<T> {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn push(&mut self, token: ScannedToken<T>) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScannedToken<T>> {
        self.tokens.iter()
    }

    /// Tokens that are neither whitespace nor EOF
    pub fn significant(&self) -> impl Iterator<Item = &ScannedToken<T>> {
        self.tokens
            .iter()
            .filter(|t| !t.token.is_whitespace() && !t.token.is_eof())
    }

    pub fn ends_with_eof(&self) -> bool {
        self.tokens.last().is_some_and(|t| t.token.is_eof())
    }

    /// Total characters covered by the stream
    pub fn covered_length(&self) -> usize {
        self.tokens.iter().map(|t| t.length).sum()
    }

    pub fn into_vec(self) -> Vec<ScannedToken<T>> {
        self.tokens
    }
}

impl<T> Default for TokenStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for TokenStream<T> {
    type Item = ScannedToken<T>;
    type IntoIter = std::vec::IntoIter<ScannedToken<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a TokenStream<T> {
    type Item = &'a ScannedToken<T>;
    type IntoIter = std::slice::Iter<'a, ScannedToken<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Document;

    #[test]
    fn test_significant_skips_whitespace_and_eof() {
        let mut stream = TokenStream::new();
        stream.push(ScannedToken::new(Token::Other("word"), 0, 1));
        stream.push(ScannedToken::new(Token::Whitespace, 1, 1));
        stream.push(ScannedToken::new(Token::Other("word"), 2, 1));
        stream.push(ScannedToken::new(Token::Eof, 3, 0));

        assert_eq!(stream.significant().count(), 2);
        assert!(stream.ends_with_eof());
        assert_eq!(stream.covered_length(), 3);
    }

    #[test]
    fn test_lexeme_slices_buffer() {
        let doc = Document::new("select x");
        let token = ScannedToken::new(Token::Other(()), 7, 1);
        assert_eq!(token.lexeme(&doc).unwrap(), "x");
        assert_eq!(token.span().len(), 1);
    }
}
