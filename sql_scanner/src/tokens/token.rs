//! Token values returned by rules and by the scanner fallback path

use serde::Serialize;
use std::fmt;

/// Categorical kind of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Undefined,
    Eof,
    Whitespace,
    Other,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Undefined => "undefined",
            TokenKind::Eof => "eof",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Other => "other",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable classification of a scanned lexeme
///
/// `Other` always carries the rule-owned payload. The three data-less
/// variants double as shared sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token<T> {
    /// A rule declined; never returned by the scanner itself
    Undefined,
    Eof,
    Whitespace,
    Other(T),
}

impl<T> Token<T> {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Undefined => TokenKind::Undefined,
            Token::Eof => TokenKind::Eof,
            Token::Whitespace => TokenKind::Whitespace,
            Token::Other(_) => TokenKind::Other,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Token::Undefined)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace)
    }

    pub fn is_other(&self) -> bool {
        matches!(self, Token::Other(_))
    }

    /// Payload of an `Other` token
    pub fn data(&self) -> Option<&T> {
        match self {
            Token::Other(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> Token<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Token::Undefined => Token::Undefined,
            Token::Eof => Token::Eof,
            Token::Whitespace => Token::Whitespace,
            Token::Other(data) => Token::Other(f(data)),
        }
    }
}

impl<T> Default for Token<T> {
    fn default() -> Self {
        Token::Undefined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        let eof: Token<&str> = Token::Eof;
        assert!(eof.is_eof());
        assert_eq!(eof.kind(), TokenKind::Eof);
        assert!(eof.data().is_none());

        let keyword = Token::Other("keyword");
        assert!(keyword.is_other());
        assert_eq!(keyword.data(), Some(&"keyword"));
        assert!(!keyword.is_whitespace());
    }

    #[test]
    fn test_equality_is_by_kind_and_data() {
        assert_eq!(Token::Other(1), Token::Other(1));
        assert_ne!(Token::Other(1), Token::Other(2));
        assert_eq!(Token::<u8>::Whitespace, Token::Whitespace);
        assert_ne!(Token::<u8>::Undefined, Token::Eof);
    }

    #[test]
    fn test_map_preserves_sentinels() {
        assert_eq!(Token::<u8>::Eof.map(|d| d + 1), Token::Eof);
        assert_eq!(Token::Other(1u8).map(|d| d + 1), Token::Other(2));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&TokenKind::Whitespace).unwrap();
        assert_eq!(json, "\"whitespace\"");
    }
}
