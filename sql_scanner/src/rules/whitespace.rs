use crate::lexical::{CharacterScanner, Rule};
use crate::tokens::Token;

/// A run of whitespace characters
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceRule;

impl WhitespaceRule {
    pub fn new() -> Self {
        Self
    }
}

impl<T> Rule<T> for WhitespaceRule {
    fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<T> {
        let mut count = 0;
        while scanner.read().is_some_and(char::is_whitespace) {
            count += 1;
        }
        scanner.unread();

        if count == 0 {
            Token::Undefined
        } else {
            Token::Whitespace
        }
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::evaluate;

    #[test]
    fn test_consumes_mixed_whitespace() {
        let (token, consumed) = evaluate::<()>(&WhitespaceRule, " \t\r\n x");
        assert_eq!(token, Token::Whitespace);
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_declines_on_text_and_eof() {
        assert_eq!(evaluate::<()>(&WhitespaceRule, "x "), (Token::Undefined, 0));
        assert_eq!(evaluate::<()>(&WhitespaceRule, ""), (Token::Undefined, 0));
    }
}
