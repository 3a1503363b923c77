use crate::lexical::{CharacterScanner, Rule};
use crate::tokens::Token;

/// Decimal digits with an optional fraction (`12`, `3.75`)
#[derive(Debug, Clone)]
pub struct NumberRule<T> {
    payload: T,
}

impl<T> NumberRule<T> {
    pub fn new(payload: T) -> Self {
        Self { payload }
    }
}

fn read_digits(scanner: &mut dyn CharacterScanner) -> usize {
    let mut count = 0;
    while scanner.read().is_some_and(|c| c.is_ascii_digit()) {
        count += 1;
    }
    scanner.unread();
    count
}

impl<T: Clone + Send> Rule<T> for NumberRule<T> {
    fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<T> {
        if read_digits(scanner) == 0 {
            return Token::Undefined;
        }

        if scanner.read() == Some('.') {
            if read_digits(scanner) == 0 {
                // "1." keeps the dot for the next rule
                scanner.unread();
            }
        } else {
            scanner.unread();
        }

        Token::Other(self.payload.clone())
    }

    fn name(&self) -> &'static str {
        "number"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::evaluate;

    #[test]
    fn test_integer_and_fraction() {
        let rule = NumberRule::new("number");
        assert_eq!(evaluate(&rule, "42;"), (Token::Other("number"), 2));
        assert_eq!(evaluate(&rule, "3.75 "), (Token::Other("number"), 4));
        assert_eq!(evaluate(&rule, "7"), (Token::Other("number"), 1));
    }

    #[test]
    fn test_trailing_dot_is_not_consumed() {
        let rule = NumberRule::new("number");
        assert_eq!(evaluate(&rule, "1.x"), (Token::Other("number"), 1));
    }

    #[test]
    fn test_declines_without_leading_digit() {
        let rule = NumberRule::new("number");
        assert_eq!(evaluate(&rule, ".5"), (Token::Undefined, 0));
        assert_eq!(evaluate(&rule, "x1"), (Token::Undefined, 0));
    }
}
