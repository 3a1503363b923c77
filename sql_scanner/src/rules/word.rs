//! Word recognition with a case-insensitive lookup table

use super::is_identifier_part;
use crate::lexical::{to_upper, unread_n, CharacterScanner, Rule};
use crate::tokens::Token;
use std::collections::HashMap;

/// Decides which characters start and continue a word
pub trait WordDetector: Send {
    fn is_word_start(&self, c: char) -> bool;
    fn is_word_part(&self, c: char) -> bool;
}

/// SQL identifiers: a letter or `_`, then letters, digits, `_` or `$`
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlWordDetector;

impl WordDetector for SqlWordDetector {
    fn is_word_start(&self, c: char) -> bool {
        c.is_alphabetic() || c == '_'
    }

    fn is_word_part(&self, c: char) -> bool {
        is_identifier_part(c)
    }
}

/// Words made only of the characters of one symbol sequence (`$$`, `@@`)
#[derive(Debug, Clone)]
pub struct SymbolSequenceDetector {
    symbols: Vec<char>,
}

impl SymbolSequenceDetector {
    pub fn new(sequence: &str) -> Self {
        Self {
            symbols: sequence.chars().collect(),
        }
    }
}

impl WordDetector for SymbolSequenceDetector {
    fn is_word_start(&self, c: char) -> bool {
        self.symbols.first() == Some(&c)
    }

    fn is_word_part(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }
}

/// Reads a whole word and classifies it by table lookup
///
/// Unknown words return `default_token`; when that is `Undefined` the rule
/// unreads the word and declines.
pub struct WordRule<T> {
    detector: Box<dyn WordDetector>,
    default_token: Token<T>,
    words: HashMap<String, T>,
}

impl<T> WordRule<T> {
    pub fn new(detector: Box<dyn WordDetector>, default_token: Token<T>) -> Self {
        Self {
            detector,
            default_token,
            words: HashMap::new(),
        }
    }

    /// Register `word`; a later registration of the same word replaces it
    pub fn add_word(&mut self, word: &str, payload: T) {
        self.words.insert(word.chars().map(to_upper).collect(), payload);
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn lookup(&self, word: &str) -> Option<&T> {
        let key: String = word.chars().map(to_upper).collect();
        self.words.get(&key)
    }
}

impl<T: Clone + Send> Rule<T> for WordRule<T> {
    fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<T> {
        match scanner.read() {
            Some(c) if self.detector.is_word_start(c) => {
                let mut word = String::new();
                word.push(to_upper(c));
                let mut length = 1;
                while let Some(next) = scanner.read().filter(|n| self.detector.is_word_part(*n)) {
                    word.push(to_upper(next));
                    length += 1;
                }
                scanner.unread();

                if let Some(payload) = self.words.get(&word) {
                    return Token::Other(payload.clone());
                }
                if self.default_token.is_undefined() {
                    unread_n(scanner, length);
                }
                self.default_token.clone()
            }
            _ => {
                scanner.unread();
                Token::Undefined
            }
        }
    }

    fn name(&self) -> &'static str {
        "word"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::evaluate;

    fn keyword_rule(default_token: Token<&'static str>) -> WordRule<&'static str> {
        let mut rule = WordRule::new(Box::new(SqlWordDetector), default_token);
        rule.add_word("select", "keyword");
        rule.add_word("VARCHAR", "type");
        rule
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let rule = keyword_rule(Token::Other("text"));
        assert_eq!(evaluate(&rule, "SeLeCt *"), (Token::Other("keyword"), 6));
        assert_eq!(evaluate(&rule, "varchar(10)"), (Token::Other("type"), 7));
        assert_eq!(rule.lookup("Select"), Some(&"keyword"));
        assert_eq!(rule.word_count(), 2);
    }

    #[test]
    fn test_unknown_word_uses_default() {
        let rule = keyword_rule(Token::Other("text"));
        assert_eq!(evaluate(&rule, "select_1 x"), (Token::Other("text"), 8));
        assert_eq!(evaluate(&rule, "t$x"), (Token::Other("text"), 3));
    }

    #[test]
    fn test_undefined_default_declines_fully() {
        let rule = keyword_rule(Token::Undefined);
        assert_eq!(evaluate(&rule, "selected"), (Token::Undefined, 0));
        assert_eq!(evaluate(&rule, "1abc"), (Token::Undefined, 0));
    }

    #[test]
    fn test_symbol_sequence_words() {
        let mut rule = WordRule::new(
            Box::new(SymbolSequenceDetector::new("$$")),
            Token::Undefined,
        );
        rule.add_word("$$", "toggle");
        assert_eq!(evaluate(&rule, "$$ begin"), (Token::Other("toggle"), 2));
        assert_eq!(evaluate(&rule, "$$$"), (Token::Undefined, 0));
        assert_eq!(evaluate(&rule, "$1"), (Token::Undefined, 0));
    }
}
