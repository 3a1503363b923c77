use super::DelimiterHandle;
use crate::lexical::{read_sequence_ignore_case, to_upper, unread_n, CharacterScanner, Rule};
use crate::tokens::Token;

/// Script command that redefines the delimiter, e.g. `DELIMITER $$`
///
/// Must start a line. The token covers the command word and the rest of the
/// line (terminator excluded). The new delimiter only takes effect in
/// evaluation mode; an empty argument restores the default delimiter.
pub struct SetDelimiterRule<T> {
    command: Vec<char>,
    payload: T,
    delimiter: DelimiterHandle,
}

impl<T> SetDelimiterRule<T> {
    pub fn new(command: &str, payload: T, delimiter: DelimiterHandle) -> Self {
        Self {
            command: command.chars().map(to_upper).collect(),
            payload,
            delimiter,
        }
    }
}

fn is_line_break(c: Option<char>) -> bool {
    matches!(c, None | Some('\r') | Some('\n'))
}

impl<T: Clone + Send> Rule<T> for SetDelimiterRule<T> {
    fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<T> {
        if !is_line_break(scanner.previous_char()) {
            return Token::Undefined;
        }
        if !read_sequence_ignore_case(scanner, &self.command) {
            return Token::Undefined;
        }

        let mut argument = String::new();
        let next = scanner.read();
        if is_line_break(next) {
            scanner.unread();
        } else if next.is_some_and(char::is_whitespace) {
            loop {
                let c = scanner.read();
                if is_line_break(c) {
                    break;
                }
                argument.extend(c);
            }
            scanner.unread();
        } else {
            unread_n(scanner, self.command.len() + 1);
            return Token::Undefined;
        }

        if scanner.is_eval_mode() {
            self.delimiter.change_delimiter(Some(argument.trim()));
        }
        Token::Other(self.payload.clone())
    }

    fn name(&self) -> &'static str {
        "set-delimiter"
    }
}
