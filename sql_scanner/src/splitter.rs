//! Script splitting into executable statements
//!
//! One pass over the script in evaluation mode, so `DELIMITER` commands take
//! effect as they are met. Delimiters inside `BEGIN ... END` blocks, toggle
//! blocks (`$$ ... $$`) and brackets do not end a statement.

use crate::config::compile_time::scanner::MAX_TOKENS_PER_SCAN;
use crate::config::runtime::SplitterPreferences;
use crate::lexical::ScannerError;
use crate::logging::codes;
use crate::sql::{SqlDialect, SqlRuleManager, SqlTokenType};
use crate::text::TextBuffer;
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Query,
    /// Script command handled by the client, such as `DELIMITER`
    Control,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlStatement {
    pub kind: StatementKind,
    pub text: String,
    pub offset: usize,
    pub length: usize,
    pub start: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Bracket,
    Begin,
    Toggle(String),
}

/// Per-statement parse state, reset after each statement
#[derive(Debug, Default)]
struct StatementState {
    start: usize,
    has_valuable_tokens: bool,
    has_blocks: bool,
    blocks: Vec<Block>,
    previous_type: Option<SqlTokenType>,
    last_token_line_feeds: usize,
    first_keyword: Option<String>,
    last_keyword: Option<String>,
}

impl StatementState {
    fn at(start: usize) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }

    fn record_keyword(&mut self, word: String) {
        if self.first_keyword.is_none() {
            self.first_keyword = Some(word.clone());
        }
        self.last_keyword = Some(word);
    }

    /// DDL statement closed by `END`, such as a procedure body
    fn ends_ddl_block(&self, dialect: &SqlDialect) -> bool {
        let is_ddl = self
            .first_keyword
            .as_deref()
            .is_some_and(|keyword| dialect.is_ddl_keyword(keyword));
        is_ddl
            && self
                .last_keyword
                .as_deref()
                .is_some_and(|keyword| keyword.eq_ignore_ascii_case("END"))
    }
}

pub struct StatementSplitter {
    preferences: SplitterPreferences,
    token_limit: usize,
}

impl Default for StatementSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementSplitter {
    pub fn new() -> Self {
        Self::with_preferences(SplitterPreferences::default())
    }

    pub fn with_preferences(preferences: SplitterPreferences) -> Self {
        Self {
            preferences,
            token_limit: MAX_TOKENS_PER_SCAN,
        }
    }

    pub fn keep_delimiters(mut self, keep: bool) -> Self {
        self.preferences.keep_delimiters = keep;
        self
    }

    pub fn comment_only_statements(mut self, enabled: bool) -> Self {
        self.preferences.comment_only_statements = enabled;
        self
    }

    /// Tokens allowed per split, capped at the compile-time maximum
    pub fn token_limit(mut self, limit: usize) -> Self {
        self.token_limit = limit.min(MAX_TOKENS_PER_SCAN).max(1);
        self
    }

    /// Split the whole buffer into statements
    ///
    /// The manager is left outside evaluation mode with its delimiter reset,
    /// whatever the script redefined, on success and on error. Delimiters are
    /// matched for the pass even when the manager suppresses them in
    /// evaluation mode.
    pub fn split(
        &self,
        manager: &mut SqlRuleManager,
        buffer: &dyn TextBuffer,
    ) -> Result<Vec<SqlStatement>, ScannerError> {
        if buffer.length() == 0 {
            return Ok(Vec::new());
        }

        let suppressed = manager.delimiter().suppresses_in_eval();
        manager.delimiter().set_suppress_in_eval(false);
        manager.start_eval();
        let result = self.split_range(manager, buffer);
        manager.end_eval();
        manager.delimiter().set_suppress_in_eval(suppressed);

        let statements = result?;
        log_success!(codes::success::SPLIT_COMPLETE, "Script split",
            "statements" => statements.len(),
            "characters" => buffer.length()
        );
        Ok(statements)
    }

    fn split_range(
        &self,
        manager: &mut SqlRuleManager,
        buffer: &dyn TextBuffer,
    ) -> Result<Vec<SqlStatement>, ScannerError> {
        let dialect = manager.dialect().clone();
        let mut session = manager.set_range(buffer, 0, buffer.length());
        let mut statements = Vec::new();
        let mut state = StatementState::at(0);
        let mut token_count = 0usize;

        loop {
            let token = session.next_token();
            let offset = session.token_offset();
            let length = session.token_length();

            token_count += 1;
            if token_count > self.token_limit {
                let pending =
                    Span::new(position_of(buffer, state.start), position_of(buffer, offset));
                let error = ScannerError::TokenLimitReached {
                    count: token_count - 1,
                    limit: self.token_limit,
                };
                log_error!(error.error_code(), "Token limit exceeded while splitting",
                    span = pending,
                    "limit" => self.token_limit,
                    "statements" => statements.len()
                );
                return Err(error);
            }

            let mut token_type = token.data().copied();
            let mut is_delimiter = token_type == Some(SqlTokenType::Delimiter);
            let mut is_control = false;
            let last_line_feeds = std::mem::take(&mut state.last_token_line_feeds);

            if dialect.blank_line_delimiter
                && token.is_whitespace()
                && last_line_feeds + count_line_feeds(buffer, offset, length) >= 2
            {
                is_delimiter = true;
            }

            if length == 1 {
                match buffer.char_at(offset).ok() {
                    Some('(' | '{' | '[') => state.blocks.push(Block::Bracket),
                    Some(')' | '}' | ']') => {
                        if state.blocks.last() == Some(&Block::Bracket) {
                            state.blocks.pop();
                        }
                    }
                    _ => {}
                }
            }

            // `END LOOP`, `END IF`: a begin word right after an end word closes nothing new
            let trailing_begin = token_type == Some(SqlTokenType::BlockBegin)
                && state.previous_type == Some(SqlTokenType::BlockEnd);
            if trailing_begin {
                token_type = None;
            }

            let mut inside_block = false;
            match token_type {
                Some(SqlTokenType::BlockToggle) => {
                    let pattern = buffer.text(offset, length).unwrap_or_default();
                    match state.blocks.last() {
                        Some(Block::Toggle(open)) if state.blocks.len() == 1 && *open == pattern => {
                            state.blocks.pop();
                        }
                        None => state.blocks.push(Block::Toggle(pattern)),
                        Some(_) => {
                            log_debug!("Nested block toggle ignored", "offset" => offset);
                        }
                    }
                    state.has_blocks = true;
                }
                Some(SqlTokenType::BlockBegin) => {
                    state.blocks.push(Block::Begin);
                    state.has_blocks = true;
                }
                Some(SqlTokenType::BlockEnd) => match state.blocks.last() {
                    Some(Block::Toggle(_)) => {
                        log_debug!("Block end inside toggle block ignored", "offset" => offset);
                    }
                    Some(_) => {
                        state.blocks.pop();
                    }
                    None => {}
                },
                Some(SqlTokenType::SetDelimiter) => {
                    is_delimiter = true;
                    is_control = true;
                }
                Some(SqlTokenType::Comment) => {
                    state.last_token_line_feeds = if length < 2 {
                        0
                    } else {
                        count_line_feeds(buffer, offset + length - 2, 2)
                    };
                }
                _ => {
                    inside_block = is_delimiter && !state.blocks.is_empty();
                }
            }

            let is_keyword = trailing_begin
                || matches!(
                    token_type,
                    Some(
                        SqlTokenType::Keyword
                            | SqlTokenType::BlockBegin
                            | SqlTokenType::BlockEnd
                            | SqlTokenType::BlockToggle
                    )
                );
            if is_keyword && length > 0 {
                if let Ok(word) = buffer.text(offset, length) {
                    state.record_keyword(word);
                }
            }

            if inside_block {
                state.previous_type = token_type;
                continue;
            }

            if is_control {
                if state.has_valuable_tokens {
                    statements.extend(self.statement(buffer, &state, offset, None, false));
                }
                let text = buffer.text(offset, length).unwrap_or_default();
                statements.push(SqlStatement {
                    kind: StatementKind::Control,
                    text: text.trim().to_string(),
                    offset,
                    length,
                    start: position_of(buffer, offset),
                });
                state = StatementState::at(offset + length);
                continue;
            }

            let is_eof = token.is_eof();
            if state.has_valuable_tokens && (is_eof || is_delimiter) {
                let delimiter = if token_type == Some(SqlTokenType::Delimiter) {
                    buffer.text(offset, length).ok()
                } else {
                    None
                };
                let keep_delimiter = self.preferences.keep_delimiters
                    || (state.has_blocks && dialect.delimiter_after_query)
                    || (dialect.delimiter_after_block && state.ends_ddl_block(&dialect));
                statements.extend(self.statement(
                    buffer,
                    &state,
                    offset,
                    delimiter.as_deref(),
                    keep_delimiter,
                ));
                if is_eof {
                    return Ok(statements);
                }
                state = StatementState::at(offset + length);
                continue;
            }

            if is_eof {
                return Ok(statements);
            }
            if is_delimiter {
                state.start = offset + length;
            } else if !state.has_valuable_tokens && !token.is_whitespace() {
                state.has_valuable_tokens = token_type != Some(SqlTokenType::Comment)
                    || self.preferences.comment_only_statements;
            }
            if !token.is_whitespace() {
                state.previous_type = token_type;
            }
        }
    }

    /// Statement from `state.start` up to `end`, leading whitespace trimmed
    fn statement(
        &self,
        buffer: &dyn TextBuffer,
        state: &StatementState,
        end: usize,
        delimiter: Option<&str>,
        keep_delimiter: bool,
    ) -> Option<SqlStatement> {
        let mut start = state.start;
        while start < end && buffer.char_at(start).is_ok_and(char::is_whitespace) {
            start += 1;
        }
        if start >= end {
            return None;
        }

        let mut text = buffer.text(start, end - start).ok()?;
        let mut length = end - start;
        if let Some(delimiter) = delimiter {
            if keep_delimiter && delimiter == ";" {
                text.push_str(delimiter);
                length += 1;
            }
        }

        Some(SqlStatement {
            kind: StatementKind::Query,
            text,
            offset: start,
            length,
            start: position_of(buffer, start),
        })
    }
}

fn count_line_feeds(buffer: &dyn TextBuffer, offset: usize, length: usize) -> usize {
    (offset..offset + length)
        .filter(|&i| buffer.char_at(i).ok() == Some('\n'))
        .count()
}

/// 1-based line and column of `offset`
fn position_of(buffer: &dyn TextBuffer, offset: usize) -> Position {
    let line = buffer.line_of_offset(offset).unwrap_or(0);
    let line_start = buffer.line_offset(line).unwrap_or(0);
    Position::new(
        offset,
        line as u32 + 1,
        offset.saturating_sub(line_start) as u32 + 1,
    )
}
