//! In-memory editable document

use super::{BufferError, TextBuffer};
use crate::utils::Position;

const DEFAULT_LINE_DELIMITERS: [&str; 3] = ["\r\n", "\n", "\r"];

/// Editable text buffer with a line table
///
/// Characters are stored individually so offsets reported by the scanner
/// index directly into the document.
#[derive(Debug, Clone)]
pub struct Document {
    chars: Vec<char>,
    line_starts: Vec<usize>,
    line_delimiters: Vec<String>,
}

impl Document {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let line_starts = compute_line_starts(&chars);
        Self {
            chars,
            line_starts,
            line_delimiters: DEFAULT_LINE_DELIMITERS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }

    /// Full document text
    pub fn get(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn number_of_lines(&self) -> usize {
        self.line_starts.len()
    }

    /// Replace `length` characters at `offset` with `text`
    pub fn replace(&mut self, offset: usize, length: usize, text: &str) -> Result<(), BufferError> {
        let end = offset
            .checked_add(length)
            .filter(|end| *end <= self.chars.len())
            .ok_or(BufferError::BadLocation { offset, length })?;

        self.chars.splice(offset..end, text.chars());
        self.line_starts = compute_line_starts(&self.chars);
        Ok(())
    }

    /// 1-based line/column position of a character offset
    pub fn position_at(&self, offset: usize) -> Result<Position, BufferError> {
        let line = self.line_of_offset(offset)?;
        let column = offset - self.line_starts[line];
        Ok(Position::new(offset, line as u32 + 1, column as u32 + 1))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl TextBuffer for Document {
    fn length(&self) -> usize {
        self.chars.len()
    }

    fn char_at(&self, offset: usize) -> Result<char, BufferError> {
        self.chars
            .get(offset)
            .copied()
            .ok_or(BufferError::BadLocation { offset, length: 1 })
    }

    fn legal_line_delimiters(&self) -> &[String] {
        &self.line_delimiters
    }

    fn line_of_offset(&self, offset: usize) -> Result<usize, BufferError> {
        if offset > self.chars.len() {
            return Err(BufferError::BadLocation { offset, length: 0 });
        }
        Ok(match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert_at) => insert_at - 1,
        })
    }

    fn line_offset(&self, line: usize) -> Result<usize, BufferError> {
        self.line_starts
            .get(line)
            .copied()
            .ok_or(BufferError::BadLocation {
                offset: line,
                length: 0,
            })
    }
}

fn compute_line_starts(chars: &[char]) -> Vec<usize> {
    let mut starts = vec![0];
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\r' if chars.get(i + 1) == Some(&'\n') => {
                i += 2;
                starts.push(i);
                continue;
            }
            '\r' | '\n' => starts.push(i + 1),
            _ => {}
        }
        i += 1;
    }
    starts
}
