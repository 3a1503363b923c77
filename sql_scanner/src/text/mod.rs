//! Host text buffer contract and the in-crate document implementation
//!
//! The scanner never owns script text. It borrows a `TextBuffer` for the
//! duration of a scan session and addresses it by character offset.

pub mod document;

pub use document::Document;

use crate::logging::codes;

/// Errors raised by text buffer access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Bad location: offset {offset}, length {length}")]
    BadLocation { offset: usize, length: usize },
}

impl BufferError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            BufferError::BadLocation { .. } => codes::scanning::BAD_LOCATION,
        }
    }
}

/// Random-access character buffer the scanner reads from
pub trait TextBuffer {
    /// Number of characters in the buffer
    fn length(&self) -> usize;

    /// Character at `offset`
    fn char_at(&self, offset: usize) -> Result<char, BufferError>;

    /// Line ending sequences this buffer recognizes
    fn legal_line_delimiters(&self) -> &[String];

    /// 0-based line containing `offset`; `offset == length()` is valid
    fn line_of_offset(&self, offset: usize) -> Result<usize, BufferError>;

    /// Offset of the first character of a 0-based line
    fn line_offset(&self, line: usize) -> Result<usize, BufferError>;

    /// Copy out `length` characters starting at `offset`
    fn text(&self, offset: usize, length: usize) -> Result<String, BufferError> {
        let end = offset
            .checked_add(length)
            .filter(|end| *end <= self.length())
            .ok_or(BufferError::BadLocation { offset, length })?;
        (offset..end).map(|i| self.char_at(i)).collect()
    }
}
