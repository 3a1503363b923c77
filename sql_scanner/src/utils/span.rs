//! Locations in a scanned script
//!
//! Offsets count characters, the same unit `token_offset()` reports.
//! Line and column are 1-based; 0 means "not computed".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self { offset, line, column }
    }

    /// Offset only, line and column unknown
    pub fn at_offset(offset: usize) -> Self {
        Self::new(offset, 0, 0)
    }

    pub fn has_line_info(&self) -> bool {
        self.line != 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_line_info() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "@{}", self.offset)
        }
    }
}

/// Half-open `[start, end)` stretch of script text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start.offset <= end.offset, "span ends before it starts");
        Self { start, end }
    }

    pub fn from_offsets(start: usize, end: usize) -> Self {
        Self::new(Position::at_offset(start), Position::at_offset(end))
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start.has_line_info(), self.start.line == self.end.line) {
            (true, true) => write!(f, "{}-{}", self.start, self.end.column),
            (true, false) => write!(f, "{}-{}", self.start, self.end),
            (false, _) => write!(f, "{}..{}", self.start.offset, self.end.offset),
        }
    }
}
