//! Shared location types used by the splitter and the logging system

pub mod span;

pub use span::{Position, Span};
