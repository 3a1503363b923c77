//! Token model for rule-based scanning
//!
//! A [`Token`] is a value object: a kind (undefined, EOF, whitespace or other)
//! plus, for `Other`, the payload the producing rule attached. The scanner
//! reports where each token sits through offset/length accessors rather than
//! copying lexemes, and [`TokenStream`] collects those records for callers that
//! want the full sequence.

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenKind};
pub use token_stream::{ScannedToken, TokenStream};
