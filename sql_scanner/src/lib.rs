//! # SQL Scanner
//!
//! Rule-based lexical scanning for SQL scripts. A [`RuleBasedScanner`] runs an
//! ordered list of [`Rule`]s over a [`TextBuffer`]; [`SqlRuleManager`] builds
//! that list from a [`SqlDialect`], and [`StatementSplitter`] uses the tokens
//! to cut a script into statements.

pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod rules;
pub mod splitter;
pub mod sql;
pub mod text;
pub mod tokens;
pub mod utils;

pub use lexical::{
    CharacterScanner, Rule, RuleBasedScanner, RuleList, ScanMetrics, ScanSession, ScannerError,
};
pub use splitter::{SqlStatement, StatementKind, StatementSplitter};
pub use sql::{DialectError, SqlDialect, SqlRuleManager, SqlTokenType};
pub use text::{BufferError, Document, TextBuffer};
pub use tokens::{ScannedToken, Token, TokenKind, TokenStream};
