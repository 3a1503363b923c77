//! SQL tokenization built on the generic rule engine

pub mod dialect;
pub mod rule_manager;
pub mod token_type;

pub use dialect::{DialectError, SqlDialect};
pub use rule_manager::SqlRuleManager;
pub use token_type::SqlTokenType;
