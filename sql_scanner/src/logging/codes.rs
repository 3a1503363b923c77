//! Event codes
//!
//! Every code the scanner can emit lives in [`TABLE`], grouped by the
//! area that raises it. `E`/`ERR` codes are failures, `I` codes mark a
//! completed step, and `W000`/`I000`/`D000` are the anonymous fallbacks.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Registered description, if any
    pub fn info(&self) -> Option<&'static CodeInfo> {
        lookup(self.0)
    }

    /// Unregistered codes count as recoverable
    pub fn is_recoverable(&self) -> bool {
        self.info().map_or(true, |info| info.recoverable)
    }

    pub fn category(&self) -> Category {
        self.info().map_or(Category::Unknown, |info| info.category)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    System,
    Input,
    Scanning,
    Dialect,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::System => "system",
            Category::Input => "input",
            Category::Scanning => "scanning",
            Category::Dialect => "dialect",
            Category::Unknown => "unknown",
        }
    }
}

#[derive(Debug)]
pub struct CodeInfo {
    pub code: Code,
    pub category: Category,
    pub recoverable: bool,
    pub summary: &'static str,
    pub remedy: Option<&'static str>,
}

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Reading scripts and config files from disk
pub mod input {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_CONFIG: Code = Code::new("E012");
}

/// Text buffer access and the scan loop
pub mod scanning {
    use super::Code;

    pub const BAD_LOCATION: Code = Code::new("E020");
    pub const RANGE_CLAMPED: Code = Code::new("E021");
    pub const TOO_MANY_RULES: Code = Code::new("E022");
    pub const TOKEN_LIMIT_REACHED: Code = Code::new("E023");
}

/// Dialect definitions
pub mod dialect {
    use super::Code;

    pub const INVALID_TOML: Code = Code::new("E030");
    pub const EMPTY_DELIMITER: Code = Code::new("E031");
    pub const DELIMITER_TOO_LONG: Code = Code::new("E032");
    pub const TOO_MANY_DELIMITERS: Code = Code::new("E033");
    pub const TOO_MANY_WORDS: Code = Code::new("E034");
    pub const INVALID_COMMENT_PAIR: Code = Code::new("E035");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const SCRIPT_LOADED: Code = Code::new("I006");
    pub const RULES_REFRESHED: Code = Code::new("I020");
    pub const SCAN_COMPLETE: Code = Code::new("I021");
    pub const SPLIT_COMPLETE: Code = Code::new("I022");
}

const fn fatal(code: Code, category: Category, summary: &'static str, remedy: &'static str) -> CodeInfo {
    CodeInfo {
        code,
        category,
        recoverable: false,
        summary,
        remedy: Some(remedy),
    }
}

const fn soft(code: Code, category: Category, summary: &'static str, remedy: Option<&'static str>) -> CodeInfo {
    CodeInfo {
        code,
        category,
        recoverable: true,
        summary,
        remedy,
    }
}

pub static TABLE: &[CodeInfo] = &[
    fatal(system::INTERNAL_ERROR, Category::System,
        "internal scanner error", "report the failing script"),
    fatal(system::INITIALIZATION_FAILURE, Category::System,
        "logging or configuration failed to start", "check config files and SQLSCAN_* variables"),
    fatal(input::FILE_NOT_FOUND, Category::Input,
        "script file not found", "check the path"),
    fatal(input::FILE_TOO_LARGE, Category::Input,
        "script exceeds max_script_size", "split the script or raise the limit in the build profile"),
    fatal(input::PERMISSION_DENIED, Category::Input,
        "script is not readable", "check file permissions"),
    fatal(input::INVALID_ENCODING, Category::Input,
        "script is not UTF-8", "convert the script to UTF-8"),
    fatal(input::IO_ERROR, Category::Input,
        "I/O error while reading", "retry"),
    fatal(input::INVALID_CONFIG, Category::Input,
        "runtime config file is not valid TOML", "fix the [scanner], [splitter] or [logging] tables"),
    soft(scanning::BAD_LOCATION, Category::Scanning,
        "buffer read outside the document", Some("rescan once the document is stable")),
    soft(scanning::RANGE_CLAMPED, Category::Scanning,
        "scan range clamped to the document length", None),
    soft(scanning::TOO_MANY_RULES, Category::Scanning,
        "rule list exceeds max_rules", Some("drop rules or raise the limit")),
    soft(scanning::TOKEN_LIMIT_REACHED, Category::Scanning,
        "token limit reached", Some("scan smaller ranges")),
    fatal(dialect::INVALID_TOML, Category::Dialect,
        "dialect file is not valid TOML", "fix the dialect syntax"),
    fatal(dialect::EMPTY_DELIMITER, Category::Dialect,
        "empty statement delimiter", "list at least one non-empty delimiter"),
    fatal(dialect::DELIMITER_TOO_LONG, Category::Dialect,
        "statement delimiter too long", "use a shorter delimiter"),
    fatal(dialect::TOO_MANY_DELIMITERS, Category::Dialect,
        "too many statement delimiters", "trim statement_delimiters"),
    fatal(dialect::TOO_MANY_WORDS, Category::Dialect,
        "word lists exceed max_dialect_words", "trim keyword, type or function lists"),
    fatal(dialect::INVALID_COMMENT_PAIR, Category::Dialect,
        "multi-line comment marker is empty", "give both comment markers"),
    soft(success::SYSTEM_INITIALIZATION_COMPLETED, Category::System, "logging ready", None),
    soft(success::SCRIPT_LOADED, Category::Input, "script loaded", None),
    soft(success::RULES_REFRESHED, Category::Scanning, "rules rebuilt for dialect", None),
    soft(success::SCAN_COMPLETE, Category::Scanning, "scan finished", None),
    soft(success::SPLIT_COMPLETE, Category::Scanning, "script split", None),
];

pub fn lookup(code: &str) -> Option<&'static CodeInfo> {
    TABLE.iter().find(|info| info.code.as_str() == code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let mut seen = HashSet::new();
        for info in TABLE {
            assert!(seen.insert(info.code), "duplicate code {}", info.code);
        }
    }

    #[test]
    fn test_failures_carry_a_remedy() {
        for info in TABLE.iter().filter(|info| !info.recoverable) {
            assert!(info.remedy.is_some(), "{} has no remedy", info.code);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(
            scanning::RANGE_CLAMPED.category(),
            Category::Scanning
        );
        assert!(scanning::BAD_LOCATION.is_recoverable());
        assert!(!dialect::INVALID_TOML.is_recoverable());
        assert_eq!(lookup("E031").map(|i| i.code), Some(dialect::EMPTY_DELIMITER));

        let unknown = Code::new("X999");
        assert!(unknown.info().is_none());
        assert!(unknown.is_recoverable());
        assert_eq!(unknown.category(), Category::Unknown);
    }
}
