use serde::Serialize;
use std::fmt;

/// Payload of SQL `Other` tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlTokenType {
    Keyword,
    Type,
    Function,
    String,
    QuotedIdentifier,
    Number,
    Comment,
    Delimiter,
    SetDelimiter,
    Parameter,
    BlockBegin,
    BlockEnd,
    BlockToggle,
    /// Identifiers, operators and anything else unclassified
    Text,
}

impl SqlTokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlTokenType::Keyword => "keyword",
            SqlTokenType::Type => "type",
            SqlTokenType::Function => "function",
            SqlTokenType::String => "string",
            SqlTokenType::QuotedIdentifier => "quoted_identifier",
            SqlTokenType::Number => "number",
            SqlTokenType::Comment => "comment",
            SqlTokenType::Delimiter => "delimiter",
            SqlTokenType::SetDelimiter => "set_delimiter",
            SqlTokenType::Parameter => "parameter",
            SqlTokenType::BlockBegin => "block_begin",
            SqlTokenType::BlockEnd => "block_end",
            SqlTokenType::BlockToggle => "block_toggle",
            SqlTokenType::Text => "text",
        }
    }

    /// Block structure tokens the splitter tracks
    pub fn is_block_marker(&self) -> bool {
        matches!(
            self,
            SqlTokenType::BlockBegin | SqlTokenType::BlockEnd | SqlTokenType::BlockToggle
        )
    }
}

impl fmt::Display for SqlTokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_name_matches_display() {
        for token_type in [
            SqlTokenType::QuotedIdentifier,
            SqlTokenType::SetDelimiter,
            SqlTokenType::Text,
        ] {
            let json = serde_json::to_string(&token_type).unwrap();
            assert_eq!(json, format!("\"{}\"", token_type));
        }
        assert!(SqlTokenType::BlockToggle.is_block_marker());
        assert!(!SqlTokenType::Delimiter.is_block_marker());
    }
}
