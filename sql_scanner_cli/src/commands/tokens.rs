use super::CommandError;
use serde::Serialize;
use sql_scanner::config::runtime::ScannerPreferences;
use sql_scanner::{log_info, Document, SqlDialect, SqlRuleManager, SqlTokenType, TokenKind};
use std::fmt::Write;

#[derive(Debug, Serialize)]
struct TokenRecord {
    offset: usize,
    length: usize,
    kind: TokenKind,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    token_type: Option<SqlTokenType>,
    text: String,
}

/// Token listing, one `offset length kind type lexeme` row per token
pub fn run_tokens(
    document: &Document,
    dialect: SqlDialect,
    preferences: ScannerPreferences,
    json: bool,
) -> Result<String, CommandError> {
    let mut manager = SqlRuleManager::with_preferences(dialect, preferences)?;
    let stream = manager.tokenize(document)?;

    let records: Vec<TokenRecord> = stream
        .iter()
        .map(|scanned| TokenRecord {
            offset: scanned.offset,
            length: scanned.length,
            kind: scanned.token.kind(),
            token_type: scanned.token.data().copied(),
            text: scanned.lexeme(document).unwrap_or_default(),
        })
        .collect();

    let metrics = manager.scanner().metrics();
    log_info!("Tokenized script",
        "tokens" => metrics.total_tokens,
        "busiest_rule" => metrics.busiest_rule().map_or("none", |(name, _)| name)
    );

    if json {
        return Ok(serde_json::to_string_pretty(&records)?);
    }

    let mut output = String::new();
    for record in &records {
        let token_type = record.token_type.map_or("-", |t| t.as_str());
        // Writing to a String cannot fail
        let _ = writeln!(
            output,
            "{:>6} {:>4} {:<10} {:<17} {:?}",
            record.offset, record.length, record.kind, token_type, record.text
        );
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preferences() -> ScannerPreferences {
        ScannerPreferences {
            trace_rule_hits: false,
            collect_metrics: true,
            suppress_delimiters_in_eval: false,
        }
    }

    #[test]
    fn test_text_listing() {
        let document = Document::new("select 1;");
        let output = run_tokens(&document, SqlDialect::default(), preferences(), false).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("keyword"));
        assert!(lines[0].ends_with("\"select\""));
        assert!(lines[3].contains("delimiter"));
        assert!(lines[4].contains("eof"));
    }

    #[test]
    fn test_json_listing() {
        let document = Document::new("a ?");
        let output = run_tokens(&document, SqlDialect::default(), preferences(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let tokens = value.as_array().unwrap();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0]["type"], "text");
        assert_eq!(tokens[1]["kind"], "whitespace");
        assert!(tokens[1].get("type").is_none());
        assert_eq!(tokens[2]["type"], "parameter");
        assert_eq!(tokens[3]["kind"], "eof");
    }
}
