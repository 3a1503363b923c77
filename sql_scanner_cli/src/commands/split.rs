use super::CommandError;
use sql_scanner::config::runtime::{ScannerPreferences, SplitterPreferences};
use sql_scanner::{Document, SqlDialect, SqlRuleManager, StatementKind, StatementSplitter};
use std::fmt::Write;

/// Statement listing; control commands are prefixed with `--!`
pub fn run_split(
    document: &Document,
    dialect: SqlDialect,
    scanner_preferences: ScannerPreferences,
    splitter_preferences: SplitterPreferences,
    json: bool,
) -> Result<String, CommandError> {
    let mut manager = SqlRuleManager::with_preferences(dialect, scanner_preferences)?;
    let statements =
        StatementSplitter::with_preferences(splitter_preferences).split(&mut manager, document)?;

    if json {
        return Ok(serde_json::to_string_pretty(&statements)?);
    }

    let mut output = String::new();
    for statement in &statements {
        let marker = match statement.kind {
            StatementKind::Query => "--",
            StatementKind::Control => "--!",
        };
        let _ = writeln!(output, "{} {}", marker, statement.start);
        let _ = writeln!(output, "{}", statement.text);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str, dialect: SqlDialect, keep_delimiters: bool, json: bool) -> String {
        let document = Document::new(source);
        let scanner = ScannerPreferences {
            trace_rule_hits: false,
            collect_metrics: false,
            suppress_delimiters_in_eval: false,
        };
        let splitter = SplitterPreferences {
            keep_delimiters,
            comment_only_statements: false,
        };
        run_split(&document, dialect, scanner, splitter, json).unwrap()
    }

    #[test]
    fn test_text_output() {
        let output = run("select 1;\n  select 2;", SqlDialect::default(), true, false);
        assert_eq!(output, "-- 1:1\nselect 1;\n-- 2:3\nselect 2;\n");
    }

    #[test]
    fn test_json_output_marks_control_statements() {
        let dialect = SqlDialect {
            script_delimiter_redefiner: Some("DELIMITER".to_string()),
            ..SqlDialect::default()
        };
        let output = run("DELIMITER $$\nselect 1$$", dialect, false, true);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let statements = value.as_array().unwrap();

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0]["kind"], "control");
        assert_eq!(statements[1]["kind"], "query");
        assert_eq!(statements[1]["text"], "select 1");
        assert_eq!(statements[1]["start"]["line"], 2);
    }

    #[test]
    fn test_eval_delimiter_suppression_does_not_merge_statements() {
        let document = Document::new("select 1; select 2;");
        let scanner = ScannerPreferences {
            trace_rule_hits: false,
            collect_metrics: false,
            suppress_delimiters_in_eval: true,
        };
        let output = run_split(
            &document,
            SqlDialect::default(),
            scanner,
            SplitterPreferences::default(),
            true,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }
}
