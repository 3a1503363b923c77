//! Builds the SQL rule list from a dialect and owns the scanner running it

use super::{DialectError, SqlDialect, SqlTokenType};
use crate::config::runtime::ScannerPreferences;
use crate::lexical::{RuleBasedScanner, RuleList, ScanSession, ScannerError};
use crate::logging::codes;
use crate::rules::{
    DelimiterHandle, DelimiterRule, EndOfLineRule, MultiLineRule, NumberRule, ParameterRule,
    SetDelimiterRule, SqlWordDetector, SymbolSequenceDetector, WhitespaceRule, WordDetector,
    WordRule,
};
use crate::text::TextBuffer;
use crate::tokens::{Token, TokenStream};
use crate::{log_debug, log_success};

/// Prefix marking a line comment that only counts at the start of a line
const LINE_START_MARKER: char = '^';

/// SQL tokenizer: dialect-driven rules on top of [`RuleBasedScanner`]
pub struct SqlRuleManager {
    scanner: RuleBasedScanner<SqlTokenType>,
    dialect: SqlDialect,
    delimiter: DelimiterHandle,
    preferences: ScannerPreferences,
}

impl SqlRuleManager {
    pub fn new(dialect: SqlDialect) -> Result<Self, DialectError> {
        Self::with_preferences(dialect, ScannerPreferences::default())
    }

    pub fn with_preferences(
        dialect: SqlDialect,
        preferences: ScannerPreferences,
    ) -> Result<Self, DialectError> {
        let default_token = Token::Other(SqlTokenType::Text);
        let scanner = RuleBasedScanner::with_preferences(default_token, preferences.clone());
        let (rules, delimiter) = build_rules(&dialect, &preferences)?;

        let mut manager = Self {
            scanner,
            dialect,
            delimiter,
            preferences,
        };
        manager.install(rules)?;
        Ok(manager)
    }

    /// Rebuild every rule from `dialect`
    ///
    /// The active delimiter returns to the dialect's defaults. The evaluation
    /// flag is kept.
    pub fn refresh_rules(&mut self, dialect: SqlDialect) -> Result<(), DialectError> {
        let (rules, delimiter) = build_rules(&dialect, &self.preferences)?;
        self.dialect = dialect;
        self.delimiter = delimiter;
        self.install(rules)
    }

    fn install(&mut self, rules: RuleList<SqlTokenType>) -> Result<(), DialectError> {
        let count = rules.len();
        self.scanner.set_rules(rules)?;
        log_success!(codes::success::RULES_REFRESHED, "SQL rules refreshed",
            "dialect" => self.dialect.name,
            "rules" => count,
            "delimiters" => self.dialect.statement_delimiters.join(" ")
        );
        Ok(())
    }

    pub fn dialect(&self) -> &SqlDialect {
        &self.dialect
    }

    /// Handle onto the live delimiter configuration
    pub fn delimiter(&self) -> &DelimiterHandle {
        &self.delimiter
    }

    /// Replace the active delimiter; `None` or `""` restores the dialect's
    pub fn change_delimiter(&self, delimiter: Option<&str>) {
        self.delimiter.change_delimiter(delimiter);
    }

    pub fn scanner(&self) -> &RuleBasedScanner<SqlTokenType> {
        &self.scanner
    }

    pub fn scanner_mut(&mut self) -> &mut RuleBasedScanner<SqlTokenType> {
        &mut self.scanner
    }

    /// Start a scan session over part of `buffer`
    pub fn set_range<'s>(
        &'s mut self,
        buffer: &'s dyn TextBuffer,
        offset: usize,
        length: usize,
    ) -> ScanSession<'s, SqlTokenType> {
        self.scanner.set_range(buffer, offset, length)
    }

    pub fn start_eval(&mut self) {
        self.scanner.start_eval();
    }

    /// Leave evaluation mode; any delimiter set by the script is discarded
    pub fn end_eval(&mut self) {
        self.scanner.end_eval();
    }

    pub fn is_eval_mode(&self) -> bool {
        self.scanner.is_eval_mode()
    }

    /// Tokenize the whole buffer
    pub fn tokenize(
        &mut self,
        buffer: &dyn TextBuffer,
    ) -> Result<TokenStream<SqlTokenType>, ScannerError> {
        self.scanner
            .set_range(buffer, 0, buffer.length())
            .scan_to_end()
    }
}

fn build_rules(
    dialect: &SqlDialect,
    preferences: &ScannerPreferences,
) -> Result<(RuleList<SqlTokenType>, DelimiterHandle), DialectError> {
    dialect.validate()?;

    let mut rules: RuleList<SqlTokenType> = Vec::new();

    for prefix in &dialect.single_line_comments {
        let rule = match prefix.strip_prefix(LINE_START_MARKER) {
            Some(stripped) => EndOfLineRule::new(stripped, SqlTokenType::Comment).at_line_start(),
            None => EndOfLineRule::new(prefix, SqlTokenType::Comment),
        };
        rules.push(Box::new(rule));
    }

    let quoted = |quote: &str, token_type: SqlTokenType| {
        let rule = MultiLineRule::single_line(quote, quote, token_type);
        match dialect.escape_char {
            Some(escape) => rule.with_escape(escape),
            None => rule,
        }
    };
    let quote_symbol = dialect.quote_symbol.as_deref().filter(|q| !q.is_empty());
    if let Some(quote) = quote_symbol {
        rules.push(Box::new(quoted(quote, SqlTokenType::QuotedIdentifier)));
    }
    if quote_symbol != Some("'") {
        let string = MultiLineRule::new("'", "'", SqlTokenType::String);
        let string = match dialect.escape_char {
            Some(escape) => string.with_escape(escape),
            None => string,
        };
        rules.push(Box::new(string));
    }
    if quote_symbol != Some("\"") {
        rules.push(Box::new(quoted("\"", SqlTokenType::QuotedIdentifier)));
    }

    if let Some((begin, end)) = &dialect.multi_line_comment {
        rules.push(Box::new(
            MultiLineRule::new(begin, end, SqlTokenType::Comment).breaks_on_eof(),
        ));
    }

    rules.push(Box::new(WhitespaceRule));
    rules.push(Box::new(NumberRule::new(SqlTokenType::Number)));

    let delimiter_rule =
        DelimiterRule::new(&dialect.statement_delimiters, SqlTokenType::Delimiter)
            .suppress_in_eval(preferences.suppress_delimiters_in_eval);
    let delimiter = delimiter_rule.handle();
    rules.push(Box::new(delimiter_rule));

    if let Some(redefiner) = dialect
        .script_delimiter_redefiner
        .as_deref()
        .filter(|r| !r.is_empty())
    {
        rules.push(Box::new(SetDelimiterRule::new(
            redefiner,
            SqlTokenType::SetDelimiter,
            delimiter.clone(),
        )));
    }

    // Later registrations win, so block markers override reserved words
    let mut words = WordRule::new(Box::new(SqlWordDetector), Token::Other(SqlTokenType::Text));
    let vocabulary = [
        (&dialect.reserved_words, SqlTokenType::Keyword),
        (&dialect.functions, SqlTokenType::Function),
        (&dialect.data_types, SqlTokenType::Type),
        (&dialect.block_begin_words, SqlTokenType::BlockBegin),
        (&dialect.block_end_words, SqlTokenType::BlockEnd),
    ];
    for (list, token_type) in vocabulary {
        for word in list {
            words.add_word(word, token_type);
        }
    }
    log_debug!("Word table built", "words" => words.word_count());
    rules.push(Box::new(words));

    if let Some(toggle) = dialect.block_toggle.as_deref().filter(|t| !t.is_empty()) {
        let starts_word = toggle.chars().next().is_some_and(char::is_alphanumeric);
        let detector: Box<dyn WordDetector> = if starts_word {
            Box::new(SqlWordDetector)
        } else {
            Box::new(SymbolSequenceDetector::new(toggle))
        };
        let mut toggle_rule = WordRule::new(detector, Token::Undefined);
        toggle_rule.add_word(toggle, SqlTokenType::BlockToggle);
        rules.push(Box::new(toggle_rule));
    }

    if dialect.anonymous_parameters_enabled || dialect.named_parameters_enabled {
        rules.push(Box::new(
            ParameterRule::new(SqlTokenType::Parameter)
                .with_marks(
                    dialect.anonymous_parameter_mark,
                    dialect.named_parameter_prefix,
                )
                .anonymous_enabled(dialect.anonymous_parameters_enabled)
                .named_enabled(dialect.named_parameters_enabled),
        ));
    }

    Ok((rules, delimiter))
}
