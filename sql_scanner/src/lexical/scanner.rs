//! Rule-based scanner: first-match rule dispatch, eval mode, scan sessions
//!
//! The scanner owns its rules and configuration. A buffer is only borrowed
//! by a [`ScanSession`], so the text can be edited between sessions and
//! re-scanned by the same scanner.

use super::{CharacterScanner, RuleList, ScanMetrics, ScannerError};
use crate::config::compile_time::scanner::*;
use crate::config::runtime::ScannerPreferences;
use crate::logging::codes;
use crate::text::TextBuffer;
use crate::tokens::{ScannedToken, Token, TokenStream};
use crate::{log_debug, log_error, log_success};

/// Cursor over the bound range of one session
///
/// Kept apart from the scanner so a rule can take `&mut` of it while the
/// session iterates the scanner's rules.
struct ScanCursor<'s> {
    buffer: &'s dyn TextBuffer,
    line_delimiters: &'s [String],
    offset: usize,
    range_end: usize,
    column: Option<usize>,
    eval_mode: bool,
    buffer_errors: usize,
}

impl CharacterScanner for ScanCursor<'_> {
    fn read(&mut self) -> Option<char> {
        let offset = self.offset;
        self.offset += 1;
        self.column = None;

        if offset >= self.range_end {
            return None;
        }
        match self.buffer.char_at(offset) {
            Ok(c) => Some(c),
            Err(e) => {
                self.buffer_errors += 1;
                log_debug!("Buffer access failed, treating as end of range",
                    code = e.error_code(),
                    "offset" => offset,
                    "error" => e
                );
                None
            }
        }
    }

    fn unread(&mut self) {
        debug_assert!(self.offset > 0, "unread without a matching read");
        self.offset = self.offset.saturating_sub(1);
        self.column = None;
    }

    fn column(&mut self) -> Option<usize> {
        if self.column.is_none() {
            let line = self.buffer.line_of_offset(self.offset).ok()?;
            let line_start = self.buffer.line_offset(line).ok()?;
            self.column = self.offset.checked_sub(line_start);
        }
        self.column
    }

    fn legal_line_delimiters(&self) -> &[String] {
        self.line_delimiters
    }

    fn previous_char(&self) -> Option<char> {
        let previous = self.offset.checked_sub(1)?;
        self.buffer.char_at(previous).ok()
    }

    fn is_eval_mode(&self) -> bool {
        self.eval_mode
    }
}

/// Ordered-rule scanner
///
/// Rule order is priority order. Rules, the default token, the evaluation
/// flag and metrics persist across sessions; see [`set_range`](Self::set_range).
pub struct RuleBasedScanner<T> {
    rules: RuleList<T>,
    default_token: Token<T>,
    eval_mode: bool,
    preferences: ScannerPreferences,
    metrics: ScanMetrics,
}

impl<T: Clone> RuleBasedScanner<T> {
    /// Scanner with no rules; unmatched characters come back as `default_token`
    pub fn new(default_token: Token<T>) -> Self {
        Self::with_preferences(default_token, ScannerPreferences::default())
    }

    pub fn with_preferences(default_token: Token<T>, preferences: ScannerPreferences) -> Self {
        Self {
            rules: Vec::new(),
            default_token,
            eval_mode: false,
            preferences,
            metrics: ScanMetrics::default(),
        }
    }

    /// Replace the rule list (priority = list order)
    pub fn set_rules(&mut self, rules: RuleList<T>) -> Result<(), ScannerError> {
        if rules.len() > MAX_RULES {
            let error = ScannerError::TooManyRules { count: rules.len() };
            log_error!(error.error_code(), "Rule list exceeds configured maximum",
                "count" => rules.len(),
                "limit" => MAX_RULES
            );
            return Err(error);
        }
        self.rules = rules;
        Ok(())
    }

    pub fn set_default_token(&mut self, token: Token<T>) {
        self.default_token = token;
    }

    pub fn default_token(&self) -> &Token<T> {
        &self.default_token
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Start a scan session over `length` characters of `buffer` from `offset`
    ///
    /// The range end is clamped to the buffer's current length. The buffer
    /// stays borrowed until the returned session is dropped.
    pub fn set_range<'s>(
        &'s mut self,
        buffer: &'s dyn TextBuffer,
        offset: usize,
        length: usize,
    ) -> ScanSession<'s, T> {
        let document_length = buffer.length();
        debug_assert!(
            offset <= document_length,
            "scan range starts past the end of the buffer"
        );

        let requested_end = offset.saturating_add(length);
        let range_end = requested_end.min(document_length);
        if range_end < requested_end {
            log_debug!("Scan range clamped to buffer length",
                code = codes::scanning::RANGE_CLAMPED,
                "requested_end" => requested_end,
                "document_length" => document_length
            );
        }

        let start = offset.min(range_end);
        let cursor = ScanCursor {
            buffer,
            line_delimiters: buffer.legal_line_delimiters(),
            offset: start,
            range_end,
            column: None,
            eval_mode: self.eval_mode,
            buffer_errors: 0,
        };
        self.metrics = ScanMetrics::default();

        ScanSession {
            scanner: self,
            cursor,
            token_offset: start,
        }
    }

    /// Enter evaluation mode
    pub fn start_eval(&mut self) {
        self.eval_mode = true;
        log_debug!("Evaluation mode started", "rules" => self.rules.len());
    }

    /// Leave evaluation mode and reset every stateful rule
    pub fn end_eval(&mut self) {
        self.eval_mode = false;
        for rule in &self.rules {
            rule.reset();
        }
        log_debug!("Evaluation mode ended, rules reset", "rules" => self.rules.len());
    }

    pub fn is_eval_mode(&self) -> bool {
        self.eval_mode
    }

    /// Metrics of the latest session
    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }
}

/// One pass of a [`RuleBasedScanner`] over a bound buffer range
pub struct ScanSession<'s, T> {
    scanner: &'s mut RuleBasedScanner<T>,
    cursor: ScanCursor<'s>,
    token_offset: usize,
}

impl<T: Clone> ScanSession<'_, T> {
    /// Recognize the next token at the cursor
    pub fn next_token(&mut self) -> Token<T> {
        self.token_offset = self.cursor.offset;
        self.cursor.column = None;

        let mut matched = None;
        for rule in &self.scanner.rules {
            let token = rule.evaluate(&mut self.cursor);
            if !token.is_undefined() {
                matched = Some((rule.name(), token));
                break;
            }
            debug_assert_eq!(
                self.cursor.offset,
                self.token_offset,
                "rule '{}' consumed input while declining",
                rule.name()
            );
        }

        let preferences = &self.scanner.preferences;
        let token = match matched {
            Some((name, token)) => {
                if preferences.trace_rule_hits {
                    log_debug!("Rule matched",
                        "rule" => name,
                        "offset" => self.token_offset,
                        "length" => self.token_length()
                    );
                }
                if preferences.collect_metrics {
                    self.scanner.metrics.record_rule_hit(name, &token);
                }
                token
            }
            None => {
                let token = match self.cursor.read() {
                    Some(_) => self.scanner.default_token.clone(),
                    None => {
                        // Stay put so EOF repeats without drifting
                        self.cursor.unread();
                        Token::Eof
                    }
                };
                if preferences.collect_metrics {
                    self.scanner.metrics.record_fallback(&token);
                }
                token
            }
        };

        for _ in 0..std::mem::take(&mut self.cursor.buffer_errors) {
            self.scanner.metrics.record_buffer_error();
        }

        token
    }

    /// Offset of the most recently returned token
    pub fn token_offset(&self) -> usize {
        self.token_offset
    }

    /// Length of the most recently returned token
    pub fn token_length(&self) -> usize {
        self.cursor
            .offset
            .min(self.cursor.range_end)
            .saturating_sub(self.token_offset)
    }

    /// Current cursor offset
    pub fn offset(&self) -> usize {
        self.cursor.offset
    }

    pub fn range_end(&self) -> usize {
        self.cursor.range_end
    }

    /// 0-based column of the cursor
    pub fn column(&mut self) -> Option<usize> {
        self.cursor.column()
    }

    pub fn is_eval_mode(&self) -> bool {
        self.cursor.eval_mode
    }

    pub fn metrics(&self) -> &ScanMetrics {
        &self.scanner.metrics
    }

    /// Scan the bound range to EOF, collecting every token
    pub fn scan_to_end(&mut self) -> Result<TokenStream<T>, ScannerError> {
        let mut stream = TokenStream::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            stream.push(ScannedToken::new(
                token,
                self.token_offset(),
                self.token_length(),
            ));
            if done {
                break;
            }
            if stream.len() >= MAX_TOKENS_PER_SCAN {
                let error = ScannerError::TokenLimitReached {
                    count: stream.len(),
                    limit: MAX_TOKENS_PER_SCAN,
                };
                log_error!(error.error_code(), "Token limit exceeded",
                    "token_count" => stream.len(),
                    "limit" => MAX_TOKENS_PER_SCAN,
                    "offset" => self.offset()
                );
                return Err(error);
            }
        }

        log_success!(codes::success::SCAN_COMPLETE, "Scan complete",
            "tokens" => stream.len(),
            "characters" => stream.covered_length()
        );
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::{read_sequence_ignore_case, unread_n, Rule};
    use crate::text::{BufferError, Document};
    use assert_matches::assert_matches;

    /// Matches one fixed upper-case word
    struct FixedWordRule {
        word: Vec<char>,
        payload: &'static str,
    }

    impl FixedWordRule {
        fn new(word: &str, payload: &'static str) -> Self {
            Self {
                word: word.chars().collect(),
                payload,
            }
        }
    }

    impl Rule<&'static str> for FixedWordRule {
        fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<&'static str> {
            if read_sequence_ignore_case(scanner, &self.word) {
                Token::Other(self.payload)
            } else {
                Token::Undefined
            }
        }

        fn name(&self) -> &'static str {
            "fixed-word"
        }
    }

    /// Any run of alphanumerics
    struct IdentifierRule;

    impl Rule<&'static str> for IdentifierRule {
        fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<&'static str> {
            let mut count = 0;
            while scanner.read().is_some_and(|c| c.is_alphanumeric()) {
                count += 1;
            }
            scanner.unread();
            if count == 0 {
                return Token::Undefined;
            }
            Token::Other("identifier")
        }

        fn name(&self) -> &'static str {
            "identifier"
        }
    }

    /// Reads two characters then always declines
    struct PeekingRule;

    impl Rule<&'static str> for PeekingRule {
        fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<&'static str> {
            scanner.read();
            scanner.read();
            unread_n(scanner, 2);
            Token::Undefined
        }

        fn name(&self) -> &'static str {
            "peeking"
        }
    }

    /// Reports whether the cursor is in evaluation mode
    struct EvalFlagRule;

    impl Rule<&'static str> for EvalFlagRule {
        fn evaluate(&self, scanner: &mut dyn CharacterScanner) -> Token<&'static str> {
            match scanner.read() {
                Some(_) if scanner.is_eval_mode() => Token::Other("eval"),
                Some(_) => Token::Other("plain"),
                None => {
                    scanner.unread();
                    Token::Undefined
                }
            }
        }

        fn name(&self) -> &'static str {
            "eval-flag"
        }
    }

    fn scanner_with(rules: RuleList<&'static str>) -> RuleBasedScanner<&'static str> {
        let mut scanner = RuleBasedScanner::new(Token::Other("text"));
        scanner.set_rules(rules).unwrap();
        scanner
    }

    fn collect(
        mut session: ScanSession<'_, &'static str>,
        doc: &Document,
    ) -> Vec<(Token<&'static str>, String)> {
        session
            .scan_to_end()
            .unwrap()
            .into_iter()
            .map(|t| {
                let lexeme = t.lexeme(doc).unwrap();
                (t.token, lexeme)
            })
            .collect()
    }

    #[test]
    fn test_first_registered_rule_wins() {
        let doc = Document::new("SELECT");
        let mut scanner = RuleBasedScanner::new(Token::Other("text"));
        scanner
            .set_rules(vec![
                Box::new(FixedWordRule::new("SELECT", "keyword")),
                Box::new(IdentifierRule),
            ])
            .unwrap();
        let mut session = scanner.set_range(&doc, 0, doc.length());
        assert_eq!(session.next_token(), Token::Other("keyword"));
        assert_eq!(session.token_length(), 6);

        let mut reversed = scanner_with(vec![
            Box::new(IdentifierRule),
            Box::new(FixedWordRule::new("SELECT", "keyword")),
        ]);
        let mut session = reversed.set_range(&doc, 0, doc.length());
        assert_eq!(session.next_token(), Token::Other("identifier"));
    }

    #[test]
    fn test_fallback_consumes_one_character() {
        let doc = Document::new("a+b");
        let mut scanner = scanner_with(vec![Box::new(IdentifierRule)]);

        let tokens = collect(scanner.set_range(&doc, 0, doc.length()), &doc);
        assert_eq!(
            tokens,
            vec![
                (Token::Other("identifier"), "a".to_string()),
                (Token::Other("text"), "+".to_string()),
                (Token::Other("identifier"), "b".to_string()),
                (Token::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_eof_is_stable() {
        let doc = Document::new("x");
        let mut scanner = scanner_with(vec![Box::new(PeekingRule)]);
        let mut session = scanner.set_range(&doc, 0, 1);

        assert_eq!(session.next_token(), Token::Other("text"));
        for _ in 0..3 {
            assert_eq!(session.next_token(), Token::Eof);
            assert_eq!(session.token_offset(), 1);
            assert_eq!(session.token_length(), 0);
            assert_eq!(session.offset(), 1);
        }
    }

    #[test]
    fn test_repeated_scans_are_identical() {
        let doc = Document::new("select a+b from t");
        let mut scanner = scanner_with(vec![
            Box::new(FixedWordRule::new("SELECT", "keyword")),
            Box::new(IdentifierRule),
        ]);

        let first = collect(scanner.set_range(&doc, 0, doc.length()), &doc);
        let second = collect(scanner.set_range(&doc, 0, doc.length()), &doc);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tokens_cover_range_exactly() {
        let doc = Document::new("-- intro\nselect x, y from t;");
        let mut scanner = scanner_with(vec![
            Box::new(PeekingRule),
            Box::new(FixedWordRule::new("SELECT", "keyword")),
            Box::new(IdentifierRule),
        ]);

        let text: String = collect(scanner.set_range(&doc, 3, 14), &doc)
            .into_iter()
            .map(|(_, lexeme)| lexeme)
            .collect();
        assert_eq!(text, doc.text(3, 14).unwrap());
    }

    #[test]
    fn test_range_is_clamped_to_document_end() {
        let doc = Document::new("abc");
        let mut scanner = scanner_with(vec![]);
        let session = scanner.set_range(&doc, 1, 100);
        assert_eq!(session.range_end(), 3);

        let tokens = collect(session, &doc);
        let text: String = tokens.iter().map(|(_, l)| l.as_str()).collect();
        // The final character must not be dropped at the boundary
        assert_eq!(text, "bc");
        assert_eq!(tokens.last().map(|(t, _)| *t), Some(Token::Eof));
    }

    #[test]
    fn test_range_ending_exactly_at_document_end() {
        let doc = Document::new("abc");
        let mut scanner = scanner_with(vec![Box::new(IdentifierRule)]);
        let mut session = scanner.set_range(&doc, 0, 3);
        assert_eq!(session.next_token(), Token::Other("identifier"));
        assert_eq!(session.token_length(), 3);
    }

    #[test]
    fn test_shrunken_buffer_after_measuring() {
        let mut doc = Document::new("select 1;\nselect 2;");
        let length = doc.length();
        doc.replace(10, 9, "").unwrap();

        let mut scanner = scanner_with(vec![Box::new(IdentifierRule)]);
        let tokens = collect(scanner.set_range(&doc, 0, length), &doc);
        let text: String = tokens.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(text, "select 1;\n");
    }

    #[test]
    fn test_buffer_edited_between_sessions() {
        let mut doc = Document::new("abc");
        let mut scanner = scanner_with(vec![
            Box::new(FixedWordRule::new("SELECT", "keyword")),
            Box::new(IdentifierRule),
        ]);

        let before = collect(scanner.set_range(&doc, 0, doc.length()), &doc);
        assert_eq!(before[0], (Token::Other("identifier"), "abc".to_string()));

        doc.replace(0, 0, "select ").unwrap();
        let after = collect(scanner.set_range(&doc, 0, doc.length()), &doc);
        assert_eq!(
            after,
            vec![
                (Token::Other("keyword"), "select".to_string()),
                (Token::Other("text"), " ".to_string()),
                (Token::Other("identifier"), "abc".to_string()),
                (Token::Eof, String::new()),
            ]
        );
        assert_eq!(scanner.rule_count(), 2);
    }

    #[test]
    fn test_empty_range_returns_eof() {
        let doc = Document::new("abc");
        let mut scanner = scanner_with(vec![Box::new(IdentifierRule)]);
        let mut session = scanner.set_range(&doc, 3, 0);
        assert_eq!(session.next_token(), Token::Eof);
        assert_eq!(session.token_offset(), 3);
    }

    #[test]
    fn test_column_tracks_line_position() {
        let doc = Document::new("ab\r\ncd");
        let mut scanner = scanner_with(vec![]);
        let mut session = scanner.set_range(&doc, 0, doc.length());
        assert_eq!(session.column(), Some(0));
        for _ in 0..5 {
            session.next_token();
        }
        assert_eq!(session.offset(), 5);
        assert_eq!(session.column(), Some(1));
    }

    #[test]
    fn test_buffer_errors_degrade_to_eof() {
        struct FlakyBuffer {
            delimiters: Vec<String>,
        }

        impl TextBuffer for FlakyBuffer {
            fn length(&self) -> usize {
                4
            }
            fn char_at(&self, offset: usize) -> Result<char, BufferError> {
                if offset < 2 {
                    Ok('z')
                } else {
                    Err(BufferError::BadLocation { offset, length: 1 })
                }
            }
            fn legal_line_delimiters(&self) -> &[String] {
                &self.delimiters
            }
            fn line_of_offset(&self, _offset: usize) -> Result<usize, BufferError> {
                Ok(0)
            }
            fn line_offset(&self, _line: usize) -> Result<usize, BufferError> {
                Ok(0)
            }
        }

        let buffer = FlakyBuffer {
            delimiters: vec!["\n".to_string()],
        };
        let mut scanner = scanner_with(vec![Box::new(IdentifierRule)]);
        let mut session = scanner.set_range(&buffer, 0, 4);

        assert_eq!(session.next_token(), Token::Other("identifier"));
        assert_eq!(session.token_length(), 2);
        assert_eq!(session.next_token(), Token::Eof);
        assert!(session.metrics().buffer_errors > 0);
    }

    #[test]
    fn test_rule_limit_enforced() {
        let mut scanner: RuleBasedScanner<&'static str> =
            RuleBasedScanner::new(Token::Other("text"));
        let rules: RuleList<&'static str> = (0..=MAX_RULES)
            .map(|_| Box::new(IdentifierRule) as Box<dyn Rule<&'static str>>)
            .collect();
        assert_matches!(
            scanner.set_rules(rules),
            Err(ScannerError::TooManyRules { .. })
        );
    }

    #[test]
    fn test_eval_mode_reaches_rules_across_sessions() {
        let doc = Document::new("x");
        let mut scanner = scanner_with(vec![Box::new(EvalFlagRule)]);

        scanner.start_eval();
        let mut session = scanner.set_range(&doc, 0, 1);
        assert!(session.is_eval_mode());
        assert_eq!(session.next_token(), Token::Other("eval"));

        scanner.end_eval();
        assert!(!scanner.is_eval_mode());
        let mut session = scanner.set_range(&doc, 0, 1);
        assert_eq!(session.next_token(), Token::Other("plain"));
    }

    #[test]
    fn test_metrics_count_rules_and_fallbacks() {
        let doc = Document::new("ab+");
        let preferences = ScannerPreferences {
            trace_rule_hits: true,
            collect_metrics: true,
            suppress_delimiters_in_eval: false,
        };
        let mut scanner = RuleBasedScanner::with_preferences(Token::Other("text"), preferences);
        scanner.set_rules(vec![Box::new(IdentifierRule)]).unwrap();
        scanner
            .set_range(&doc, 0, doc.length())
            .scan_to_end()
            .unwrap();

        let metrics = scanner.metrics();
        assert_eq!(metrics.rule_hits.get("identifier"), Some(&1));
        assert_eq!(metrics.default_tokens, 1);
        assert_eq!(metrics.eof_tokens, 1);
    }
}
