//! Per-session scan counters

use crate::tokens::Token;
use std::collections::BTreeMap;

/// Counters collected while the scanner runs with metrics enabled
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanMetrics {
    pub total_tokens: usize,
    pub whitespace_tokens: usize,
    pub default_tokens: usize,
    pub eof_tokens: usize,
    pub buffer_errors: usize,
    /// Tokens produced per rule name
    pub rule_hits: BTreeMap<&'static str, usize>,
}

impl ScanMetrics {
    pub(crate) fn record_rule_hit<T>(&mut self, rule: &'static str, token: &Token<T>) {
        self.total_tokens += 1;
        if token.is_whitespace() {
            self.whitespace_tokens += 1;
        }
        *self.rule_hits.entry(rule).or_insert(0) += 1;
    }

    pub(crate) fn record_fallback<T>(&mut self, token: &Token<T>) {
        self.total_tokens += 1;
        if token.is_eof() {
            self.eof_tokens += 1;
        } else {
            self.default_tokens += 1;
        }
    }

    pub(crate) fn record_buffer_error(&mut self) {
        self.buffer_errors += 1;
    }

    /// Name of the rule that produced the most tokens
    pub fn busiest_rule(&self) -> Option<(&'static str, usize)> {
        self.rule_hits
            .iter()
            .max_by_key(|(_, hits)| **hits)
            .map(|(name, hits)| (*name, *hits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_source() {
        let mut metrics = ScanMetrics::default();
        metrics.record_rule_hit("whitespace", &Token::<()>::Whitespace);
        metrics.record_rule_hit("word", &Token::Other(()));
        metrics.record_rule_hit("word", &Token::Other(()));
        metrics.record_fallback(&Token::Other(()));
        metrics.record_fallback(&Token::<()>::Eof);

        assert_eq!(metrics.total_tokens, 5);
        assert_eq!(metrics.whitespace_tokens, 1);
        assert_eq!(metrics.default_tokens, 1);
        assert_eq!(metrics.eof_tokens, 1);
        assert_eq!(metrics.busiest_rule(), Some(("word", 2)));
    }
}
