//! Log events

use super::codes::Code;
use crate::utils::Span;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Ordered from most to least severe; a service logs everything `<=` its level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

const ANONYMOUS_WARNING: Code = Code::new("W000");
const ANONYMOUS_INFO: Code = Code::new("I000");
const ANONYMOUS_DEBUG: Code = Code::new("D000");

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub span: Option<Span>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn build(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: clip(message),
            span: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        Self::build(LogLevel::Error, code, message)
    }

    pub fn warning(message: &str) -> Self {
        Self::build(LogLevel::Warning, ANONYMOUS_WARNING, message)
    }

    pub fn info(message: &str) -> Self {
        Self::build(LogLevel::Info, ANONYMOUS_INFO, message)
    }

    /// Info-level event tagged with a success code
    pub fn success(code: Code, message: &str) -> Self {
        Self::build(LogLevel::Info, code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::build(LogLevel::Debug, ANONYMOUS_DEBUG, message)
    }

    pub fn debug_with_code(code: Code, message: &str) -> Self {
        Self::build(LogLevel::Debug, code, message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_owned(), value.to_owned());
        self
    }

    /// `[LEVEL] CODE - message at line:col key=value ...`
    pub fn format(&self) -> String {
        let mut line = format!("[{}] {} - {}", self.level.as_str(), self.code, self.message);
        if let Some(span) = &self.span {
            let start = span.start();
            let _ = write!(line, " at {}:{}", start.line, start.column);
        }
        for (key, value) in &self.context {
            let _ = write!(line, " {}={}", key, value);
        }
        line
    }

    /// One JSON object per event; registered error codes carry their remedy
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut object = Map::new();
        object.insert("timestamp".into(), json!(self.timestamp.to_rfc3339()));
        object.insert("level".into(), json!(self.level.as_str()));
        object.insert("code".into(), json!(self.code.as_str()));
        object.insert("category".into(), json!(self.code.category().as_str()));
        object.insert("message".into(), json!(self.message));

        if self.level == LogLevel::Error {
            if let Some(info) = self.code.info() {
                object.insert(
                    "diagnosis".into(),
                    json!({
                        "summary": info.summary,
                        "recoverable": info.recoverable,
                        "remedy": info.remedy,
                    }),
                );
            }
        }

        if let Some(span) = &self.span {
            object.insert(
                "span".into(),
                json!({
                    "start": span.start().offset,
                    "end": span.end().offset,
                    "line": span.start().line,
                    "column": span.start().column,
                }),
            );
        }

        if !self.context.is_empty() {
            let context = self
                .context
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            object.insert("context".into(), Value::Object(context));
        }

        serde_json::to_string(&Value::Object(object))
    }
}

/// Cut to `MAX_LOG_MESSAGE_LENGTH` bytes on a char boundary, marking the cut with `...`
fn clip(message: &str) -> String {
    let limit = crate::config::compile_time::logging::MAX_LOG_MESSAGE_LENGTH;
    if message.len() <= limit {
        return message.to_owned();
    }
    let cut = (0..=limit)
        .rev()
        .find(|&i| message.is_char_boundary(i))
        .unwrap_or(0);
    format!("{}...", &message[..cut])
}
