//! Logging service and its sinks

use super::config;
use super::events::{LogEvent, LogLevel};
use std::sync::Arc;

/// Destination for events that passed the service's level filter
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

pub struct LoggingService {
    sink: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(sink: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { sink, min_level }
    }

    /// Service built from the runtime logging preferences
    pub fn from_preferences() -> Self {
        let min_level = config::get_min_log_level();
        let sink: Arc<dyn Logger> = match (
            config::use_console_logging(),
            config::use_structured_logging(),
        ) {
            (false, _) => Arc::new(NullLogger),
            (true, true) => Arc::new(StderrLogger::json()),
            (true, false) => Arc::new(StderrLogger::plain()),
        };
        Self::new(sink, min_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.sink.log(&event);
        }
    }
}

pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// Writes to stderr; stdout is reserved for token and statement listings
pub struct StderrLogger {
    json: bool,
}

impl StderrLogger {
    pub fn plain() -> Self {
        Self { json: false }
    }

    pub fn json() -> Self {
        Self { json: true }
    }
}

impl Logger for StderrLogger {
    fn log(&self, event: &LogEvent) {
        let line = if self.json {
            event.format_json().unwrap_or_else(|_| event.format())
        } else {
            event.format()
        };
        eprintln!("{}", line);
    }
}

/// Forwards events into the `log` facade under the `sql_scanner` target
#[cfg(feature = "log-bridge")]
pub struct LogCrateLogger;

#[cfg(feature = "log-bridge")]
impl Logger for LogCrateLogger {
    fn log(&self, event: &LogEvent) {
        let level = match event.level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        };
        log::log!(target: "sql_scanner", level, "{}", event.format());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes::{self, Code};
    use std::sync::{Mutex, MutexGuard};

    /// Keeps the most recent events in memory, bounded by `MEMORY_LOGGER_CAPACITY`
    #[derive(Default)]
    struct MemoryLogger {
        events: Mutex<Vec<LogEvent>>,
    }

    impl MemoryLogger {
        fn new() -> Self {
            Self::default()
        }

        fn events(&self) -> Vec<LogEvent> {
            self.lock().clone()
        }

        /// Drain everything captured so far
        fn take(&self) -> Vec<LogEvent> {
            std::mem::take(&mut *self.lock())
        }

        fn count_code(&self, code: Code) -> usize {
            self.lock().iter().filter(|e| e.code == code).count()
        }

        fn lock(&self) -> MutexGuard<'_, Vec<LogEvent>> {
            self.events
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    impl Logger for MemoryLogger {
        fn log(&self, event: &LogEvent) {
            let mut events = self.lock();
            if events.len() == crate::config::compile_time::logging::MEMORY_LOGGER_CAPACITY {
                events.remove(0);
            }
            events.push(event.clone());
        }
    }

    #[test]
    fn test_level_filter() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Info);

        service.log_event(LogEvent::debug("rule tried"));
        service.log_event(LogEvent::success(codes::success::SCAN_COMPLETE, "done"));
        service.log_event(LogEvent::error(codes::input::IO_ERROR, "read failed"));

        assert!(!service.should_log(LogLevel::Debug));
        assert_eq!(memory.count_code(codes::success::SCAN_COMPLETE), 1);
        assert_eq!(memory.count_code(codes::input::IO_ERROR), 1);
        assert_eq!(memory.take().len(), 2);
        assert!(memory.events().is_empty());
    }

    #[test]
    fn test_memory_logger_is_bounded() {
        let capacity = crate::config::compile_time::logging::MEMORY_LOGGER_CAPACITY;
        let memory = MemoryLogger::new();
        for i in 0..capacity + 5 {
            memory.log(&LogEvent::info(&format!("event {}", i)));
        }

        let events = memory.events();
        assert_eq!(events.len(), capacity);
        assert_eq!(events[0].message, "event 5");
    }
}
