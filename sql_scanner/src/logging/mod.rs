//! Process-wide logging for the scanner
//!
//! One [`LoggingService`] is installed per process; the `log_*!` macros are
//! no-ops until then. The script currently being processed is tracked per
//! thread and stamped onto every event as `file=...`.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
#[cfg(feature = "log-bridge")]
pub use service::LogCrateLogger;
pub use service::{Logger, LoggingService, NullLogger, StderrLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static CURRENT_SCRIPT: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

/// Install the service described by the runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("invalid logging limits: {}", e))?;

    let service = Arc::new(LoggingService::from_preferences());
    init_global_logging_with_service(Arc::clone(&service))?;
    service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Logging initialized",
    ));
    Ok(())
}

/// Install a caller-built service, e.g. one backed by the `log` facade
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "logging already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(Arc::as_ref)
}

/// Restores the previous script on drop, so nesting and unwinding both work
struct ScriptScope {
    previous: Option<PathBuf>,
}

impl Drop for ScriptScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_SCRIPT.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Run `f` with `script` as the current thread's file context
pub fn with_file_context<F, R>(script: PathBuf, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = CURRENT_SCRIPT.with(|slot| slot.borrow_mut().replace(script));
    let _scope = ScriptScope { previous };
    f()
}

pub fn current_file_context() -> Option<PathBuf> {
    CURRENT_SCRIPT.with(|slot| slot.borrow().clone())
}

/// Adds `file=<path>` when a script is in scope
pub fn attach_file_context(event: LogEvent) -> LogEvent {
    CURRENT_SCRIPT.with(|slot| match slot.borrow().as_deref() {
        Some(path) => event.with_context("file", &display(path)),
        None => event,
    })
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
