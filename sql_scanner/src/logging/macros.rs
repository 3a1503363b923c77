//! Logging macros
//!
//! Every macro checks the global service and its level before building the
//! event. Context values are any `Display` type and are formatted only when
//! the event is kept.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_emit {
    ($level:expr, $event:expr $(, $key:expr => $value:expr)*) => {{
        if let Some(logger) = $crate::logging::try_get_global_logger() {
            if logger.should_log($level) {
                #[allow(unused_mut)]
                let mut event = $event;
                $(
                    event = event.with_context($key, &::std::string::ToString::to_string(&$value));
                )*
                logger.log_event($crate::logging::attach_file_context(event));
            }
        }
    }};
}

/// `log_error!(code, "message", "key" => value, ...)`, optionally with `span = s`
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)*) => {
        $crate::__log_emit!(
            $crate::logging::LogLevel::Error,
            $crate::logging::LogEvent::error($code, $message).with_span($span)
            $(, $key => $value)*
        )
    };
    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::__log_emit!(
            $crate::logging::LogLevel::Error,
            $crate::logging::LogEvent::error($code, $message)
            $(, $key => $value)*
        )
    };
}

/// Info-level event carrying a success code
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::__log_emit!(
            $crate::logging::LogLevel::Info,
            $crate::logging::LogEvent::success($code, $message)
            $(, $key => $value)*
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)*) => {
        $crate::__log_emit!(
            $crate::logging::LogLevel::Info,
            $crate::logging::LogEvent::info($message)
            $(, $key => $value)*
        )
    };
}

#[macro_export]
macro_rules! log_warning {
    ($message:expr $(, $key:expr => $value:expr)*) => {
        $crate::__log_emit!(
            $crate::logging::LogLevel::Warning,
            $crate::logging::LogEvent::warning($message)
            $(, $key => $value)*
        )
    };
}

/// `log_debug!("message", code = c, "key" => value, ...)`; the code is optional
#[macro_export]
macro_rules! log_debug {
    ($message:expr, code = $code:expr $(, $key:expr => $value:expr)*) => {
        $crate::__log_emit!(
            $crate::logging::LogLevel::Debug,
            $crate::logging::LogEvent::debug_with_code($code, $message)
            $(, $key => $value)*
        )
    };
    ($message:expr $(, $key:expr => $value:expr)*) => {
        $crate::__log_emit!(
            $crate::logging::LogLevel::Debug,
            $crate::logging::LogEvent::debug($message)
            $(, $key => $value)*
        )
    };
}
