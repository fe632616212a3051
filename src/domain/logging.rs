use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use strum::{AsRefStr, EnumString};

/// Severity, padded so console columns line up
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    #[display(fmt = "TRACE")]
    Trace = 0,
    #[display(fmt = "DEBUG")]
    Debug = 1,
    #[display(fmt = " INFO")]
    Info = 2,
    #[display(fmt = " WARN")]
    Warn = 3,
    #[display(fmt = "ERROR")]
    Error = 4,
}

/// Layer that produced a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LogComponent {
    #[display(fmt = "DOM:{}", _0)]
    Domain(&'static str),
    #[display(fmt = "APP:{}", _0)]
    Application(&'static str),
    #[display(fmt = "INF:{}", _0)]
    Infrastructure(&'static str),
}

/// One log line: a message plus optional `key=value` fields
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Milliseconds as reported by the installed `TimeProvider`
    pub timestamp: u64,
    pub level: LogLevel,
    pub component: LogComponent,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, component: LogComponent, message: impl Into<String>) -> Self {
        Self {
            timestamp: get_time_provider().current_timestamp(),
            level,
            component,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, key: &'static str, value: impl ToString) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    /// Fields rendered as `k1=v1 k2=v2`, `None` when there are none.
    pub fn fields_text(&self) -> Option<String> {
        if self.fields.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
        Some(parts.join(" "))
    }
}

/// Clock used to stamp entries
pub trait TimeProvider: Send + Sync {
    fn current_timestamp(&self) -> u64;
    fn format_timestamp(&self, timestamp: u64) -> String;
}

/// Sink for log entries
pub trait Logger: Send + Sync {
    /// Cheap pre-check so disabled levels never pay for formatting.
    fn enabled(&self, _level: LogLevel) -> bool {
        true
    }

    fn log(&self, entry: LogEntry);
}

static GLOBAL_LOGGER: OnceLock<Box<dyn Logger>> = OnceLock::new();
static GLOBAL_TIME_PROVIDER: OnceLock<Box<dyn TimeProvider>> = OnceLock::new();

/// Install the process-wide logger. Later calls are ignored.
pub fn init_logger(logger: Box<dyn Logger>) {
    let _ = GLOBAL_LOGGER.set(logger);
}

/// Install the process-wide time provider. Later calls are ignored.
pub fn init_time_provider(time_provider: Box<dyn TimeProvider>) {
    let _ = GLOBAL_TIME_PROVIDER.set(time_provider);
}

pub fn get_logger() -> &'static dyn Logger {
    GLOBAL_LOGGER.get().map(|logger| logger.as_ref()).unwrap_or(&NoOpLogger)
}

pub fn get_time_provider() -> &'static dyn TimeProvider {
    GLOBAL_TIME_PROVIDER.get().map(|provider| provider.as_ref()).unwrap_or(&CounterTimeProvider)
}

/// Build and send an entry if the installed logger wants `level`.
pub fn emit<F>(level: LogLevel, build: F)
where
    F: FnOnce() -> LogEntry,
{
    let logger = get_logger();
    if logger.enabled(level) {
        logger.log(build());
    }
}

struct NoOpLogger;
impl Logger for NoOpLogger {
    fn enabled(&self, _level: LogLevel) -> bool {
        false
    }

    fn log(&self, _entry: LogEntry) {}
}

/// Monotonic counter used until a real clock is installed
struct CounterTimeProvider;
impl TimeProvider for CounterTimeProvider {
    fn current_timestamp(&self) -> u64 {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        COUNTER.fetch_add(1, Ordering::Relaxed)
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        format!("{timestamp:06}")
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:expr, $component:expr, $($arg:tt)*) => {
        $crate::domain::logging::emit($level, || {
            $crate::domain::logging::LogEntry::new($level, $component, format!($($arg)*))
        })
    };
}

#[macro_export]
macro_rules! log_trace {
    ($component:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            $crate::__log_at!($crate::domain::logging::LogLevel::Trace, $component, $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($component:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            $crate::__log_at!($crate::domain::logging::LogLevel::Debug, $component, $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($component:expr, $($arg:tt)*) => {
        $crate::__log_at!($crate::domain::logging::LogLevel::Info, $component, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($component:expr, $($arg:tt)*) => {
        $crate::__log_at!($crate::domain::logging::LogLevel::Warn, $component, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn component_display_tags_layer() {
        assert_eq!(LogComponent::Infrastructure("Store").to_string(), "INF:Store");
        assert_eq!(LogComponent::Application("Reload").to_string(), "APP:Reload");
    }

    #[test]
    fn levels_parse_and_order() {
        assert_eq!(LogLevel::from_str("WARN"), Ok(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("debug"), Ok(LogLevel::Debug));
        assert!(LogLevel::from_str("loud").is_err());
        assert_eq!(LogLevel::Info.as_ref(), "info");
        assert!(LogLevel::Warn > LogLevel::Info);
    }

    #[test]
    fn fields_render_in_insertion_order() {
        let entry = LogEntry::new(LogLevel::Warn, LogComponent::Infrastructure("RecordStore"), "trailing bytes")
            .with_field("path", "a.bin")
            .with_field("bytes", 7);
        assert_eq!(entry.fields_text().as_deref(), Some("path=a.bin bytes=7"));

        let bare = LogEntry::new(LogLevel::Info, LogComponent::Domain("Window"), "loaded");
        assert_eq!(bare.fields_text(), None);
    }
}
