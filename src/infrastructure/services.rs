//! Native implementations of the domain logging and clock abstractions.

use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider, init_logger, init_time_provider};
use chrono::{DateTime, Utc};
use std::io::Write;

/// Logger writing formatted entries to stderr
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn format_log_entry(entry: &LogEntry) -> String {
        let timestamp = SystemTimeProvider.format_timestamp(entry.timestamp);
        match entry.fields_text() {
            Some(fields) => format!(
                "[{}] {} {} | {} | {}",
                timestamp, entry.level, entry.component, entry.message, fields
            ),
            None => format!("[{}] {} {} | {}", timestamp, entry.level, entry.component, entry.message),
        }
    }
}

impl Logger for ConsoleLogger {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn log(&self, entry: LogEntry) {
        if self.enabled(entry.level) {
            let formatted = Self::format_log_entry(&entry);
            let _ = writeln!(std::io::stderr().lock(), "{formatted}");
        }
    }
}

/// Wall clock in milliseconds since the Unix epoch
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn current_timestamp(&self) -> u64 {
        crate::time_utils::now_millis()
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        i64::try_from(timestamp)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.format("%H:%M:%S%.3f").to_string())
            .unwrap_or_else(|| format!("{timestamp:06}"))
    }
}

/// Install `ConsoleLogger` and `SystemTimeProvider` as the global services.
pub fn init_console_logging(min_level: LogLevel) {
    init_time_provider(Box::new(SystemTimeProvider));
    init_logger(Box::new(ConsoleLogger::new(min_level)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::logging::LogComponent;

    #[test]
    fn formats_level_component_and_fields() {
        let mut entry = LogEntry::new(LogLevel::Warn, LogComponent::Infrastructure("RecordStore"), "trailing bytes")
            .with_field("path", "a.bin")
            .with_field("trailing_bytes", 3);
        entry.timestamp = 1_500;
        assert_eq!(
            ConsoleLogger::format_log_entry(&entry),
            "[00:00:01.500]  WARN INF:RecordStore | trailing bytes | path=a.bin trailing_bytes=3"
        );
    }

    #[test]
    fn level_filter_applies_before_formatting() {
        let logger = ConsoleLogger::new(LogLevel::Warn);
        assert!(!logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Error));
    }
}
