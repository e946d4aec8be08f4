//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// Numeric thread identifier, computed once per thread
thread_local! {
    static THREAD_ID: u64 = {
        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish()
    };
}

/// Numeric identifier of the calling thread
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// Call-site captured by the logging macros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub function: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    pub const fn new(function: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            function,
            file,
            line,
        }
    }

    /// File name without its directory components
    pub fn basename(&self) -> &'static str {
        let file = self.file;
        match file.rfind(['/', '\\']) {
            Some(idx) => &file[idx + 1..],
            None => file,
        }
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::new("unknown", "unknown", 0)
    }
}

/// A fully captured log event, ready to be rendered into a line
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    pub process_id: u32,
    pub thread_id: u64,
    pub location: SourceLocation,
}

impl LogRecord {
    /// Sanitize log message so a record always occupies exactly one line
    ///
    /// Replaces newlines and carriage returns with escape sequences so a
    /// message cannot inject fake records into the output.
    fn sanitize_message(message: String) -> String {
        if message.contains(['\n', '\r']) {
            message.replace('\n', "\\n").replace('\r', "\\r")
        } else {
            message
        }
    }

    /// Capture a record for the calling thread at the current instant
    pub fn capture(level: LogLevel, location: SourceLocation, message: String) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: Self::sanitize_message(message),
            process_id: std::process::id(),
            thread_id: current_thread_id(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename() {
        let loc = SourceLocation::new("main", "src/bin/server/main.rs", 12);
        assert_eq!(loc.basename(), "main.rs");

        let loc = SourceLocation::new("main", r"C:\work\lib.rs", 1);
        assert_eq!(loc.basename(), "lib.rs");

        let loc = SourceLocation::new("main", "lib.rs", 1);
        assert_eq!(loc.basename(), "lib.rs");
    }

    #[test]
    fn test_capture_fills_process_fields() {
        let record = LogRecord::capture(
            LogLevel::Warn,
            SourceLocation::default(),
            "disk almost full".to_string(),
        );
        assert_eq!(record.process_id, std::process::id());
        assert_eq!(record.thread_id, current_thread_id());
        assert_eq!(record.level, LogLevel::Warn);
    }

    #[test]
    fn test_message_sanitized() {
        let record = LogRecord::capture(
            LogLevel::Info,
            SourceLocation::default(),
            "login\nERROR fake\r".to_string(),
        );
        assert_eq!(record.message, "login\\nERROR fake\\r");
    }

    #[test]
    fn test_thread_ids_differ_between_threads() {
        let here = current_thread_id();
        let there = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(here, there);
        assert_eq!(here, current_thread_id());
    }
}
