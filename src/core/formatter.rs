//! Line formatting
//!
//! Turns a log event into one finished, newline-terminated line:
//!
//! ```text
//! [2025-01-08 10:30:45.123456] [FLUX] [INFO] message [4242,00000000000000012345] [my_app::run,main.rs:42]
//! ```
//!
//! Rendering the date and time is the expensive part, so each thread caches
//! the `YYYY-MM-DD HH:MM:SS` prefix of the last second it formatted and only
//! appends the microsecond remainder on subsequent calls within that second.

use super::error::{panic_message, LoggerError, Result};
use super::log_entry::{LogRecord, SourceLocation};
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::fmt::{self, Write};
use std::panic::{self, AssertUnwindSafe};

/// Tag written after the timestamp of every line
pub const LINE_TAG: &str = "FLUX";

const PREFIX_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

struct PrefixCache {
    second: i64,
    prefix: String,
    renders: u64,
}

thread_local! {
    static PREFIX_CACHE: RefCell<PrefixCache> = const {
        RefCell::new(PrefixCache {
            second: i64::MIN,
            prefix: String::new(),
            renders: 0,
        })
    };
}

/// Number of times the calling thread rendered a date/time prefix
pub(crate) fn prefix_renders() -> u64 {
    PREFIX_CACHE.with(|cache| cache.borrow().renders)
}

/// Append `YYYY-MM-DD HH:MM:SS.uuuuuu` for `timestamp` to `out`
pub fn write_timestamp(timestamp: &DateTime<Local>, out: &mut String) {
    let second = timestamp.timestamp();
    // Leap seconds report up to 1_999_999 micros
    let micros = timestamp.timestamp_subsec_micros().min(999_999);

    PREFIX_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.second != second {
            cache.prefix.clear();
            let _ = write!(cache.prefix, "{}", timestamp.format(PREFIX_FORMAT));
            cache.second = second;
            cache.renders += 1;
        }
        out.push_str(&cache.prefix);
    });
    let _ = write!(out, ".{:06}", micros);
}

/// Render a captured record into its output line
pub fn render(record: &LogRecord) -> String {
    let mut line = String::with_capacity(96 + record.message.len());
    line.push('[');
    write_timestamp(&record.timestamp, &mut line);
    let _ = writeln!(
        line,
        "] [{}] [{}] {} [{},{:020}] [{},{}:{}]",
        LINE_TAG,
        record.level,
        record.message,
        record.process_id,
        record.thread_id,
        record.location.function,
        record.location.basename(),
        record.location.line
    );
    line
}

/// Render the user message
///
/// A `Display`/`Debug` implementation that returns `fmt::Error` or panics
/// produces [`LoggerError::Format`] instead of unwinding into the caller.
pub fn render_message(args: fmt::Arguments<'_>) -> Result<String> {
    if let Some(s) = args.as_str() {
        return Ok(s.to_string());
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut message = String::new();
        message.write_fmt(args).map(|()| message)
    }));

    match outcome {
        Ok(Ok(message)) => Ok(message),
        Ok(Err(fmt::Error)) => Err(LoggerError::format(
            "a formatting trait implementation returned an error",
        )),
        Err(payload) => Err(LoggerError::format(format!(
            "formatting panicked: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

/// Format a complete line for the calling thread at the current instant
pub fn format(level: LogLevel, location: SourceLocation, args: fmt::Arguments<'_>) -> Result<String> {
    let message = render_message(args)?;
    Ok(render(&LogRecord::capture(level, location, message)))
}
