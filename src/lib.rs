//! # Flux Logger
//!
//! An in-process asynchronous logging sink. Any number of producer threads
//! format records and append them to a shared front buffer; a single
//! background thread swaps batches out and writes them to one output sink.
//!
//! ## Features
//!
//! - **Non-blocking producers**: no I/O ever happens on the logging thread
//! - **Bounded latency**: batches are handed over on a record-count or
//!   elapsed-time threshold, and an idle worker picks up partial batches
//! - **No loss on shutdown**: dropping the [`Logger`] drains and flushes
//!   every record logged before the drop
//! - **Pluggable output**: stdout, files, or any `io::Write`

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
        Result, Sink, SourceLocation,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink, WriterSink};
}

pub use crate::core::formatter::format;
pub use crate::core::{
    LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result,
    Sink, SourceLocation, DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_LATENCY, DEFAULT_IDLE_WAIT,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use sinks::{ConsoleSink, FileSink, MemorySink, WriterSink};
