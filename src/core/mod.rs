//! Core logger types and traits

pub mod buffer;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod formatter;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod worker;

pub use buffer::{BufferManager, Wake};
pub use config::{
    LoggerConfig, DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_LATENCY, DEFAULT_IDLE_WAIT,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use error::{LoggerError, Result};
pub use log_entry::{LogRecord, SourceLocation};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use sink::Sink;
pub use worker::{FlushWorker, WorkerState};
