//! Main logger implementation

use super::{
    buffer::BufferManager,
    config::LoggerConfig,
    diagnostic::{self, Severity},
    error::{panic_message, LoggerError, Result},
    formatter,
    log_entry::SourceLocation,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    sink::Sink,
    worker::FlushWorker,
};
use crate::sinks::ConsoleSink;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Name given to the background flush thread
pub const WORKER_THREAD_NAME: &str = "flux-flush";

struct WorkerHandle {
    thread: thread::JoinHandle<()>,
    /// Disconnects when the worker thread exits, normally or by panic
    done: Receiver<()>,
}

/// Handle to one asynchronous logging pipeline
///
/// Owns the shared buffers and the flush thread. Share it between producer
/// threads by reference or behind an `Arc`; dropping the last handle stops
/// the worker and writes out everything logged before the drop.
///
/// # Example
///
/// ```
/// use flux_logger::prelude::*;
///
/// let sink = MemorySink::new();
/// let mut logger = Logger::builder().sink(sink.clone()).build().unwrap();
///
/// flux_logger::info!(logger, "listening on port {}", 8080);
/// logger.shutdown().unwrap();
///
/// assert!(sink.contents().contains("[INFO] listening on port 8080"));
/// ```
pub struct Logger {
    buffers: Arc<BufferManager>,
    metrics: Arc<LoggerMetrics>,
    worker: Option<WorkerHandle>,
    config: LoggerConfig,
}

impl Logger {
    /// Start a logger writing to `sink` with the given configuration
    pub fn with_config<S: Sink + 'static>(config: LoggerConfig, sink: S) -> Result<Self> {
        Self::start(config, Box::new(sink))
    }

    fn start(config: LoggerConfig, sink: Box<dyn Sink>) -> Result<Self> {
        config.validate()?;

        let metrics = Arc::new(LoggerMetrics::new());
        let buffers = Arc::new(BufferManager::new(&config, Arc::clone(&metrics)));
        let worker = FlushWorker::new(Arc::clone(&buffers), sink);
        let (done_tx, done_rx) = bounded::<()>(0);

        let thread = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                // Dropped last, after the sink has been flushed and dropped
                let _done = done_tx;
                worker.run();
            })?;

        Ok(Self {
            buffers,
            metrics,
            worker: Some(WorkerHandle {
                thread,
                done: done_rx,
            }),
            config,
        })
    }

    /// Format and enqueue one record
    ///
    /// Never blocks on I/O and never fails from the caller's point of view.
    /// A message whose arguments fail to format is dropped and reported on
    /// stderr.
    pub fn log(&self, level: LogLevel, location: SourceLocation, args: fmt::Arguments<'_>) {
        match formatter::format(level, location, args) {
            Ok(line) => self.buffers.enqueue(line),
            Err(e) => {
                let previous = self.metrics.record_format_error();
                if diagnostic::should_report(previous) {
                    diagnostic::report(
                        Severity::Error,
                        format_args!(
                            "Dropped record from {}:{}: {}",
                            location.basename(),
                            location.line,
                            e
                        ),
                    );
                }
            }
        }
    }

    #[inline]
    pub fn debug(&self, location: SourceLocation, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, location, args);
    }

    #[inline]
    pub fn info(&self, location: SourceLocation, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, location, args);
    }

    #[inline]
    pub fn warn(&self, location: SourceLocation, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, location, args);
    }

    #[inline]
    pub fn error(&self, location: SourceLocation, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, location, args);
    }

    /// Hand everything buffered so far to the worker without waiting for it
    pub fn flush(&self) {
        self.buffers.force_swap();
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use flux_logger::prelude::*;
    ///
    /// let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
    ///
    /// let metrics = logger.metrics();
    /// println!("Written: {}", metrics.records_written());
    /// println!("Drop rate: {:.2}%", metrics.drop_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Records buffered but not yet taken by the worker
    pub fn pending(&self) -> usize {
        self.buffers.pending()
    }

    /// Whether the flush worker is still accepting records
    pub fn is_running(&self) -> bool {
        self.worker.is_some() && !self.buffers.is_stopping()
    }

    /// Stop the worker and write out everything logged so far
    ///
    /// Waits at most the configured `shutdown_timeout`. Calling it again
    /// after a completed shutdown is a no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        self.shutdown_with_timeout(self.config.shutdown_timeout)
    }

    /// Stop the worker, bounding the final drain by `timeout`
    ///
    /// Returns [`LoggerError::ShutdownTimeout`] if the drain does not finish
    /// in time; the worker is then left to finish on its own. `None` waits
    /// for as long as the drain takes.
    ///
    /// # Example
    ///
    /// ```
    /// use flux_logger::prelude::*;
    /// use std::time::Duration;
    ///
    /// let mut logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
    /// flux_logger::warn!(logger, "Important message");
    ///
    /// if let Err(e) = logger.shutdown_with_timeout(Some(Duration::from_secs(10))) {
    ///     eprintln!("Logger shutdown failed: {}", e);
    /// }
    /// ```
    pub fn shutdown_with_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        self.buffers.request_stop();

        if let Some(timeout) = timeout {
            if let Err(RecvTimeoutError::Timeout) = worker.done.recv_timeout(timeout) {
                return Err(LoggerError::shutdown_timeout(timeout, self.buffers.pending()));
            }
        } else {
            // Never sent to; returns once the worker drops its sender
            let _ = worker.done.recv();
        }

        worker
            .thread
            .join()
            .map_err(|payload| LoggerError::WorkerPanicked(panic_message(payload.as_ref())))
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            diagnostic::report(Severity::Critical, format_args!("Shutdown failed: {}", e));
        }

        let dropped = self.metrics.records_dropped();
        if dropped > 0 {
            diagnostic::report(
                Severity::Warning,
                format_args!(
                    "Logger shut down with {} dropped records (drop rate: {:.2}%)",
                    dropped,
                    self.metrics.drop_rate()
                ),
            );
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use flux_logger::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .batch_size(256)
///     .flush_latency(Duration::from_micros(500))
///     .idle_wait(Duration::from_millis(5))
///     .sink(MemorySink::new())
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<Box<dyn Sink>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sink: None,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of buffered records that forces a swap
    #[must_use = "builder methods return a new value"]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Age of the last swap after which the next record forces a swap
    #[must_use = "builder methods return a new value"]
    pub fn flush_latency(mut self, latency: Duration) -> Self {
        self.config.flush_latency = latency;
        self
    }

    /// Longest the worker sleeps before writing a partially filled buffer
    #[must_use = "builder methods return a new value"]
    pub fn idle_wait(mut self, idle_wait: Duration) -> Self {
        self.config.idle_wait = idle_wait;
        self
    }

    /// Bound on the shutdown drain; `None` waits indefinitely
    #[must_use = "builder methods return a new value"]
    pub fn shutdown_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Set the output sink
    ///
    /// Defaults to [`ConsoleSink`] when not called.
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Validate the configuration and start the flush worker
    pub fn build(self) -> Result<Logger> {
        let sink: Box<dyn Sink> = match self.sink {
            Some(sink) => sink,
            None => Box::new(ConsoleSink::new()),
        };
        Logger::start(self.config, sink)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
