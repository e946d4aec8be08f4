//! Background flush worker
//!
//! A single thread that moves batches out of the [`BufferManager`] and writes
//! them to the sink. It runs through three states:
//!
//! - `Running`: wait, take a batch, write it, flush the sink, repeat.
//! - `Draining`: entered once stop is observed; keeps taking and writing
//!   until both buffers are empty.
//! - `Stopped`: the thread returns and is joined by the logger.
//!
//! Sink failures are not retried. A failed line is counted as dropped, the
//! failure is reported on stderr (first occurrence, then every 1000th), and
//! the worker moves on to the next line. Retrying on the only consumer thread
//! would stall every later flush.

use super::buffer::{BufferManager, Wake};
use super::diagnostic::{self, Severity};
use super::error::{panic_message, LoggerError, Result};
use super::metrics::LoggerMetrics;
use super::sink::Sink;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    Draining,
    Stopped,
}

pub struct FlushWorker {
    buffers: Arc<BufferManager>,
    sink: Box<dyn Sink>,
    metrics: Arc<LoggerMetrics>,
    batch: Vec<String>,
    state: WorkerState,
}

impl FlushWorker {
    pub fn new(buffers: Arc<BufferManager>, sink: Box<dyn Sink>) -> Self {
        let metrics = Arc::clone(buffers.metrics());
        Self {
            buffers,
            sink,
            metrics,
            batch: Vec::new(),
            state: WorkerState::Running,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Run until stopped and fully drained
    pub fn run(mut self) {
        while self.state != WorkerState::Stopped {
            self.step();
        }
    }

    /// Advance the state machine by one wakeup or one drain pass
    pub fn step(&mut self) {
        match self.state {
            WorkerState::Running => match self.buffers.take_batch(&mut self.batch) {
                Wake::Stopped => self.state = WorkerState::Draining,
                Wake::Signalled | Wake::TimedOut => self.write_batch(),
            },
            WorkerState::Draining => {
                if self.buffers.drain_into(&mut self.batch) {
                    self.write_batch();
                } else {
                    self.state = WorkerState::Stopped;
                }
            }
            WorkerState::Stopped => {}
        }
    }

    /// Write every line of the current batch in order, then flush the sink
    fn write_batch(&mut self) {
        if self.batch.is_empty() {
            return;
        }

        let mut written = 0;
        let mut batch = std::mem::take(&mut self.batch);
        for line in batch.drain(..) {
            match self.guarded(line.len(), |sink| sink.write(line.as_bytes())) {
                Ok(()) => written += 1,
                Err(e) => self.on_write_error(&e, line.len()),
            }
        }
        // Keep the emptied allocation for the next batch
        self.batch = batch;
        self.metrics.record_written(written);
        self.metrics.record_batch();

        if let Err(e) = self.guarded(0, |sink| sink.flush()) {
            let previous = self.metrics.record_write_error();
            if diagnostic::should_report(previous) {
                diagnostic::report(Severity::Error, format_args!("Sink flush failed: {}", e));
            }
        }
    }

    /// Call into the sink, turning a panic into a [`LoggerError::SinkWrite`]
    fn guarded(
        &mut self,
        bytes: usize,
        op: impl FnOnce(&mut Box<dyn Sink>) -> Result<()>,
    ) -> Result<()> {
        let sink = &mut self.sink;
        match panic::catch_unwind(AssertUnwindSafe(|| op(sink))) {
            Ok(result) => result,
            Err(payload) => Err(LoggerError::sink_write(
                self.sink.name(),
                bytes,
                io::Error::other(format!("sink panicked: {}", panic_message(payload.as_ref()))),
            )),
        }
    }

    fn on_write_error(&self, err: &LoggerError, bytes: usize) {
        self.metrics.record_write_error();
        let previous = self.metrics.record_dropped(bytes as u64);
        if diagnostic::should_report(previous) {
            diagnostic::report(
                Severity::Error,
                format_args!("{} ({} records dropped so far)", err, previous + 1),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::LoggerConfig;
    use crate::sinks::MemorySink;
    use std::time::Duration;

    fn buffers(batch_size: usize) -> Arc<BufferManager> {
        let config = LoggerConfig {
            batch_size,
            flush_latency: Duration::from_secs(60),
            idle_wait: Duration::from_millis(2),
            shutdown_timeout: None,
        };
        Arc::new(BufferManager::new(&config, Arc::new(LoggerMetrics::new())))
    }

    struct FailEveryOther {
        calls: usize,
    }

    impl Sink for FailEveryOther {
        fn write(&mut self, bytes: &[u8]) -> Result<()> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(LoggerError::sink_write(
                    "flaky",
                    bytes.len(),
                    io::Error::new(io::ErrorKind::WriteZero, "short write"),
                ));
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    struct Panicking;

    impl Sink for Panicking {
        fn write(&mut self, _bytes: &[u8]) -> Result<()> {
            panic!("sink exploded")
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_state_machine_transitions() {
        let buffers = buffers(2);
        let sink = MemorySink::new();
        let mut worker = FlushWorker::new(Arc::clone(&buffers), Box::new(sink.clone()));

        buffers.enqueue("a\n".to_string());
        buffers.enqueue("b\n".to_string());
        worker.step();
        assert_eq!(worker.state(), WorkerState::Running);
        assert_eq!(sink.contents(), "a\nb\n");

        buffers.enqueue("c\n".to_string());
        buffers.request_stop();
        worker.step();
        assert_eq!(worker.state(), WorkerState::Draining);

        worker.step();
        assert_eq!(sink.contents(), "a\nb\nc\n");
        worker.step();
        assert_eq!(worker.state(), WorkerState::Stopped);
        assert!(buffers.is_closed());
    }

    #[test]
    fn test_write_failures_are_counted_not_retried() {
        let buffers = buffers(4);
        let metrics = Arc::clone(buffers.metrics());
        let worker = FlushWorker::new(
            Arc::clone(&buffers),
            Box::new(FailEveryOther { calls: 0 }),
        );

        for i in 0..4 {
            buffers.enqueue(format!("{}\n", i));
        }
        buffers.request_stop();
        worker.run();

        assert_eq!(metrics.records_written(), 2);
        assert_eq!(metrics.records_dropped(), 2);
        assert_eq!(metrics.bytes_dropped(), 4);
        assert_eq!(metrics.write_errors(), 2);
    }

    #[test]
    fn test_panicking_sink_does_not_kill_worker() {
        let buffers = buffers(1);
        let metrics = Arc::clone(buffers.metrics());
        let worker = FlushWorker::new(Arc::clone(&buffers), Box::new(Panicking));

        buffers.enqueue("x\n".to_string());
        buffers.enqueue("y\n".to_string());
        buffers.request_stop();
        worker.run();

        assert_eq!(metrics.records_dropped(), 2);
        assert_eq!(metrics.records_written(), 0);
    }

    #[test]
    fn test_idle_wakeup_writes_partial_batch() {
        let buffers = buffers(1024);
        let sink = MemorySink::new();
        let mut worker = FlushWorker::new(Arc::clone(&buffers), Box::new(sink.clone()));

        buffers.enqueue("lonely\n".to_string());
        worker.step();

        assert_eq!(sink.contents(), "lonely\n");
        assert_eq!(worker.state(), WorkerState::Running);
    }
}
