//! Double-buffered record storage shared by producers and the flush worker
//!
//! Producers append finished lines to the *front* buffer. When the front
//! buffer reaches the batch size, or the last swap is older than the flush
//! latency, its contents are moved onto the end of the *back* buffer and the
//! worker is signalled. The worker only ever takes records out of the back
//! buffer (or, after an idle timeout, out of both) while holding the lock,
//! then writes them with the lock released.
//!
//! One mutex guards both buffers and the last-swap instant. Buffers are
//! emptied with `Vec::append`, which keeps their capacity for reuse.

use super::config::LoggerConfig;
use super::diagnostic::{self, Severity};
use super::metrics::LoggerMetrics;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub(crate) struct Buffers {
    front: Vec<String>,
    back: Vec<String>,
    last_flush: Instant,
    /// Set once the worker has drained everything after a stop request
    closed: bool,
}

impl Buffers {
    /// Move all of `front` onto the end of `back`
    ///
    /// Appends rather than replaces: the worker may not have taken the
    /// previous back buffer yet.
    fn swap(&mut self, now: Instant) {
        self.back.append(&mut self.front);
        self.last_flush = now;
    }
}

/// Why the flush worker woke up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// A producer swapped records into the back buffer
    Signalled,
    /// The idle wait elapsed without a swap
    TimedOut,
    /// Stop was requested
    Stopped,
}

pub struct BufferManager {
    state: Mutex<Buffers>,
    ready: Condvar,
    stop: AtomicBool,
    batch_size: usize,
    flush_latency: Duration,
    idle_wait: Duration,
    metrics: Arc<LoggerMetrics>,
}

impl BufferManager {
    pub fn new(config: &LoggerConfig, metrics: Arc<LoggerMetrics>) -> Self {
        Self {
            state: Mutex::new(Buffers {
                front: Vec::with_capacity(config.batch_size),
                back: Vec::with_capacity(config.batch_size),
                last_flush: Instant::now(),
                closed: false,
            }),
            ready: Condvar::new(),
            stop: AtomicBool::new(false),
            batch_size: config.batch_size,
            flush_latency: config.flush_latency,
            idle_wait: config.idle_wait,
            metrics,
        }
    }

    /// Append a finished line to the front buffer
    ///
    /// Never performs I/O. Swaps and signals the worker when the front buffer
    /// reaches the batch size or the last swap is older than the flush latency.
    /// Lines arriving after the final drain are counted as dropped.
    pub fn enqueue(&self, record: String) {
        let now = Instant::now();
        let mut state = self.state.lock();

        if state.closed {
            drop(state);
            let previous = self.metrics.record_dropped(record.len() as u64);
            if diagnostic::should_report(previous) {
                diagnostic::report(
                    Severity::Warning,
                    format_args!(
                        "Record logged after shutdown was dropped ({} so far)",
                        previous + 1
                    ),
                );
            }
            return;
        }

        state.front.push(record);
        self.metrics.record_enqueued();

        let by_count = state.front.len() >= self.batch_size;
        let by_time = now.saturating_duration_since(state.last_flush) >= self.flush_latency;
        if by_count || by_time {
            state.swap(now);
            if by_count {
                self.metrics.record_count_swap();
            } else {
                self.metrics.record_time_swap();
            }
            self.ready.notify_one();
        }
    }

    /// Block until there is work, stop is requested, or the idle wait elapses
    ///
    /// Must be called with the state lock held; the lock is released while
    /// waiting. A [`Wake::TimedOut`] result tells the caller to also take the
    /// front buffer even though it is below the batch size.
    pub(crate) fn wait_for_work(&self, state: &mut MutexGuard<'_, Buffers>) -> Wake {
        // An idle wait too long to represent as an Instant means no idle flush
        let deadline = Instant::now().checked_add(self.idle_wait);
        let mut timed_out = false;
        loop {
            if self.stop.load(Ordering::Acquire) {
                return Wake::Stopped;
            }
            if !state.back.is_empty() {
                return Wake::Signalled;
            }
            if timed_out {
                return Wake::TimedOut;
            }
            match deadline {
                Some(deadline) => timed_out = self.ready.wait_until(state, deadline).timed_out(),
                None => self.ready.wait(state),
            }
        }
    }

    /// Wait for work and move the ready records into `batch`
    ///
    /// On a timeout wakeup the front buffer is taken as well, so a trickle
    /// of records that never fills a batch still reaches the sink. Nothing
    /// is taken once stop is requested; the caller switches to
    /// [`BufferManager::drain_into`].
    pub fn take_batch(&self, batch: &mut Vec<String>) -> Wake {
        let mut state = self.state.lock();
        let wake = self.wait_for_work(&mut state);
        match wake {
            Wake::Stopped => {}
            Wake::Signalled => batch.append(&mut state.back),
            Wake::TimedOut => {
                if !state.front.is_empty() {
                    state.swap(Instant::now());
                    self.metrics.record_idle_flush();
                }
                batch.append(&mut state.back);
            }
        }
        wake
    }

    /// Move everything still buffered into `batch`
    ///
    /// Returns `false` once both buffers are empty, at which point the
    /// manager is closed and later records are refused.
    pub fn drain_into(&self, batch: &mut Vec<String>) -> bool {
        let mut state = self.state.lock();
        let before = batch.len();
        state.swap(Instant::now());
        batch.append(&mut state.back);
        if batch.len() == before {
            state.closed = true;
            false
        } else {
            true
        }
    }

    /// Swap whatever is in the front buffer and wake the worker
    pub fn force_swap(&self) {
        let mut state = self.state.lock();
        if !state.front.is_empty() {
            state.swap(Instant::now());
            self.ready.notify_one();
        }
    }

    /// Raise the stop flag, move the front buffer to the back and wake the worker
    pub fn request_stop(&self) {
        let mut state = self.state.lock();
        self.stop.store(true, Ordering::Release);
        state.swap(Instant::now());
        self.ready.notify_one();
    }

    pub fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Records currently held in either buffer
    pub fn pending(&self) -> usize {
        let state = self.state.lock();
        state.front.len() + state.back.len()
    }

    pub fn metrics(&self) -> &Arc<LoggerMetrics> {
        &self.metrics
    }
}
