//! Logger metrics for observability
//!
//! Counters for monitoring the buffer swap cycle and the health of the
//! output sink: how many records went in, how many came out, and how many
//! were lost to formatting or write failures.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use flux_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_written(1);
///
/// assert_eq!(metrics.records_enqueued(), 1);
/// assert_eq!(metrics.records_written(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted into the front buffer
    records_enqueued: AtomicU64,

    /// Records handed to the sink without error
    records_written: AtomicU64,

    /// Records lost to sink failures or logged after shutdown
    records_dropped: AtomicU64,

    /// Bytes the sink failed to accept
    bytes_dropped: AtomicU64,

    /// Records discarded because their message failed to format
    format_errors: AtomicU64,

    /// Failed sink write or flush calls
    write_errors: AtomicU64,

    /// Swaps triggered by the batch-size threshold
    count_swaps: AtomicU64,

    /// Swaps triggered by the flush-latency threshold
    time_swaps: AtomicU64,

    /// Idle wakeups that stole a partially filled front buffer
    idle_flushes: AtomicU64,

    /// Batches written by the flush worker
    batches_written: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_enqueued: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            bytes_dropped: AtomicU64::new(0),
            format_errors: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            count_swaps: AtomicU64::new(0),
            time_swaps: AtomicU64::new(0),
            idle_flushes: AtomicU64::new(0),
            batches_written: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_enqueued(&self) -> u64 {
        self.records_enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_dropped(&self) -> u64 {
        self.records_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_dropped(&self) -> u64 {
        self.bytes_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn format_errors(&self) -> u64 {
        self.format_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn count_swaps(&self) -> u64 {
        self.count_swaps.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn time_swaps(&self) -> u64 {
        self.time_swaps.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn idle_flushes(&self) -> u64 {
        self.idle_flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn batches_written(&self) -> u64 {
        self.batches_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.records_enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self, count: u64) -> u64 {
        self.records_written.fetch_add(count, Ordering::Relaxed)
    }

    /// Record a dropped record; returns the previous drop count
    #[inline]
    pub fn record_dropped(&self, bytes: u64) -> u64 {
        self.bytes_dropped.fetch_add(bytes, Ordering::Relaxed);
        self.records_dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_format_error(&self) -> u64 {
        self.format_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_error(&self) -> u64 {
        self.write_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_count_swap(&self) -> u64 {
        self.count_swaps.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_time_swap(&self) -> u64 {
        self.time_swaps.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_idle_flush(&self) -> u64 {
        self.idle_flushes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_batch(&self) -> u64 {
        self.batches_written.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been written or dropped yet.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.records_dropped() as f64;
        let total = self.records_written() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        for counter in [
            &self.records_enqueued,
            &self.records_written,
            &self.records_dropped,
            &self.bytes_dropped,
            &self.format_errors,
            &self.write_errors,
            &self.count_swaps,
            &self.time_swaps,
            &self.idle_flushes,
            &self.batches_written,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_enqueued: AtomicU64::new(self.records_enqueued()),
            records_written: AtomicU64::new(self.records_written()),
            records_dropped: AtomicU64::new(self.records_dropped()),
            bytes_dropped: AtomicU64::new(self.bytes_dropped()),
            format_errors: AtomicU64::new(self.format_errors()),
            write_errors: AtomicU64::new(self.write_errors()),
            count_swaps: AtomicU64::new(self.count_swaps()),
            time_swaps: AtomicU64::new(self.time_swaps()),
            idle_flushes: AtomicU64::new(self.idle_flushes()),
            batches_written: AtomicU64::new(self.batches_written()),
        }
    }
}
