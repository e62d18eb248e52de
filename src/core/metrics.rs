//! Write-path counters
//!
//! Every dispatcher keeps one `LoggerMetrics` for its sink; a composite
//! factory keeps another shared by all of its composite loggers to count
//! isolated sink failures.

use std::sync::atomic::{AtomicU64, Ordering};

/// Relaxed atomic counters describing one write path
///
/// `record_*` methods return the count before the increment, which callers
/// use to rate-limit their diagnostics.
///
/// # Example
///
/// ```
/// use rust_logger_composite::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_dropped();
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.logged, 1);
/// assert_eq!(snapshot.dropped, 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    logged: AtomicU64,
    dropped: AtomicU64,
    queue_full: AtomicU64,
    blocked: AtomicU64,
    critical_preserved: AtomicU64,
    sink_failures: AtomicU64,
}

/// Point-in-time copy of a `LoggerMetrics`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub logged: u64,
    pub dropped: u64,
    pub queue_full: u64,
    pub blocked: u64,
    pub critical_preserved: u64,
    pub sink_failures: u64,
}

impl MetricsSnapshot {
    /// Share of entries lost, in percent
    pub fn drop_rate(&self) -> f64 {
        let attempted = self.logged + self.dropped;
        if attempted == 0 {
            0.0
        } else {
            self.dropped as f64 * 100.0 / attempted as f64
        }
    }
}

#[inline]
fn bump(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::Relaxed)
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            logged: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            queue_full: AtomicU64::new(0),
            blocked: AtomicU64::new(0),
            critical_preserved: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    /// Entries written by every appender of the sink
    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.logged.load(Ordering::Relaxed)
    }

    /// Entries discarded on overflow or rejected by an appender
    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.blocked.load(Ordering::Relaxed)
    }

    /// Error and critical entries written inline because the queue was full
    #[inline]
    pub fn critical_logs_preserved(&self) -> u64 {
        self.critical_preserved.load(Ordering::Relaxed)
    }

    /// Constituent calls that panicked inside a composite logger
    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    pub fn record_logged(&self) -> u64 {
        bump(&self.logged)
    }

    pub fn record_dropped(&self) -> u64 {
        bump(&self.dropped)
    }

    pub fn record_queue_full(&self) -> u64 {
        bump(&self.queue_full)
    }

    pub fn record_block(&self) -> u64 {
        bump(&self.blocked)
    }

    pub fn record_critical_preserved(&self) -> u64 {
        bump(&self.critical_preserved)
    }

    pub fn record_sink_failure(&self) -> u64 {
        bump(&self.sink_failures)
    }

    pub fn drop_rate(&self) -> f64 {
        self.snapshot().drop_rate()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            logged: self.total_logged(),
            dropped: self.dropped_count(),
            queue_full: self.queue_full_events(),
            blocked: self.block_events(),
            critical_preserved: self.critical_logs_preserved(),
            sink_failures: self.sink_failures(),
        }
    }
}
