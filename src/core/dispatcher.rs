//! Buffered write path shared by one sink's appenders
//!
//! A `Dispatcher` owns the appenders of a single sink and moves entries to
//! them either inline (synchronous mode) or through a bounded channel drained
//! by a dedicated worker thread (asynchronous mode).

use super::{
    appender::Appender,
    error::Result,
    log_entry::LogEntry,
    metrics::LoggerMetrics,
    overflow_policy::{LogPriority, OverflowPolicy},
};
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for dispatcher cleanup (5 seconds)
///
/// Used when a dispatcher is dropped or disposed without an explicit
/// `shutdown()` call.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const BATCH_SIZE: usize = 50;
const BATCH_TIMEOUT: Duration = Duration::from_millis(10);

type SharedAppenders = Arc<Mutex<Vec<Box<dyn Appender>>>>;

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

pub struct Dispatcher {
    name: String,
    appenders: SharedAppenders,
    sender: RwLock<Option<Sender<LogEntry>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    metrics: Arc<LoggerMetrics>,
    overflow_policy: OverflowPolicy,
    closed: AtomicBool,
}

impl Dispatcher {
    /// Write every entry inline on the calling thread
    #[must_use]
    pub fn synchronous(name: impl Into<String>, appenders: Vec<Box<dyn Appender>>) -> Self {
        Self {
            name: name.into(),
            appenders: Arc::new(Mutex::new(appenders)),
            sender: RwLock::new(None),
            worker: Mutex::new(None),
            metrics: Arc::new(LoggerMetrics::new()),
            overflow_policy: OverflowPolicy::AlertAndDrop,
            closed: AtomicBool::new(false),
        }
    }

    /// Queue entries into a bounded channel drained by a worker thread
    ///
    /// # Errors
    ///
    /// Returns error if the worker thread cannot be spawned
    pub fn asynchronous(
        name: impl Into<String>,
        appenders: Vec<Box<dyn Appender>>,
        buffer_size: usize,
        overflow_policy: OverflowPolicy,
    ) -> Result<Self> {
        let name = name.into();
        let (sender, receiver) = bounded::<LogEntry>(buffer_size.max(1));
        let appenders: SharedAppenders = Arc::new(Mutex::new(appenders));
        let appenders_clone = Arc::clone(&appenders);
        let metrics = Arc::new(LoggerMetrics::new());
        let metrics_clone = Arc::clone(&metrics);

        let handle = thread::Builder::new()
            .name(format!("log-dispatch-{}", name))
            .spawn(move || {
                let mut batch = Vec::with_capacity(BATCH_SIZE);

                loop {
                    match receiver.recv() {
                        Ok(entry) => batch.push(entry),
                        Err(_) => {
                            // Channel closed: drain what is left and exit
                            if !batch.is_empty() {
                                Self::process_batch(&appenders_clone, &batch, &metrics_clone);
                            }
                            break;
                        }
                    }

                    while batch.len() < BATCH_SIZE {
                        match receiver.try_recv() {
                            Ok(entry) => batch.push(entry),
                            Err(_) => break,
                        }
                    }

                    if batch.len() < BATCH_SIZE {
                        // Small batch - wait a bit for more entries
                        thread::sleep(BATCH_TIMEOUT);
                        while batch.len() < BATCH_SIZE {
                            match receiver.try_recv() {
                                Ok(entry) => batch.push(entry),
                                Err(_) => break,
                            }
                        }
                    }

                    Self::process_batch(&appenders_clone, &batch, &metrics_clone);
                    batch.clear();
                }
            })
            .map_err(|e| {
                super::error::LoggerError::io_operation(
                    "spawn dispatcher worker",
                    format!("Failed to start worker for sink '{}'", name),
                    e,
                )
            })?;

        Ok(Self {
            name,
            appenders,
            sender: RwLock::new(Some(sender)),
            worker: Mutex::new(Some(handle)),
            metrics,
            overflow_policy,
            closed: AtomicBool::new(false),
        })
    }

    /// Write a batch with per-appender panic isolation, then flush
    fn process_batch(appenders: &SharedAppenders, batch: &[LogEntry], metrics: &LoggerMetrics) {
        let mut appenders = appenders.lock();

        for entry in batch {
            Self::write_isolated(&mut appenders, entry, metrics);
        }

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let flush_result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| appender.flush()));

            match flush_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender #{} flush failed: {}", idx, e);
                }
                Err(payload) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked during flush: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
    }

    /// Hand one entry to every appender; a failing appender never blocks the others
    fn write_isolated(
        appenders: &mut [Box<dyn Appender>],
        entry: &LogEntry,
        metrics: &LoggerMetrics,
    ) -> bool {
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| appender.append(entry)));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender #{} ({}) failed: {}", idx, appender.name(), e);
                    has_error = true;
                }
                Err(payload) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(payload.as_ref())
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_dropped();
        } else {
            metrics.record_logged();
        }

        has_error
    }

    pub fn dispatch(&self, entry: LogEntry) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }

        let sender = self.sender.read();
        match sender.as_ref() {
            Some(sender) => {
                let priority = entry.level.priority();
                match sender.try_send(entry) {
                    Ok(()) => {}
                    Err(TrySendError::Full(entry)) => self.handle_overflow(sender, entry, priority),
                    Err(TrySendError::Disconnected(_)) => {
                        // Shutting down, silently ignore
                    }
                }
            }
            None => {
                let mut appenders = self.appenders.lock();
                Self::write_isolated(&mut appenders, &entry, &self.metrics);
            }
        }
    }

    /// Handle queue overflow based on configured policy and log priority
    fn handle_overflow(&self, sender: &Sender<LogEntry>, entry: LogEntry, priority: LogPriority) {
        self.metrics.record_queue_full();

        // Error and Critical entries are never dropped
        if priority == LogPriority::Critical {
            self.metrics.record_critical_preserved();
            let mut appenders = self.appenders.lock();
            Self::write_isolated(&mut appenders, &entry, &self.metrics);
            return;
        }

        match &self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.metrics.record_dropped();
            }
            OverflowPolicy::Block => {
                self.metrics.record_block();
                let _ = sender.send(entry);
            }
            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                if let Err(crossbeam_channel::SendTimeoutError::Timeout(_)) =
                    sender.send_timeout(entry, *timeout)
                {
                    self.alert_and_drop();
                }
            }
            OverflowPolicy::AlertAndDrop => self.alert_and_drop(),
        }
    }

    fn alert_and_drop(&self) {
        let dropped_count = self.metrics.record_dropped();

        // Alert on first drop and periodically thereafter
        if dropped_count == 0 || (dropped_count + 1) % 1000 == 0 {
            eprintln!(
                "[LOGGER WARNING] Sink '{}' queue full, {} logs dropped. \
                 Consider increasing the async buffer or using a different overflow policy.",
                self.name,
                dropped_count + 1
            );
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_async(&self) -> bool {
        self.sender.read().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    /// Stop accepting entries, drain the queue and flush
    ///
    /// Returns `true` if the worker drained within `timeout` and the final
    /// flush succeeded. Calling it again is a no-op returning `true`.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return true;
        }

        // Closing the channel lets the worker drain and exit
        drop(self.sender.write().take());

        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            let start = Instant::now();

            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!(
                            "[LOGGER ERROR] Worker for sink '{}' panicked during shutdown: {}",
                            self.name,
                            panic_message(e.as_ref())
                        );
                        return false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Worker for sink '{}' did not finish within {:?}. \
                         Some logs may be lost.",
                        self.name, timeout
                    );
                    return false;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush sink '{}' during shutdown: {}", self.name, e);
            return false;
        }

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Sink '{}' shut down with {} dropped logs (drop rate: {:.2}%)",
                self.name,
                dropped,
                self.metrics.drop_rate()
            );
        }

        true
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}
