//! Fan-out logger over every sink of a factory

use super::traits::{Logger, ScopeGuard};
use crate::core::dispatcher::panic_message;
use crate::core::log_context::LogContext;
use crate::core::log_level::LogLevel;
use crate::core::metrics::LoggerMetrics;
use crate::core::record::Record;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Logger forwarding every call to an ordered list of constituents
///
/// * `is_enabled` is true if any constituent is enabled.
/// * `log` reaches every constituent; each decides on its own filter.
/// * `begin_scope` opens a scope on every constituent and returns one guard
///   releasing all of them.
///
/// A constituent that panics is skipped for that call and counted in
/// [`LoggerMetrics::sink_failures`]; the remaining constituents still run.
pub struct CompositeLogger {
    category: Arc<str>,
    loggers: Vec<Arc<dyn Logger>>,
    metrics: Arc<LoggerMetrics>,
}

impl CompositeLogger {
    pub fn new(category: impl Into<Arc<str>>, loggers: Vec<Arc<dyn Logger>>, metrics: Arc<LoggerMetrics>) -> Self {
        Self {
            category: category.into(),
            loggers,
            metrics,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    fn isolated<R>(&self, index: usize, operation: &str, call: impl FnOnce() -> R) -> Option<R> {
        match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(result) => Some(result),
            Err(payload) => {
                let failures = self.metrics.record_sink_failure();
                // Alert on first failure and periodically thereafter
                if failures == 0 || (failures + 1) % 1000 == 0 {
                    eprintln!(
                        "[LOGGER ERROR] Sink #{} panicked in {} for '{}': {} ({} sink failures so far)",
                        index,
                        operation,
                        self.category,
                        panic_message(payload.as_ref()),
                        failures + 1
                    );
                }
                None
            }
        }
    }
}

impl Logger for CompositeLogger {
    fn is_enabled(&self, level: LogLevel) -> bool {
        self.loggers.iter().enumerate().any(|(index, logger)| {
            self.isolated(index, "is_enabled", || logger.is_enabled(level))
                .unwrap_or(false)
        })
    }

    fn log(&self, record: &Record<'_>) {
        for (index, logger) in self.loggers.iter().enumerate() {
            self.isolated(index, "log", || logger.log(record));
        }
    }

    fn begin_scope(&self, context: LogContext) -> ScopeGuard {
        let guards = self
            .loggers
            .iter()
            .enumerate()
            .map(|(index, logger)| {
                self.isolated(index, "begin_scope", || logger.begin_scope(context.clone()))
                    .unwrap_or_else(ScopeGuard::noop)
            })
            .collect();
        ScopeGuard::composite(guards)
    }
}
