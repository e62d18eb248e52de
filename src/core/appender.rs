//! Appender trait for log output destinations
//!
//! An appender receives fully materialized entries from a `Dispatcher`,
//! either on the logging thread or on the dispatcher's worker.

use super::{error::Result, log_entry::LogEntry};

pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
