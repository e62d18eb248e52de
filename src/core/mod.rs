//! Engine primitives: levels, entries, scopes, errors and the buffered write path

pub mod appender;
pub mod dispatcher;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod metrics;
pub mod overflow_policy;
pub mod record;
pub mod timestamp;

pub use appender::Appender;
pub use dispatcher::{Dispatcher, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use log_context::{FieldValue, LogContext, ScopeStack};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use metrics::{LoggerMetrics, MetricsSnapshot};
pub use overflow_policy::{LogPriority, OverflowPolicy};
pub use record::{error_chain, EventId, Record};
pub use timestamp::TimestampFormat;
