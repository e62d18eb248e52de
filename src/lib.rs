//! # Rust Logger Composite
//!
//! A logger factory that fans every log call out to several sinks, each with
//! its own level range, category filters and file rotation, plus a
//! background service deleting log files past their retention period.
//!
//! ## Features
//!
//! - **Fan-out**: one `CompositeLogger` per category writes to every sink
//! - **Per-sink filters**: inclusive level ranges and category prefix rules,
//!   with sink rules overriding global ones
//! - **Rolling files**: period and size based rotation, buffered on a worker
//!   thread per sink
//! - **Retention**: scheduled deletion of aged `.log` files
//! - **Configuration**: fluent builder or a hierarchical JSON section
//! - **Process-wide default**: lazily built factory with an explicit override
//!
//! ## Example
//!
//! ```no_run
//! use rust_logger_composite::prelude::*;
//!
//! let factory = LoggerFactoryBuilder::new()
//!     .add_trace_output("logs/trace/")
//!     .add_info_output("logs/")
//!     .add_error_output("logs/error/")
//!     .with_filter("app::db", LogLevel::Warn)
//!     .with_console()
//!     .with_retention_days(14)
//!     .build()?;
//!
//! let logger = factory.create_logger("app::orders");
//! let _scope = logger.begin_scope(LogContext::new().with_field("order_id", 42));
//! logger.info("order accepted");
//!
//! factory.dispose();
//! # Ok::<(), rust_logger_composite::LoggerError>(())
//! ```

pub mod appenders;
pub mod cleanup;
pub mod config;
pub mod core;
pub mod global;
pub mod logging;
pub mod macros;

pub mod prelude {
    pub use crate::cleanup::RetentionCleanupService;
    pub use crate::config::{LoggerConfig, LoggerFactoryBuilder, OutputConfig, RotationInterval};
    pub use crate::core::{
        EventId, FieldValue, LogContext, LogLevel, LoggerError, LoggerMetrics, OverflowPolicy, Record, Result,
    };
    pub use crate::logging::{
        CompositeLogger, CompositeLoggerFactory, Logger, LoggerExt, LoggerFactory, LoggerProvider, ScopeGuard,
        TypedLogger,
    };
}

pub use appenders::{ConsoleAppender, RollingFileAppender};
pub use cleanup::{retention_directory, RetentionCleanupService};
pub use config::{LoggerConfig, LoggerFactoryBuilder, OutputConfig, RotationInterval, DEFAULT_SECTION};
pub use core::{
    Appender, EventId, FieldValue, LogContext, LogEntry, LogLevel, LoggerError, LoggerMetrics, OverflowPolicy,
    Record, Result, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use logging::{
    CompositeLogger, CompositeLoggerFactory, LevelRange, Logger, LoggerExt, LoggerFactory, LoggerProvider,
    ScopeGuard, SinkEndpoint, SinkFilter, TypedLogger,
};
