//! Logging macros with `format!`-style arguments
//!
//! The message is only formatted when the logger reports the level as
//! enabled, and the call site's file and line are attached to the record.
//!
//! # Examples
//!
//! ```no_run
//! use rust_logger_composite::{info, warn, LoggerFactory, LoggerFactoryBuilder};
//!
//! let factory = LoggerFactoryBuilder::new().add_info_output("logs/").build().unwrap();
//! let logger = factory.create_logger("app::server");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! warn!(logger, "Retry attempt {} of {}", 3, 5);
//! ```

/// Log at an explicit level
///
/// ```no_run
/// # use rust_logger_composite::{log, LogLevel, LoggerFactory, LoggerFactoryBuilder};
/// # let factory = LoggerFactoryBuilder::new().build().unwrap();
/// # let logger = factory.create_logger("docs");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        let logger = &$logger;
        let level: $crate::LogLevel = $level;
        if logger.is_enabled(level) {
            logger.log(&$crate::Record::new(level, format_args!($($arg)+)).with_location(file!(), line!()));
        }
    }};
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log at `Critical`, the most severe record level
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
