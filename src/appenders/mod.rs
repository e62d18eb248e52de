//! Appenders: the console and the rolling file writer

pub mod console;
pub mod rolling_file;

pub use console::ConsoleAppender;
pub use rolling_file::{format_line, RollingFileAppender};

pub use crate::core::Appender;
