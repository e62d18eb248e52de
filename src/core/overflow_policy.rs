//! Overflow policies for the buffered write path
//!
//! When a sink's async queue is full, these policies decide what happens to
//! new entries so that loss is never silent.

use super::log_level::LogLevel;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Policy for handling queue overflow in async logging
///
/// # Example
///
/// ```
/// use rust_logger_composite::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: alert and drop
/// let policy = OverflowPolicy::default();
///
/// // Block with timeout
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop new entries; only metrics record the loss
    DropNewest,

    /// Block the caller until the worker frees space
    ///
    /// Applies backpressure to the logging thread.
    Block,

    /// Block up to the timeout, then drop
    BlockWithTimeout(Duration),

    /// Drop and alert on stderr (first drop and every 1000th)
    #[default]
    AlertAndDrop,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}

impl FromStr for OverflowPolicy {
    type Err = String;

    /// Accepts `DropNewest`, `Block`, `AlertAndDrop` and
    /// `BlockWithTimeout:<millis>` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        match lower.as_str() {
            "dropnewest" => Ok(OverflowPolicy::DropNewest),
            "block" => Ok(OverflowPolicy::Block),
            "alertanddrop" => Ok(OverflowPolicy::AlertAndDrop),
            _ => lower
                .strip_prefix("blockwithtimeout:")
                .and_then(|millis| millis.trim().parse::<u64>().ok())
                .map(|millis| OverflowPolicy::BlockWithTimeout(Duration::from_millis(millis)))
                .ok_or_else(|| format!("Invalid overflow policy: '{}'", trimmed)),
        }
    }
}

/// Priority level for log preservation during overflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogPriority {
    /// Trace, Debug, Info
    #[default]
    Normal = 0,
    /// Warn
    High = 1,
    /// Error, Critical - never dropped
    Critical = 2,
}

impl LogLevel {
    /// Overflow priority of entries at this level
    pub fn priority(&self) -> LogPriority {
        match self {
            LogLevel::Trace | LogLevel::Debug | LogLevel::Info | LogLevel::Off => {
                LogPriority::Normal
            }
            LogLevel::Warn => LogPriority::High,
            LogLevel::Error | LogLevel::Critical => LogPriority::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::AlertAndDrop);
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::DropNewest.to_string(), "DropNewest");
        assert_eq!(OverflowPolicy::Block.to_string(), "Block");
        assert_eq!(
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(100)).to_string(),
            "BlockWithTimeout(100ms)"
        );
        assert_eq!(OverflowPolicy::AlertAndDrop.to_string(), "AlertAndDrop");
    }

    #[test]
    fn test_overflow_policy_parse() {
        assert_eq!("block".parse(), Ok(OverflowPolicy::Block));
        assert_eq!("DropNewest".parse(), Ok(OverflowPolicy::DropNewest));
        assert_eq!(
            "BlockWithTimeout:250".parse(),
            Ok(OverflowPolicy::BlockWithTimeout(Duration::from_millis(250)))
        );
        assert!("BlockWithTimeout:soon".parse::<OverflowPolicy>().is_err());
        assert!("DropOldest".parse::<OverflowPolicy>().is_err());
    }

    #[test]
    fn test_log_priority() {
        assert_eq!(LogLevel::Trace.priority(), LogPriority::Normal);
        assert_eq!(LogLevel::Info.priority(), LogPriority::Normal);
        assert_eq!(LogLevel::Warn.priority(), LogPriority::High);
        assert_eq!(LogLevel::Error.priority(), LogPriority::Critical);
        assert_eq!(LogLevel::Critical.priority(), LogPriority::Critical);
        assert!(LogPriority::Normal < LogPriority::High);
    }
}
