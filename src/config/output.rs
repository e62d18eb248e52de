//! Per-sink file output description

use super::rotation::RotationInterval;
use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One file sink: where it writes, which levels it accepts and how it rolls
///
/// `rolling_interval` and `rolling_size_kb` fall back to the global values
/// of `LoggerConfig` when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory (ending in a separator) or file-name prefix
    pub path: String,
    pub min_level: LogLevel,
    /// Inclusive upper bound; `None` = unbounded
    pub max_level: Option<LogLevel>,
    pub rolling_interval: Option<RotationInterval>,
    pub rolling_size_kb: Option<u64>,
    /// Category prefix -> minimum level, applied after the global rules
    pub category_filters: BTreeMap<String, LogLevel>,
    pub use_global_filters: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            min_level: LogLevel::Trace,
            max_level: None,
            rolling_interval: None,
            rolling_size_kb: None,
            category_filters: BTreeMap::new(),
            use_global_filters: true,
        }
    }
}

impl OutputConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_levels(mut self, min_level: LogLevel, max_level: Option<LogLevel>) -> Self {
        self.min_level = min_level;
        self.max_level = max_level;
        self
    }

    #[must_use]
    pub fn with_rolling(mut self, interval: RotationInterval, size_kb: u64) -> Self {
        self.rolling_interval = Some(interval);
        self.rolling_size_kb = Some(size_kb);
        self
    }

    #[must_use]
    pub fn with_filter(mut self, category: impl Into<String>, level: LogLevel) -> Self {
        self.category_filters.insert(category.into(), level);
        self
    }

    #[must_use]
    pub fn without_global_filters(mut self) -> Self {
        self.use_global_filters = false;
        self
    }

    /// `true` if `level` lies inside `[min_level, max_level]`
    pub fn accepts_level(&self, level: LogLevel) -> bool {
        level >= self.min_level && self.max_level.map_or(true, |max| level <= max)
    }

    /// Check `min_level <= max_level` and a non-empty path
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` describing the offending output
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(LoggerError::config("output", "Output path must not be empty"));
        }
        if let Some(max) = self.max_level {
            if self.min_level > max {
                return Err(LoggerError::config(
                    "output",
                    format!(
                        "Output '{}' has min_level {} above max_level {}",
                        self.path, self.min_level, max
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let output = OutputConfig::new("logs/");
        assert_eq!(output.min_level, LogLevel::Trace);
        assert_eq!(output.max_level, None);
        assert!(output.use_global_filters);
        assert!(output.category_filters.is_empty());
    }

    #[test]
    fn test_accepts_level_inclusive_bounds() {
        let output = OutputConfig::new("logs/").with_levels(LogLevel::Debug, Some(LogLevel::Warn));
        assert!(!output.accepts_level(LogLevel::Trace));
        assert!(output.accepts_level(LogLevel::Debug));
        assert!(output.accepts_level(LogLevel::Warn));
        assert!(!output.accepts_level(LogLevel::Error));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let output = OutputConfig::new("logs/").with_levels(LogLevel::Error, Some(LogLevel::Info));
        let err = output.validate().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        assert!(OutputConfig::new("logs/")
            .with_levels(LogLevel::Info, Some(LogLevel::Info))
            .validate()
            .is_ok());
        assert!(OutputConfig::new("  ").validate().is_err());
    }
}
