//! Factory-wide logging configuration

use super::output::OutputConfig;
use super::rotation::RotationInterval;
use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use crate::core::overflow_policy::OverflowPolicy;
use std::collections::BTreeMap;
use std::time::Duration;

/// Directory used when a configuration names no outputs
pub const DEFAULT_LOG_PATH: &str = "logs/";

pub const DEFAULT_ROLLING_SIZE_KB: u64 = 2048;

pub const DEFAULT_ASYNC_BUFFER: usize = 8192;

pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Everything a `CompositeLoggerFactory` is built from
///
/// Mutable while it is being assembled (builder, JSON section, closures);
/// factories take it by value and share it read-only afterwards.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub outputs: Vec<OutputConfig>,
    /// Minimum level of the output synthesized when `outputs` is empty
    pub minimum_level: LogLevel,
    pub global_rolling_interval: RotationInterval,
    pub global_rolling_size_kb: u64,
    /// Category prefix -> minimum level shared by every sink that opts in
    pub category_filters: BTreeMap<String, LogLevel>,

    pub console_enabled: bool,
    /// Include the category in console lines
    pub console_detailed: bool,
    pub console_colors: bool,
    pub console_min_level: LogLevel,
    pub console_category_filters: BTreeMap<String, LogLevel>,
    pub console_use_global_filters: bool,

    /// Age in days after which `.log` files are deleted, 0 = keep forever
    pub retention_days: u32,
    pub background_cleanup_enabled: bool,
    pub cleanup_interval: Duration,

    /// Queue capacity of each file sink, `None` = write on the calling thread
    pub async_buffer: Option<usize>,
    pub overflow_policy: OverflowPolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            outputs: Vec::new(),
            minimum_level: LogLevel::Info,
            global_rolling_interval: RotationInterval::Hour,
            global_rolling_size_kb: DEFAULT_ROLLING_SIZE_KB,
            category_filters: BTreeMap::new(),
            console_enabled: false,
            console_detailed: false,
            console_colors: true,
            console_min_level: LogLevel::Trace,
            console_category_filters: BTreeMap::new(),
            console_use_global_filters: true,
            retention_days: 0,
            background_cleanup_enabled: true,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            async_buffer: Some(DEFAULT_ASYNC_BUFFER),
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outputs as they will be built: the configured ones, or a single
    /// default output at `minimum_level` when none are configured
    pub fn effective_outputs(&self) -> Vec<OutputConfig> {
        if self.outputs.is_empty() {
            vec![OutputConfig::new(DEFAULT_LOG_PATH).with_levels(self.minimum_level, None)]
        } else {
            self.outputs.clone()
        }
    }

    /// Copy of this configuration with the default output made explicit
    #[must_use]
    pub fn resolved(&self) -> Self {
        Self {
            outputs: self.effective_outputs(),
            ..self.clone()
        }
    }

    /// Validate every configured output and the cleanup schedule
    ///
    /// # Errors
    ///
    /// Returns the first output error found, or `InvalidConfiguration` for a
    /// zero cleanup interval with background cleanup enabled
    pub fn validate(&self) -> Result<()> {
        self.outputs.iter().try_for_each(OutputConfig::validate)?;
        if self.retention_days > 0 && self.background_cleanup_enabled && self.cleanup_interval.is_zero() {
            return Err(LoggerError::config("cleanup", "cleanup_interval must be greater than zero"));
        }
        Ok(())
    }
}
