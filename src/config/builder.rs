//! Fluent assembly of a `LoggerConfig`

use super::output::OutputConfig;
use super::rotation::RotationInterval;
use super::settings::LoggerConfig;
use crate::core::error::Result;
use crate::core::log_level::LogLevel;
use crate::core::overflow_policy::OverflowPolicy;
use crate::logging::factory::CompositeLoggerFactory;
use crate::logging::traits::{LoggerFactory, LoggerProvider};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Builder for a [`CompositeLoggerFactory`]
///
/// Output-scoped methods (`with_output_filter`, `without_global_filters`)
/// modify the most recently added output and do nothing when no output has
/// been added yet.
///
/// # Examples
///
/// ```no_run
/// use rust_logger_composite::{LoggerFactoryBuilder, LogLevel, LoggerFactory};
///
/// let factory = LoggerFactoryBuilder::new()
///     .add_trace_output("logs/trace/")
///     .add_info_output("logs/")
///     .with_output_filter("app::db", LogLevel::Warn)
///     .with_console_details()
///     .with_retention_days(7)
///     .build()
///     .unwrap();
///
/// let logger = factory.create_logger("app::main");
/// ```
#[derive(Clone, Default)]
pub struct LoggerFactoryBuilder {
    config: LoggerConfig,
    providers: Vec<Arc<dyn LoggerProvider>>,
}

impl fmt::Debug for LoggerFactoryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerFactoryBuilder")
            .field("config", &self.config)
            .field("providers", &self.providers.len())
            .finish()
    }
}

impl LoggerFactoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue from an existing configuration
    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            providers: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn add_output(mut self, output: OutputConfig) -> Self {
        self.config.outputs.push(output);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn add_file_output(self, path: impl Into<String>, min_level: LogLevel, max_level: Option<LogLevel>) -> Self {
        self.add_output(OutputConfig::new(path).with_levels(min_level, max_level))
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn add_file_output_with_rolling(
        self,
        path: impl Into<String>,
        min_level: LogLevel,
        max_level: Option<LogLevel>,
        rolling_interval: RotationInterval,
        rolling_size_kb: u64,
    ) -> Self {
        self.add_output(
            OutputConfig::new(path)
                .with_levels(min_level, max_level)
                .with_rolling(rolling_interval, rolling_size_kb),
        )
    }

    /// Trace and Debug only, conventionally `logs/trace/`
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn add_trace_output(self, path: impl Into<String>) -> Self {
        self.add_file_output(path, LogLevel::Trace, Some(LogLevel::Debug))
    }

    /// Info and above, conventionally `logs/`
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn add_info_output(self, path: impl Into<String>) -> Self {
        self.add_file_output(path, LogLevel::Info, None)
    }

    /// Error and above, conventionally `logs/error/`
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn add_error_output(self, path: impl Into<String>) -> Self {
        self.add_file_output(path, LogLevel::Error, None)
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_rolling_interval(mut self, interval: RotationInterval) -> Self {
        self.config.global_rolling_interval = interval;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_rolling_size_kb(mut self, size_kb: u64) -> Self {
        self.config.global_rolling_size_kb = size_kb;
        self
    }

    /// Level of the default output used when no output is added
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_minimum_level(mut self, level: LogLevel) -> Self {
        self.config.minimum_level = level;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_console(mut self) -> Self {
        self.config.console_enabled = true;
        self
    }

    /// Enable the console with the category in each line
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_console_details(mut self) -> Self {
        self.config.console_enabled = true;
        self.config.console_detailed = true;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_console_colors(mut self, enabled: bool) -> Self {
        self.config.console_colors = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_console_min_level(mut self, level: LogLevel) -> Self {
        self.config.console_min_level = level;
        self
    }

    /// Global category rule shared by every sink that uses global filters
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_filter(mut self, category: impl Into<String>, min_level: LogLevel) -> Self {
        self.config.category_filters.insert(category.into(), min_level);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_filters<I, K>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = (K, LogLevel)>,
        K: Into<String>,
    {
        self.config
            .category_filters
            .extend(filters.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_output_filter(mut self, category: impl Into<String>, min_level: LogLevel) -> Self {
        if let Some(output) = self.config.outputs.last_mut() {
            output.category_filters.insert(category.into(), min_level);
        }
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_output_filters<I, K>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = (K, LogLevel)>,
        K: Into<String>,
    {
        if let Some(output) = self.config.outputs.last_mut() {
            output
                .category_filters
                .extend(filters.into_iter().map(|(k, v)| (k.into(), v)));
        }
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn without_global_filters(mut self) -> Self {
        if let Some(output) = self.config.outputs.last_mut() {
            output.use_global_filters = false;
        }
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_console_filter(mut self, category: impl Into<String>, min_level: LogLevel) -> Self {
        self.config.console_category_filters.insert(category.into(), min_level);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_console_filters<I, K>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = (K, LogLevel)>,
        K: Into<String>,
    {
        self.config
            .console_category_filters
            .extend(filters.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_console_without_global_filters(mut self) -> Self {
        self.config.console_use_global_filters = false;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.config.retention_days = days;
        self
    }

    /// Run the retention pass once at build time only
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn disable_background_cleanup(mut self) -> Self {
        self.config.background_cleanup_enabled = false;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.config.cleanup_interval = interval;
        self
    }

    /// Queue capacity for each file sink's worker
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_async_buffer(mut self, capacity: usize) -> Self {
        self.config.async_buffer = Some(capacity.max(1));
        self
    }

    /// Write file entries on the calling thread
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn synchronous(mut self) -> Self {
        self.config.async_buffer = None;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow_policy = policy;
        self
    }

    /// Apply a JSON configuration section (see [`crate::config::section`])
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn from_config_section(mut self, root: &Value, section: &str) -> Self {
        self.config.apply_json_section(root, section);
        self
    }

    /// Edit the configuration directly
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn configure(mut self, configure: impl FnOnce(&mut LoggerConfig)) -> Self {
        configure(&mut self.config);
        self
    }

    /// Attach an extra provider to every sink once the factory is built
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_provider(mut self, provider: Arc<dyn LoggerProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn into_config(self) -> LoggerConfig {
        self.config
    }

    /// # Errors
    ///
    /// Returns error if an output is invalid or a sink cannot be opened
    pub fn build(self) -> Result<CompositeLoggerFactory> {
        let factory = CompositeLoggerFactory::build(self.config)?;
        for provider in self.providers {
            factory.add_provider(provider);
        }
        Ok(factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convenience_outputs() {
        let config = LoggerFactoryBuilder::new()
            .add_trace_output("logs/trace/")
            .add_info_output("logs/")
            .add_error_output("logs/error/")
            .into_config();

        assert_eq!(config.outputs.len(), 3);
        assert_eq!(config.outputs[0].min_level, LogLevel::Trace);
        assert_eq!(config.outputs[0].max_level, Some(LogLevel::Debug));
        assert_eq!(config.outputs[1].min_level, LogLevel::Info);
        assert_eq!(config.outputs[1].max_level, None);
        assert_eq!(config.outputs[2].path, "logs/error/");
        assert_eq!(config.outputs[2].min_level, LogLevel::Error);
    }

    #[test]
    fn test_output_scoped_methods_target_last_output() {
        let config = LoggerFactoryBuilder::new()
            .with_output_filter("ignored", LogLevel::Error)
            .without_global_filters()
            .add_info_output("a/")
            .add_info_output("b/")
            .with_output_filter("app::db", LogLevel::Warn)
            .with_output_filters([("app::net", LogLevel::Error)])
            .without_global_filters()
            .into_config();

        assert!(config.outputs[0].category_filters.is_empty());
        assert!(config.outputs[0].use_global_filters);
        assert_eq!(config.outputs[1].category_filters.len(), 2);
        assert!(!config.outputs[1].use_global_filters);
    }

    #[test]
    fn test_console_and_cleanup_settings() {
        let config = LoggerFactoryBuilder::new()
            .with_console_details()
            .with_console_colors(false)
            .with_console_filter("noisy", LogLevel::Off)
            .with_console_without_global_filters()
            .with_retention_days(3)
            .disable_background_cleanup()
            .with_cleanup_interval(Duration::from_secs(60))
            .synchronous()
            .into_config();

        assert!(config.console_enabled);
        assert!(config.console_detailed);
        assert!(!config.console_colors);
        assert!(!config.console_use_global_filters);
        assert_eq!(config.console_category_filters.get("noisy"), Some(&LogLevel::Off));
        assert_eq!(config.retention_days, 3);
        assert!(!config.background_cleanup_enabled);
        assert_eq!(config.cleanup_interval, Duration::from_secs(60));
        assert_eq!(config.async_buffer, None);
    }

    #[test]
    fn test_config_section_and_closure() {
        let root = json!({ "Logging": { "Outputs": [ { "Path": "json/" } ] } });
        let builder = LoggerFactoryBuilder::new()
            .add_info_output("code/")
            .from_config_section(&root, "Logging")
            .configure(|cfg| cfg.retention_days = 30);

        assert_eq!(builder.config().outputs.len(), 2);
        assert_eq!(builder.config().outputs[1].path, "json/");
        assert_eq!(builder.config().retention_days, 30);
    }
}
