//! The composite logger factory

use super::composite::CompositeLogger;
use super::sink::SinkEndpoint;
use super::traits::{Logger, LoggerFactory, LoggerProvider};
use crate::cleanup::RetentionCleanupService;
use crate::config::settings::LoggerConfig;
use crate::core::error::Result;
use crate::core::metrics::LoggerMetrics;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Factory whose loggers fan out to every configured sink
///
/// Built from a `LoggerConfig`: one rolling file sink per output (or a
/// single default output under `logs/` when none is configured), then the
/// console sink when enabled, plus a retention cleanup service when
/// `retention_days > 0`.
///
/// # Examples
///
/// ```no_run
/// use rust_logger_composite::{CompositeLoggerFactory, LoggerConfig, LoggerExt, LoggerFactory};
///
/// let factory = CompositeLoggerFactory::build(LoggerConfig::default()).unwrap();
/// let logger = factory.create_logger("app::main");
/// logger.info("started");
/// factory.dispose();
/// ```
pub struct CompositeLoggerFactory {
    endpoints: Vec<Arc<dyn LoggerFactory>>,
    cleanup: Option<RetentionCleanupService>,
    config: Option<Arc<LoggerConfig>>,
    metrics: Arc<LoggerMetrics>,
    disposed: AtomicBool,
}

impl CompositeLoggerFactory {
    /// Compose arbitrary sink factories, in fan-out order
    pub fn new(endpoints: Vec<Arc<dyn LoggerFactory>>) -> Self {
        Self {
            endpoints,
            cleanup: None,
            config: None,
            metrics: Arc::new(LoggerMetrics::new()),
            disposed: AtomicBool::new(false),
        }
    }

    /// Attach a cleanup service, disposed before the sinks
    #[must_use]
    pub fn with_cleanup(mut self, service: RetentionCleanupService) -> Self {
        self.cleanup = Some(service);
        self
    }

    /// # Errors
    ///
    /// Returns error if an output has an inverted level range or a sink
    /// cannot be opened. Sinks opened before the failure are released.
    pub fn build(config: LoggerConfig) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config.resolved());

        let mut endpoints: Vec<Arc<dyn LoggerFactory>> = Vec::with_capacity(config.outputs.len() + 1);
        for output in &config.outputs {
            endpoints.push(Arc::new(SinkEndpoint::file(output, &config)?));
        }
        if config.console_enabled {
            endpoints.push(Arc::new(SinkEndpoint::console(&config)));
        }

        let mut factory = Self::new(endpoints);
        if config.retention_days > 0 {
            factory = factory.with_cleanup(RetentionCleanupService::start(Arc::clone(&config)));
        }
        factory.config = Some(config);
        Ok(factory)
    }

    /// Console-only factory that touches no files
    pub(crate) fn console_only(config: &LoggerConfig) -> Self {
        let mut factory = Self::new(vec![Arc::new(SinkEndpoint::console(config))]);
        factory.config = Some(Arc::new(config.clone()));
        factory
    }

    /// Counters shared by every composite logger of this factory
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn cleanup_service(&self) -> Option<&RetentionCleanupService> {
        self.cleanup.as_ref()
    }

    /// Effective configuration, for factories created by `build`
    pub fn config(&self) -> Option<&LoggerConfig> {
        self.config.as_deref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl LoggerFactory for CompositeLoggerFactory {
    fn create_logger(&self, category: &str) -> Arc<dyn Logger> {
        let loggers = if self.is_disposed() {
            Vec::new()
        } else {
            self.endpoints
                .iter()
                .map(|endpoint| endpoint.create_logger(category))
                .collect()
        };
        Arc::new(CompositeLogger::new(category, loggers, Arc::clone(&self.metrics)))
    }

    fn add_provider(&self, provider: Arc<dyn LoggerProvider>) {
        for endpoint in &self.endpoints {
            endpoint.add_provider(Arc::clone(&provider));
        }
    }

    fn flush(&self) {
        for endpoint in &self.endpoints {
            endpoint.flush();
        }
    }

    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(cleanup) = &self.cleanup {
            cleanup.dispose();
        }
        for endpoint in &self.endpoints {
            endpoint.dispose();
        }
    }
}

impl Drop for CompositeLoggerFactory {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::output::OutputConfig;
    use crate::core::log_level::LogLevel;
    use crate::logging::traits::LoggerExt;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use tempfile::tempdir;

    fn read_all_logs(dir: &Path) -> String {
        let mut content = String::new();
        for entry in fs::read_dir(dir).unwrap().filter_map(|e| e.ok()) {
            if entry.path().extension().is_some_and(|ext| ext == "log") {
                content.push_str(&fs::read_to_string(entry.path()).unwrap());
            }
        }
        content
    }

    fn output_in(dir: &Path, sub: &str) -> OutputConfig {
        OutputConfig::new(format!("{}/{}/", dir.display(), sub))
    }

    #[test]
    fn test_fan_out_by_level_range() {
        let dir = tempdir().unwrap();
        let config = LoggerConfig {
            outputs: vec![
                output_in(dir.path(), "trace").with_levels(LogLevel::Trace, Some(LogLevel::Debug)),
                output_in(dir.path(), "info").with_levels(LogLevel::Info, None),
            ],
            ..LoggerConfig::default()
        };

        let factory = CompositeLoggerFactory::build(config).unwrap();
        assert_eq!(factory.endpoint_count(), 2);

        let logger = factory.create_logger("app::orders");
        logger.debug("debug detail");
        logger.warn("low stock");
        factory.dispose();

        let trace = read_all_logs(&dir.path().join("trace"));
        let info = read_all_logs(&dir.path().join("info"));
        assert!(trace.contains("debug detail"));
        assert!(!trace.contains("low stock"));
        assert!(info.contains("low stock"));
        assert!(!info.contains("debug detail"));
    }

    #[test]
    fn test_inverted_range_fails_build() {
        let dir = tempdir().unwrap();
        let config = LoggerConfig {
            outputs: vec![output_in(dir.path(), "bad").with_levels(LogLevel::Error, Some(LogLevel::Info))],
            ..LoggerConfig::default()
        };
        assert!(CompositeLoggerFactory::build(config).is_err());
    }

    #[test]
    fn test_console_is_last_endpoint() {
        let dir = tempdir().unwrap();
        let config = LoggerConfig {
            outputs: vec![output_in(dir.path(), "a")],
            console_enabled: true,
            ..LoggerConfig::default()
        };
        let factory = CompositeLoggerFactory::build(config).unwrap();
        assert_eq!(factory.endpoint_count(), 2);
        assert!(factory.cleanup_service().is_none());
    }

    #[test]
    fn test_retention_attaches_cleanup_service() {
        let dir = tempdir().unwrap();
        let config = LoggerConfig {
            outputs: vec![output_in(dir.path(), "a")],
            retention_days: 3,
            background_cleanup_enabled: false,
            ..LoggerConfig::default()
        };
        let factory = CompositeLoggerFactory::build(config).unwrap();
        let cleanup = factory.cleanup_service().unwrap();
        assert_eq!(cleanup.passes_run(), 1);
    }

    #[test]
    fn test_dispose_twice_and_create_after() {
        let dir = tempdir().unwrap();
        let config = LoggerConfig {
            outputs: vec![output_in(dir.path(), "a")],
            ..LoggerConfig::default()
        };
        let factory = CompositeLoggerFactory::build(config).unwrap();
        factory.dispose();
        factory.dispose();

        assert!(factory.is_disposed());
        let logger = factory.create_logger("late");
        assert!(!logger.is_enabled(LogLevel::Critical));
    }

    struct CountingProvider {
        created: Arc<AtomicUsize>,
    }

    impl LoggerProvider for CountingProvider {
        fn create_logger(&self, _category: &str) -> Arc<dyn Logger> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Arc::new(CompositeLogger::new("inner", Vec::new(), Arc::new(LoggerMetrics::new())))
        }
    }

    #[test]
    fn test_add_provider_reaches_every_endpoint() {
        let dir = tempdir().unwrap();
        let config = LoggerConfig {
            outputs: vec![output_in(dir.path(), "a"), output_in(dir.path(), "b")],
            async_buffer: None,
            ..LoggerConfig::default()
        };
        let factory = CompositeLoggerFactory::build(config).unwrap();
        let created = Arc::new(AtomicUsize::new(0));
        factory.add_provider(Arc::new(CountingProvider {
            created: Arc::clone(&created),
        }));

        let _logger = factory.create_logger("app");
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }
}
