//! Sink endpoints: one filtered destination of the composite factory
//!
//! A `SinkEndpoint` pairs a `SinkFilter` with the providers that write for
//! it. File and console endpoints use an `AppenderProvider`, which feeds a
//! `Dispatcher` owning the actual appender.

use super::filter::{CategoryFilter, SinkFilter};
use super::traits::{Logger, LoggerFactory, LoggerProvider, ScopeGuard};
use crate::appenders::{ConsoleAppender, RollingFileAppender};
use crate::config::output::OutputConfig;
use crate::config::settings::LoggerConfig;
use crate::core::dispatcher::{Dispatcher, DEFAULT_SHUTDOWN_TIMEOUT};
use crate::core::error::Result;
use crate::core::log_context::{LogContext, ScopeStack};
use crate::core::log_entry::LogEntry;
use crate::core::log_level::LogLevel;
use crate::core::record::Record;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Provider writing through a `Dispatcher`
///
/// Loggers created by one provider share its scope stack, so a scope opened
/// through any of them shows up on records of all of them (same thread).
pub struct AppenderProvider {
    dispatcher: Arc<Dispatcher>,
    scopes: Arc<ScopeStack>,
}

impl AppenderProvider {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            scopes: Arc::new(ScopeStack::new()),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl LoggerProvider for AppenderProvider {
    fn create_logger(&self, category: &str) -> Arc<dyn Logger> {
        Arc::new(AppenderLogger {
            category: Arc::from(category),
            dispatcher: Arc::clone(&self.dispatcher),
            scopes: Arc::clone(&self.scopes),
        })
    }

    fn flush(&self) {
        if let Err(e) = self.dispatcher.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush sink '{}': {}", self.dispatcher.name(), e);
        }
    }

    fn dispose(&self) {
        self.dispatcher.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

pub struct AppenderLogger {
    category: Arc<str>,
    dispatcher: Arc<Dispatcher>,
    scopes: Arc<ScopeStack>,
}

impl Logger for AppenderLogger {
    fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && !self.dispatcher.is_closed()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.is_enabled(record.level()) {
            return;
        }
        let entry = LogEntry::from_record(Arc::clone(&self.category), record).with_scopes(self.scopes.current());
        self.dispatcher.dispatch(entry);
    }

    fn begin_scope(&self, context: LogContext) -> ScopeGuard {
        let id = self.scopes.push(context);
        let scopes = Arc::clone(&self.scopes);
        ScopeGuard::on_release(move || scopes.remove(id))
    }
}

/// A category logger of one sink: its resolved filter over one logger per provider
pub struct SinkLogger {
    filter: CategoryFilter,
    loggers: Vec<Arc<dyn Logger>>,
}

impl SinkLogger {
    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }
}

impl Logger for SinkLogger {
    fn is_enabled(&self, level: LogLevel) -> bool {
        self.filter.allows(level) && self.loggers.iter().any(|logger| logger.is_enabled(level))
    }

    fn log(&self, record: &Record<'_>) {
        if !self.filter.allows(record.level()) {
            return;
        }
        for logger in &self.loggers {
            logger.log(record);
        }
    }

    fn begin_scope(&self, context: LogContext) -> ScopeGuard {
        match self.loggers.as_slice() {
            [] => ScopeGuard::noop(),
            [logger] => logger.begin_scope(context),
            loggers => ScopeGuard::composite(
                loggers
                    .iter()
                    .map(|logger| logger.begin_scope(context.clone()))
                    .collect(),
            ),
        }
    }
}

/// One destination of the composite factory
pub struct SinkEndpoint {
    name: String,
    filter: SinkFilter,
    providers: RwLock<Vec<Arc<dyn LoggerProvider>>>,
    disposed: AtomicBool,
}

impl SinkEndpoint {
    pub fn new(name: impl Into<String>, filter: SinkFilter, provider: Arc<dyn LoggerProvider>) -> Self {
        Self {
            name: name.into(),
            filter,
            providers: RwLock::new(vec![provider]),
            disposed: AtomicBool::new(false),
        }
    }

    /// Rolling file sink for `output`, falling back to the global rolling settings
    ///
    /// # Errors
    ///
    /// Returns error if the output is invalid or its directory or file cannot be opened
    pub fn file(output: &OutputConfig, global: &LoggerConfig) -> Result<Self> {
        output.validate()?;

        let interval = output.rolling_interval.unwrap_or(global.global_rolling_interval);
        let size_kb = output.rolling_size_kb.unwrap_or(global.global_rolling_size_kb);
        let appender = RollingFileAppender::new(output.path.clone(), interval, size_kb)?;

        let name = format!("file:{}", output.path);
        let dispatcher = match global.async_buffer {
            Some(capacity) => Dispatcher::asynchronous(
                name.clone(),
                vec![Box::new(appender)],
                capacity,
                global.overflow_policy.clone(),
            )?,
            None => Dispatcher::synchronous(name.clone(), vec![Box::new(appender)]),
        };

        Ok(Self::new(
            name,
            SinkFilter::for_output(output, global),
            Arc::new(AppenderProvider::new(dispatcher)),
        ))
    }

    /// Console sink; writes synchronously so lines appear in call order
    pub fn console(global: &LoggerConfig) -> Self {
        let appender = ConsoleAppender::new()
            .with_details(global.console_detailed)
            .with_colors(global.console_colors);
        let dispatcher = Dispatcher::synchronous("console", vec![Box::new(appender)]);

        Self::new(
            "console",
            SinkFilter::for_console(global),
            Arc::new(AppenderProvider::new(dispatcher)),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filter(&self) -> &SinkFilter {
        &self.filter
    }

    pub fn provider_count(&self) -> usize {
        self.providers.read().len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl LoggerFactory for SinkEndpoint {
    fn create_logger(&self, category: &str) -> Arc<dyn Logger> {
        let loggers = if self.is_disposed() {
            Vec::new()
        } else {
            self.providers
                .read()
                .iter()
                .map(|provider| provider.create_logger(category))
                .collect()
        };

        Arc::new(SinkLogger {
            filter: self.filter.resolve(category),
            loggers,
        })
    }

    fn add_provider(&self, provider: Arc<dyn LoggerProvider>) {
        if self.is_disposed() {
            return;
        }
        self.providers.write().push(provider);
    }

    fn flush(&self) {
        for provider in self.providers.read().iter() {
            provider.flush();
        }
    }

    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        for provider in self.providers.read().iter() {
            provider.dispose();
        }
    }
}
