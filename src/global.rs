//! Process-wide default factory
//!
//! The default factory is built once, on first use, from the default
//! configuration. [`set_default_config`] and [`configure_defaults`] change
//! that configuration and only have an effect before the first use.
//!
//! [`set_factory`] installs an override that [`factory`] returns instead of
//! the default. It is meant to be called once during startup: replacing the
//! override while other threads log is a last-writer-wins race, and loggers
//! already handed out keep writing to the factory they came from.

use crate::config::builder::LoggerFactoryBuilder;
use crate::config::settings::LoggerConfig;
use crate::core::error::Result;
use crate::logging::factory::CompositeLoggerFactory;
use crate::logging::traits::{Logger, LoggerFactory, TypedLogger};
use parking_lot::{const_rwlock, RwLock};
use serde_json::Value;
use std::sync::{Arc, OnceLock};

static DEFAULT_CONFIG: RwLock<Option<LoggerConfig>> = const_rwlock(None);
static DEFAULT_FACTORY: OnceLock<Arc<CompositeLoggerFactory>> = OnceLock::new();
static OVERRIDE: RwLock<Option<Arc<dyn LoggerFactory>>> = const_rwlock(None);

fn default_factory() -> &'static Arc<CompositeLoggerFactory> {
    DEFAULT_FACTORY.get_or_init(|| {
        let config = DEFAULT_CONFIG.read().clone().unwrap_or_default();
        match CompositeLoggerFactory::build(config.clone()) {
            Ok(factory) => Arc::new(factory),
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] Failed to build the default logger factory: {}. \
                     Falling back to console output.",
                    e
                );
                Arc::new(CompositeLoggerFactory::console_only(&config))
            }
        }
    })
}

/// Whether the default factory has been built
pub fn is_initialized() -> bool {
    DEFAULT_FACTORY.get().is_some()
}

/// The override if one is installed, otherwise the default factory
pub fn factory() -> Arc<dyn LoggerFactory> {
    if let Some(factory) = OVERRIDE.read().as_ref() {
        return Arc::clone(factory);
    }
    Arc::clone(default_factory()) as Arc<dyn LoggerFactory>
}

/// Install `factory` as the process-wide factory, returning the previous override
///
/// The replaced factory is not disposed.
pub fn set_factory(factory: Arc<dyn LoggerFactory>) -> Option<Arc<dyn LoggerFactory>> {
    OVERRIDE.write().replace(factory)
}

/// Remove the override, returning it
pub fn clear_factory() -> Option<Arc<dyn LoggerFactory>> {
    OVERRIDE.write().take()
}

/// Replace the configuration the default factory will be built from
///
/// Returns `false` if the default factory already exists; the configuration
/// is stored anyway but will not be used.
pub fn set_default_config(config: LoggerConfig) -> bool {
    *DEFAULT_CONFIG.write() = Some(config);
    !is_initialized()
}

/// Edit the configuration the default factory will be built from
///
/// Same return value as [`set_default_config`].
pub fn configure_defaults(configure: impl FnOnce(&mut LoggerConfig)) -> bool {
    let mut guard = DEFAULT_CONFIG.write();
    configure(guard.get_or_insert_with(LoggerConfig::default));
    !is_initialized()
}

/// Build a standalone factory; the process-wide state is not touched
///
/// # Errors
///
/// Returns error if an output is invalid or a sink cannot be opened
pub fn create_factory_with_config(config: LoggerConfig) -> Result<CompositeLoggerFactory> {
    CompositeLoggerFactory::build(config)
}

/// Build a standalone factory from the JSON section at `section`
///
/// # Errors
///
/// Returns error if `json` is malformed, an output is invalid or a sink
/// cannot be opened
pub fn create_factory_from_json(json: &str, section: &str) -> Result<CompositeLoggerFactory> {
    CompositeLoggerFactory::build(LoggerConfig::from_json_str(json, section)?)
}

/// Build a standalone factory from an already parsed JSON document
///
/// # Errors
///
/// Returns error if an output is invalid or a sink cannot be opened
pub fn create_factory_from_value(root: &Value, section: &str) -> Result<CompositeLoggerFactory> {
    CompositeLoggerFactory::build(LoggerConfig::from_json_section(root, section))
}

/// Build `builder` and install the result with [`set_factory`]
///
/// # Errors
///
/// Returns the build error; the current factory stays in place
pub fn install(builder: LoggerFactoryBuilder) -> Result<Arc<CompositeLoggerFactory>> {
    let factory = Arc::new(builder.build()?);
    set_factory(Arc::clone(&factory) as Arc<dyn LoggerFactory>);
    Ok(factory)
}

/// Dispose the override and, if it was built, the default factory
///
/// Statics are never dropped, so queued entries are only guaranteed to reach
/// their files if this runs before the process exits.
pub fn shutdown() {
    if let Some(factory) = OVERRIDE.read().as_ref() {
        factory.dispose();
    }
    if let Some(factory) = DEFAULT_FACTORY.get() {
        factory.dispose();
    }
}

pub fn create_logger(category: &str) -> Arc<dyn Logger> {
    factory().create_logger(category)
}

/// Logger categorized by the type name of `T`
pub fn get<T: ?Sized>() -> TypedLogger<T> {
    TypedLogger::new(&*factory())
}
