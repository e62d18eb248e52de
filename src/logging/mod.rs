//! Composite logging: traits, per-sink filters, sink endpoints and the fan-out factory

pub mod composite;
pub mod factory;
pub mod filter;
pub mod sink;
pub mod traits;

pub use composite::CompositeLogger;
pub use factory::CompositeLoggerFactory;
pub use filter::{CategoryFilter, CategoryRule, LevelRange, SinkFilter};
pub use sink::{AppenderLogger, AppenderProvider, SinkEndpoint, SinkLogger};
pub use traits::{Logger, LoggerExt, LoggerFactory, LoggerProvider, ScopeGuard, TypedLogger};
