//! Logger configuration: outputs, global settings, JSON sections and the builder

pub mod builder;
pub mod output;
pub mod rotation;
pub mod section;
pub mod settings;

pub use builder::LoggerFactoryBuilder;
pub use output::OutputConfig;
pub use rotation::RotationInterval;
pub use section::DEFAULT_SECTION;
pub use settings::{LoggerConfig, DEFAULT_LOG_PATH};
