//! JSON configuration example
//!
//! Builds the factory from a `Logging` section and installs it as the
//! process-wide default.
//!
//! Run with: cargo run --example json_config

use rust_logger_composite::global;
use rust_logger_composite::prelude::*;

const SETTINGS: &str = r#"{
    "Logging": {
        "MinimumLevel": "Information",
        "GlobalRollingInterval": "Hour",
        "GlobalRollingSizeKB": 1024,
        "LogLevel": {
            "Default": "Information",
            "demo::http": "Warning"
        },
        "Outputs": [
            { "Path": "logs/json/", "MinLevel": "Debug" },
            { "Path": "logs/json/error/", "MinLevel": "Error", "UseGlobalFilters": false }
        ],
        "Console": { "Enabled": true, "Detailed": true, "MinLevel": "Information" },
        "RetentionDays": 7,
        "CleanupInterval": "06:00:00"
    }
}"#;

struct HttpServer;

fn main() -> Result<()> {
    println!("=== Rust Logger Composite - JSON Configuration Example ===\n");

    let config = LoggerConfig::from_json_str(SETTINGS, rust_logger_composite::DEFAULT_SECTION)?;
    println!("Loaded {} outputs, retention {} days", config.outputs.len(), config.retention_days);

    global::install(LoggerFactoryBuilder::from_config(config))?;

    let logger = global::create_logger("demo::jobs");
    logger.info("Scheduler started");
    logger.debug("Hidden by the Default rule");

    let http = global::get::<HttpServer>();
    http.info("Request served");

    let routes = global::create_logger("demo::http::routes");
    routes.info("Hidden by the demo::http rule");
    routes.warn("Slow route");

    global::shutdown();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
