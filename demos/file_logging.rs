//! File logging example
//!
//! Demonstrates the three-tier file layout with per-sink level ranges,
//! category filters, size rolling and retention cleanup.
//!
//! Run with: cargo run --example file_logging

use rust_logger_composite::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Logger Composite - File Logging Example ===\n");

    let factory = LoggerFactoryBuilder::new()
        .add_trace_output("logs/trace/")
        .add_info_output("logs/")
        .add_error_output("logs/error/")
        .with_rolling_interval(RotationInterval::Day)
        .with_rolling_size_kb(512)
        // Database chatter only from Warn upwards, except in the trace files
        .with_filter("demo::db", LogLevel::Warn)
        .with_retention_days(14)
        .with_cleanup_interval(Duration::from_secs(6 * 60 * 60))
        .build()?;

    println!("1. Logging through every sink:");
    let app = factory.create_logger("demo::app");
    let db = factory.create_logger("demo::db");

    app.info("Application started");
    app.debug("Loading configuration...");
    db.debug("Opening connection pool");
    db.warn("Pool size below recommended minimum");
    app.error("Failed to load optional plugin");

    println!("2. Performing some operations:");
    for i in 1..=5 {
        app.info(format!("Processing item {}/5", i));
    }

    if let Some(cleanup) = factory.cleanup_service() {
        println!("3. Retention cleanup removed {} old files", cleanup.files_deleted());
    }

    factory.dispose();

    println!("\n=== Example completed successfully! ===");
    println!("Check 'logs/', 'logs/trace/' and 'logs/error/' for the output");

    Ok(())
}
