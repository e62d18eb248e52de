//! Basic composite factory usage
//!
//! Demonstrates console output, level shortcuts, scopes and the logging macros.
//!
//! Run with: cargo run --example basic_usage

use rust_logger_composite::prelude::*;
use rust_logger_composite::{info, warn};

struct CheckoutService;

fn main() -> Result<()> {
    println!("=== Rust Logger Composite - Basic Usage Example ===\n");

    // Console only: one error-level file sink keeps the file side quiet
    let factory = LoggerFactoryBuilder::new()
        .add_error_output("logs/error/")
        .with_console()
        .with_console_details()
        .build()?;

    println!("1. Logging at different levels:");
    let logger = factory.create_logger("demo::basic");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.critical("This is a critical message");

    println!("\n2. Scopes are appended to every line logged inside them:");
    {
        let _scope = logger.begin_scope(LogContext::new().with_field("order_id", 1042).with_field("user", "ada"));
        info!(logger, "Cart contains {} items", 3);
        warn!(logger, "Coupon {} expired", "SPRING");
    }
    logger.info("Outside the scope again");

    println!("\n3. Typed loggers use the type name as category:");
    let typed = TypedLogger::<CheckoutService>::new(&factory);
    typed.info("Checkout started");

    factory.dispose();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
