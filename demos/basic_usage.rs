//! Basic logger usage example
//!
//! Logs to standard error at every level, then raises the threshold.
//!
//! Run with: cargo run --example basic_usage

use token_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Token Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .progname("basic_usage")
        .backend(BackendSpec::sink(StandardBackend::stderr()))
        .build();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.fatal("This is a fatal message");
    logger.unknown("This is an unknown-severity message");

    println!("\n2. Threshold set by name to INFO - debug won't show:");
    logger.set_level_named("info")?;
    logger.debug("Debug message (hidden)");
    logger.info("Info message (visible)");

    println!("\n3. Unknown severity names are rejected:");
    if let Err(e) = logger.log_named("verbose", "never logged") {
        println!("   {}", e);
    }

    println!("\n4. Errors with their cause chain:");
    let err = std::fs::read_to_string("/definitely/not/here").unwrap_err();
    logger.exception(err);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
