//! File logging example
//!
//! Writes to an explicit file, then to the default `<log_dir>/<progname>.log`,
//! and shows the fallback for an unwritable path.
//!
//! Run with: cargo run --example file_logging

use std::fs;
use token_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Token Logger - File Logging Example ===\n");

    let dir = std::env::temp_dir().join("token_logger_demo");
    let explicit = dir.join("explicit/app.log");

    println!("1. Explicit path: {}", explicit.display());
    let logger = Logger::builder()
        .progname("file_logging")
        .backend(explicit.clone())
        .build();
    logger.info("Application started");
    logger.warn("Low disk space");
    logger.flush()?;

    println!("\n2. Default file under the configured log directory:");
    let config = LoggerConfig::from_json(&format!(
        r#"{{"progname": "file_logging", "level": "warn", "log_dir": {:?}}}"#,
        dir.join("log")
    ))?;
    let defaulted = config.build()?;
    defaulted.info("Below threshold (hidden)");
    defaulted.error("Written to the default file");
    defaulted.flush()?;
    println!("   {}", defaulted.default_log_path().display());

    println!("\n3. Unwritable path falls back to stderr:");
    let fallback = Logger::builder()
        .backend("/proc/forbidden/app.log")
        .build();
    fallback.warn("Delivered on stderr");
    println!("   backend in use: {}", fallback.backend_name());

    println!("\n4. File contents:");
    for path in [explicit, defaulted.default_log_path()] {
        println!("--- {} ---", path.display());
        print!("{}", fs::read_to_string(&path)?);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
