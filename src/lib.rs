//! # Token Logger
//!
//! A synchronous logging facade with swappable backends, correlation tokens
//! and scoped silencing.
//!
//! ## Features
//!
//! - **Backends**: append-only file or stream, in-memory buffer, host system log
//! - **Call sites**: every line carries the `file:line` of the code that logged it
//! - **Tokens**: tag lines with a unit-of-work id; save and restore it around sub-contexts
//! - **Silencing**: raise the threshold for a scope, restored on every exit path
//!
//! ```
//! use token_logger::prelude::*;
//!
//! let logger = Logger::builder()
//!     .progname("importer")
//!     .backend("buffer")
//!     .build();
//!
//! logger.set_token("batch-7");
//! logger.silence(|| logger.info("noisy detail"));
//! logger.warn("3 rows skipped");
//!
//! let out = logger.buffer().unwrap();
//! assert!(!out.contains("noisy detail"));
//! assert!(out.contains("[batch-7] "));
//! assert!(out.contains("3 rows skipped"));
//! ```

pub mod backends;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::backends::{BufferBackend, StandardBackend, SyslogBackend};
    pub use crate::core::{
        Backend, BackendKind, BackendSpec, Exception, LineFormat, LogEntry, LogLevel, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, Result, SharedLogger, SilenceGuard,
        TimestampFormat,
    };
}

pub use backends::{BufferBackend, StandardBackend, SyslogBackend};
pub use core::{
    set_silencer_enabled, silencer_enabled, Backend, BackendKind, BackendSpec, Exception,
    LineFormat, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, Result,
    SharedLogger, SilenceGuard, TimestampFormat,
};
