//! Logging macros with `format!`-style arguments.
//!
//! The macros expand to a direct call on the logger, so the call site
//! reported is the macro invocation.
//!
//! # Examples
//!
//! ```
//! use token_logger::prelude::*;
//! use token_logger::{info, warn};
//!
//! let logger = Logger::builder().backend("buffer").build();
//!
//! let port = 8080;
//! info!(logger, "listening on port {}", port);
//! warn!(logger, "{} connections refused", 3);
//!
//! assert!(logger.buffer().unwrap().contains("listening on port 8080"));
//! ```

/// Log a formatted message at the given level.
///
/// ```
/// # use token_logger::prelude::*;
/// # let logger = Logger::builder().backend("buffer").build();
/// use token_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log at fatal level. Does not abort the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Log at the catch-all `unknown` level, emitted at any threshold.
#[macro_export]
macro_rules! unknown {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Unknown, $($arg)+)
    };
}
