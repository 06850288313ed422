//! Logger facade and its leaf components

pub mod backend;
pub mod call_site;
pub mod config;
pub mod error;
pub mod exception;
pub mod formatter;
pub mod global;
pub mod io_shim;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod silence;
pub mod timestamp;
pub mod token;

pub use backend::{Backend, BackendKind, BackendSpec};
pub use call_site::{Frame, UNKNOWN_CALL_SITE};
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use exception::Exception;
pub use formatter::{LineFormat, DEFAULT_TEMPLATE};
pub use global::SharedLogger;
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_LOG_DIR};
pub use silence::{set_silencer_enabled, silencer_enabled, SilenceGuard};
pub use timestamp::TimestampFormat;
pub use token::{ObjectId, TokenKey, TokenStore};
