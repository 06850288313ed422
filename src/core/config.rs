//! Serializable logger configuration

use super::backend::BackendSpec;
use super::error::Result;
use super::log_level::LogLevel;
use super::logger::{Logger, LoggerBuilder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logger settings as they appear in an application's configuration file.
///
/// Every field is optional; missing fields keep the builder defaults.
///
/// ```
/// use token_logger::core::LoggerConfig;
///
/// let config = LoggerConfig::from_json(r#"{"progname": "worker", "level": "warn", "backend": "buffer"}"#)?;
/// let logger = config.build()?;
/// assert_eq!(logger.level(), token_logger::LogLevel::Warn);
/// # Ok::<(), token_logger::LoggerError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub progname: Option<String>,
    /// Severity name, case-insensitive
    pub level: Option<String>,
    /// `standard`, `buffer`, `syslog`, or a file path
    pub backend: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub call_site: Option<bool>,
    pub syslog_socket: Option<PathBuf>,
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// A builder carrying these settings. Fails on an unknown level name
    /// before anything is opened.
    pub fn builder(&self) -> Result<LoggerBuilder> {
        let mut builder = LoggerBuilder::new();
        if let Some(progname) = &self.progname {
            builder = builder.progname(progname.clone());
        }
        if let Some(level) = &self.level {
            builder = builder.level(level.parse::<LogLevel>()?);
        }
        if let Some(dir) = &self.log_dir {
            builder = builder.log_dir(dir.clone());
        }
        if let Some(enabled) = self.call_site {
            builder = builder.call_site(enabled);
        }
        if let Some(socket) = &self.syslog_socket {
            builder = builder.syslog_socket(socket.clone());
        }
        if let Some(backend) = &self.backend {
            builder = builder.backend(BackendSpec::parse(backend));
        }
        Ok(builder)
    }

    pub fn build(&self) -> Result<Logger> {
        Ok(self.builder()?.build())
    }
}
