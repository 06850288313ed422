//! Backend trait and backend selection values

use super::{
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A concrete sink that persists or transmits formatted lines.
///
/// The threshold lives in the backend: [`Backend::add`] suppresses entries
/// below [`Backend::level`] and hands the rest to [`Backend::append`].
pub trait Backend: Send {
    /// Format and write one entry, regardless of the threshold
    fn append(&mut self, entry: &LogEntry) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    fn name(&self) -> &str;

    fn kind(&self) -> BackendKind;

    fn level(&self) -> LogLevel;

    fn set_level(&mut self, level: LogLevel);

    /// Write `entry` if it passes the threshold. Returns whether it was written.
    fn add(&mut self, entry: &LogEntry) -> Result<bool> {
        if entry.level < self.level() {
            return Ok(false);
        }
        self.append(entry)?;
        Ok(true)
    }

    /// Release the sink. Further appends may fail.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    /// Accumulated bytes, for backends that retain their output
    fn buffer(&self) -> Option<&[u8]> {
        None
    }
}

/// Kinds of backend the logger knows how to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// File or stream backed
    Standard,
    /// In-memory, inspectable
    Buffer,
    /// Host system log
    Syslog,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Standard => "standard",
            BackendKind::Buffer => "buffer",
            BackendKind::Syslog => "syslog",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standard" => Ok(BackendKind::Standard),
            "buffer" => Ok(BackendKind::Buffer),
            "syslog" => Ok(BackendKind::Syslog),
            _ => Err(LoggerError::config(
                "BackendKind",
                format!("unknown backend kind '{}'", s),
            )),
        }
    }
}

/// What [`Logger::set_backend`](super::Logger::set_backend) was given
///
/// Resolved once, when assigned, into an owned [`Backend`].
pub enum BackendSpec {
    /// Standard backend appending to this file
    Path(PathBuf),
    /// Constructed from defaults for the kind
    Kind(BackendKind),
    /// Used as-is
    Sink(Box<dyn Backend>),
}

impl BackendSpec {
    /// `"buffer"`, `"syslog"` and `"standard"` name a kind; any other string
    /// is a file path.
    pub fn parse(value: &str) -> Self {
        match value.parse::<BackendKind>() {
            Ok(kind) => BackendSpec::Kind(kind),
            Err(_) => BackendSpec::Path(PathBuf::from(value)),
        }
    }

    pub fn sink(backend: impl Backend + 'static) -> Self {
        BackendSpec::Sink(Box::new(backend))
    }
}

impl fmt::Debug for BackendSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendSpec::Path(path) => f.debug_tuple("Path").field(path).finish(),
            BackendSpec::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            BackendSpec::Sink(sink) => f.debug_tuple("Sink").field(&sink.name()).finish(),
        }
    }
}

impl From<&str> for BackendSpec {
    fn from(value: &str) -> Self {
        BackendSpec::parse(value)
    }
}

impl From<String> for BackendSpec {
    fn from(value: String) -> Self {
        BackendSpec::parse(&value)
    }
}

impl From<PathBuf> for BackendSpec {
    fn from(path: PathBuf) -> Self {
        BackendSpec::Path(path)
    }
}

impl From<&Path> for BackendSpec {
    fn from(path: &Path) -> Self {
        BackendSpec::Path(path.to_path_buf())
    }
}

impl From<BackendKind> for BackendSpec {
    fn from(kind: BackendKind) -> Self {
        BackendSpec::Kind(kind)
    }
}

impl From<Box<dyn Backend>> for BackendSpec {
    fn from(backend: Box<dyn Backend>) -> Self {
        BackendSpec::Sink(backend)
    }
}
