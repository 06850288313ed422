//! Standard backend: a file or a process stream

use crate::core::{Backend, BackendKind, LineFormat, LogEntry, LogLevel, LoggerError, Result};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

/// Where a [`StandardBackend`] writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Stderr,
    Stdout,
    /// Caller-supplied writer
    Stream(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::File(path) => write!(f, "{}", path.display()),
            Target::Stderr => f.write_str("stderr"),
            Target::Stdout => f.write_str("stdout"),
            Target::Stream(name) => f.write_str(name),
        }
    }
}

pub struct StandardBackend {
    writer: Option<Box<dyn Write + Send>>,
    target: Target,
    level: LogLevel,
    format: Option<LineFormat>,
}

impl StandardBackend {
    /// Append to `path`, creating parent directories.
    ///
    /// Never fails: when the file cannot be opened the backend writes to
    /// standard error instead and says so there, once.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_open(&path) {
            Ok(backend) => backend,
            Err(e) => {
                eprintln!(
                    "[LOGGER WARNING] Cannot log to '{}' ({}); logging to stderr instead",
                    path.display(),
                    e
                );
                Self::stderr()
            }
        }
    }

    pub fn try_open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "creating log directory",
                    parent.display().to_string(),
                    e,
                )
            })?;
        }
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| LoggerError::file_backend(path.display().to_string(), e.to_string()))?;

        Ok(Self::with_writer(
            Box::new(LineWriter::new(file)),
            Target::File(path.to_path_buf()),
        ))
    }

    pub fn stderr() -> Self {
        Self::with_writer(Box::new(io::stderr()), Target::Stderr)
    }

    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()), Target::Stdout)
    }

    /// Write to any stream, e.g. a socket or a pipe
    pub fn from_writer(writer: impl Write + Send + 'static, name: impl Into<String>) -> Self {
        Self::with_writer(Box::new(writer), Target::Stream(name.into()))
    }

    fn with_writer(writer: Box<dyn Write + Send>, target: Target) -> Self {
        Self {
            writer: Some(writer),
            target,
            level: LogLevel::default(),
            format: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Use `format` instead of the process-wide line format
    #[must_use]
    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }
}

impl Backend for StandardBackend {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer(format!("{} is closed", self.target)))?;

        let line = match &self.format {
            Some(format) => format.render(entry),
            None => LineFormat::global().render(entry),
        };
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.target {
            Target::File(_) => "file",
            Target::Stderr => "stderr",
            Target::Stdout => "stdout",
            Target::Stream(ref name) => name,
        }
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Standard
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn close(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(mut writer) => Ok(writer.flush()?),
            None => Ok(()),
        }
    }
}

impl Drop for StandardBackend {
    fn drop(&mut self) {
        // Ensure all buffered data reaches the target
        let _ = self.flush();
    }
}
