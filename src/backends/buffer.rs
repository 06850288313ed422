//! In-memory buffering backend

use crate::core::{Backend, BackendKind, LineFormat, LogEntry, LogLevel, Result};

/// Retains every emitted line, in order, in an append-only byte buffer.
///
/// # Example
///
/// ```
/// use token_logger::backends::BufferBackend;
/// use token_logger::core::{Backend, LogEntry, LogLevel};
///
/// let mut backend = BufferBackend::new();
/// backend.add(&LogEntry::new(LogLevel::Info, "queued", "app")).unwrap();
/// assert!(backend.contents().contains("[INFO] queued"));
/// ```
#[derive(Debug, Default)]
pub struct BufferBackend {
    buffer: Vec<u8>,
    level: LogLevel,
    format: Option<LineFormat>,
}

impl BufferBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Everything emitted so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Backend for BufferBackend {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let line = match &self.format {
            Some(format) => format.render(entry),
            None => LineFormat::global().render(entry),
        };
        self.buffer.extend_from_slice(line.as_bytes());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "buffer"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Buffer
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn buffer(&self) -> Option<&[u8]> {
        Some(&self.buffer)
    }
}
