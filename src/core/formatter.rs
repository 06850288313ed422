//! Line formatter
//!
//! Turns a [`LogEntry`] into one output line. The template is process-wide:
//! every standard and buffering backend renders through
//! [`LineFormat::global`] unless it was given its own format.

use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use parking_lot::RwLock;
use std::sync::Arc;

/// Default line template: `timestamp progname(pid) [SEVERITY] message`
pub const DEFAULT_TEMPLATE: &str = "{timestamp} {progname}({pid}) [{severity}] {message}";

static GLOBAL_FORMAT: RwLock<Option<Arc<LineFormat>>> = parking_lot::const_rwlock(None);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Timestamp,
    Progname,
    Pid,
    Severity,
    Message,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "timestamp" => Some(Field::Timestamp),
            "progname" => Some(Field::Progname),
            "pid" => Some(Field::Pid),
            "severity" => Some(Field::Severity),
            "message" => Some(Field::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Field(Field),
}

/// A parsed line template plus rendering options
///
/// # Examples
///
/// ```
/// use token_logger::core::{LineFormat, LogEntry, LogLevel};
///
/// let format = LineFormat::new("[{severity}] {message}");
/// let entry = LogEntry::new(LogLevel::Warn, "disk almost full", "app");
/// assert_eq!(format.render(&entry), "[WARN] disk almost full\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    template: String,
    pieces: Vec<Piece>,
    timestamp_format: TimestampFormat,
    level_uppercase: bool,
}

impl LineFormat {
    /// Parse a template. Placeholders are `{timestamp}`, `{progname}`,
    /// `{pid}`, `{severity}` and `{message}`; anything else is kept literally.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let pieces = Self::parse(&template);
        Self {
            template,
            pieces,
            timestamp_format: TimestampFormat::default(),
            level_uppercase: true,
        }
    }

    fn parse(template: &str) -> Vec<Piece> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}').and_then(|close| Field::parse(&after[..close]).map(|f| (close, f))) {
                Some((close, field)) => {
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(Piece::Field(field));
                    rest = &after[close + 1..];
                }
                None => {
                    literal.push('{');
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        pieces
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Render severity as `WARN` (default) or as the symbolic `warn`
    #[must_use]
    pub fn with_level_uppercase(mut self, uppercase: bool) -> Self {
        self.level_uppercase = uppercase;
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.timestamp_format
    }

    /// Render one entry, newline-terminated
    #[must_use]
    pub fn render(&self, entry: &LogEntry) -> String {
        let mut line = String::with_capacity(self.template.len() + entry.message.len() + 48);
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => line.push_str(text),
                Piece::Field(Field::Timestamp) => {
                    line.push_str(&self.timestamp_format.format(&entry.timestamp))
                }
                Piece::Field(Field::Progname) => line.push_str(&entry.progname),
                Piece::Field(Field::Pid) => line.push_str(&entry.pid.to_string()),
                Piece::Field(Field::Severity) => line.push_str(if self.level_uppercase {
                    entry.level.to_str()
                } else {
                    entry.level.name()
                }),
                Piece::Field(Field::Message) => line.push_str(&entry.message),
            }
        }
        line.push('\n');
        line
    }

    /// The process-wide format
    pub fn global() -> Arc<LineFormat> {
        if let Some(format) = GLOBAL_FORMAT.read().as_ref() {
            return Arc::clone(format);
        }
        Arc::new(LineFormat::default())
    }

    /// Replace the process-wide format for every logger in the process
    pub fn set_global(format: LineFormat) {
        *GLOBAL_FORMAT.write() = Some(Arc::new(format));
    }

    pub fn reset_global() {
        *GLOBAL_FORMAT.write() = None;
    }
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}
