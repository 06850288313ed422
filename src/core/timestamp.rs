//! Timestamp formatting utilities
//!
//! Every format renders at microsecond precision, whatever the resolution of
//! the host clock.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format options for formatted lines
///
/// # Examples
///
/// ```
/// use token_logger::core::TimestampFormat;
/// use chrono::Utc;
///
/// let timestamp = TimestampFormat::Iso8601Micros.format(&Utc::now());
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 in UTC: `2025-01-08T10:30:45.123456Z`
    #[default]
    Iso8601Micros,

    /// Local time with offset: `2025-01-08T11:30:45.123456+01:00`
    LocalMicros,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::LocalMicros => datetime
                .with_timezone(&Local)
                .format("%Y-%m-%dT%H:%M:%S%.6f%:z")
                .to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
        }
    }

    /// Get a description of this format
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            TimestampFormat::Iso8601Micros => {
                "ISO 8601 UTC with microseconds (2025-01-08T10:30:45.123456Z)"
            }
            TimestampFormat::LocalMicros => {
                "Local time with microseconds (2025-01-08T11:30:45.123456+01:00)"
            }
            TimestampFormat::UnixMicros => "Unix timestamp in microseconds (1736332245123456)",
        }
    }
}
