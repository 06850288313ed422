//! Exception rendering for [`Logger::exception`](super::Logger::exception)

use super::call_site::{self, Frame, SourceMarker};
use super::error::LoggerError;
use std::backtrace::Backtrace;
use std::error::Error;

pub(crate) const SOURCE: SourceMarker = SourceMarker::new(file!(), module_path!());

/// What can be handed to [`Logger::exception`](super::Logger::exception)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exception {
    /// A structured error. Without explicit frames, the stack at the moment of
    /// logging is used.
    Error {
        message: String,
        frames: Option<Vec<Frame>>,
    },
    /// Logged as-is
    Message(String),
}

impl Exception {
    /// Message is the error's display text followed by its `source()` chain
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Exception::Error {
            message,
            frames: None,
        }
    }

    /// Use a backtrace captured earlier, typically where the error was created
    #[must_use]
    pub fn with_backtrace(self, backtrace: &Backtrace) -> Self {
        self.with_frames(call_site::parse_backtrace(&backtrace.to_string()))
    }

    #[must_use]
    pub fn with_frames(self, frames: Vec<Frame>) -> Self {
        match self {
            Exception::Error { message, .. } => Exception::Error {
                message,
                frames: Some(frames),
            },
            message => message,
        }
    }

    /// `EXCEPTION: <message>: <frames>` with the facade's own frames removed;
    /// plain messages render unchanged.
    pub fn render(&self) -> String {
        match self {
            Exception::Message(message) => message.clone(),
            Exception::Error { message, frames } => {
                let frames = match frames {
                    Some(frames) => call_site::filter_frames(frames.clone()),
                    None => call_site::filter_frames(call_site::capture_frames()),
                };
                if frames.is_empty() {
                    return format!("EXCEPTION: {}", message);
                }
                let trace: Vec<String> = frames.iter().map(Frame::to_string).collect();
                format!("EXCEPTION: {}: {}", message, trace.join(" | "))
            }
        }
    }
}

impl From<&str> for Exception {
    fn from(message: &str) -> Self {
        Exception::Message(message.to_string())
    }
}

impl From<String> for Exception {
    fn from(message: String) -> Self {
        Exception::Message(message)
    }
}

impl From<&(dyn Error + 'static)> for Exception {
    fn from(err: &(dyn Error + 'static)) -> Self {
        Exception::from_error(err)
    }
}

impl From<&(dyn Error + Send + Sync + 'static)> for Exception {
    fn from(err: &(dyn Error + Send + Sync + 'static)) -> Self {
        Exception::from_error(err)
    }
}

impl From<Box<dyn Error + Send + Sync>> for Exception {
    fn from(err: Box<dyn Error + Send + Sync>) -> Self {
        Exception::from_error(err.as_ref())
    }
}

impl From<std::io::Error> for Exception {
    fn from(err: std::io::Error) -> Self {
        Exception::from_error(&err)
    }
}

impl From<LoggerError> for Exception {
    fn from(err: LoggerError) -> Self {
        Exception::from_error(&err)
    }
}
