//! Error types for the logger facade

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Severity name or ordinal that the severity model does not define
    #[error("Unknown severity: '{value}'")]
    InvalidSeverity { value: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File backend error with path
    #[error("File backend error for '{path}': {message}")]
    FileBackendError { path: String, message: String },

    /// System log integration cannot be used in this process
    #[error("System log unavailable: {0}")]
    SyslogUnavailable(String),

    /// Read-style operation attempted on the write-only logger
    #[error("Unsupported operation '{operation}': logger is write-only")]
    UnsupportedOperation { operation: &'static str },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an unknown severity error
    pub fn invalid_severity(value: impl ToString) -> Self {
        LoggerError::InvalidSeverity {
            value: value.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file backend error
    pub fn file_backend(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileBackendError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn syslog_unavailable(reason: impl Into<String>) -> Self {
        LoggerError::SyslogUnavailable(reason.into())
    }

    pub fn unsupported(operation: &'static str) -> Self {
        LoggerError::UnsupportedOperation { operation }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// True for errors caused by programmer-level misuse rather than sink trouble
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidSeverity { .. }
                | LoggerError::InvalidConfiguration { .. }
                | LoggerError::JsonError(_)
        )
    }
}

impl From<LoggerError> for std::io::Error {
    fn from(err: LoggerError) -> Self {
        match err {
            LoggerError::IoError(e) => e,
            LoggerError::UnsupportedOperation { .. } => {
                std::io::Error::new(std::io::ErrorKind::Unsupported, err)
            }
            other => std::io::Error::other(other),
        }
    }
}
