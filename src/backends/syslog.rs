//! System log backend
//!
//! Uses libc `openlog`/`syslog`/`closelog` directly. The daemon stamps time,
//! ident and pid itself, so lines are rendered with [`SYSLOG_TEMPLATE`].

use crate::core::{Backend, BackendKind, LineFormat, LogEntry, LogLevel, LoggerError, Result};
use std::path::Path;

/// Line template for system log messages
pub const SYSLOG_TEMPLATE: &str = "[{severity}] {message}";

/// Sockets probed to decide whether a system log daemon is listening
pub const DEFAULT_SOCKETS: [&str; 3] = ["/dev/log", "/var/run/syslog", "/var/run/log"];

/// Forwards lines to the host system log, facility `user`, tagged with the
/// program name and the process id.
pub struct SyslogBackend {
    ident: String,
    level: LogLevel,
    format: LineFormat,
    open: bool,
}

impl SyslogBackend {
    /// Connect using the default socket locations
    pub fn connect(ident: &str) -> Result<Self> {
        Self::connect_via(ident, &DEFAULT_SOCKETS)
    }

    /// Connect if any of `sockets` exists
    pub fn connect_via<P: AsRef<Path>>(ident: &str, sockets: &[P]) -> Result<Self> {
        if !sockets.iter().any(|socket| socket.as_ref().exists()) {
            let probed: Vec<String> = sockets
                .iter()
                .map(|socket| socket.as_ref().display().to_string())
                .collect();
            return Err(LoggerError::syslog_unavailable(format!(
                "no log socket at {}",
                probed.join(", ")
            )));
        }

        platform::open(ident)?;
        Ok(Self {
            ident: ident.to_string(),
            level: LogLevel::default(),
            format: LineFormat::new(SYSLOG_TEMPLATE),
            open: true,
        })
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }
}

impl Backend for SyslogBackend {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        if !self.open {
            return Err(LoggerError::writer("syslog connection is closed"));
        }
        let line = self.format.render(entry);
        platform::send(entry.level, line.trim_end_matches('\n'));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "syslog"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Syslog
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn close(&mut self) -> Result<()> {
        if std::mem::replace(&mut self.open, false) {
            platform::close();
        }
        Ok(())
    }
}

impl Drop for SyslogBackend {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(all(unix, feature = "syslog"))]
mod platform {
    use crate::core::{LogLevel, Result};
    use parking_lot::Mutex;
    use std::ffi::{CStr, CString};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // syslog(3) keeps the ident pointer, so idents live for the process.
    static IDENTS: Mutex<Vec<&'static CStr>> = parking_lot::const_mutex(Vec::new());
    static OPEN_CONNECTIONS: AtomicUsize = AtomicUsize::new(0);

    fn ident_ptr(ident: &str) -> &'static CStr {
        let sanitized = ident.replace('\0', "");
        let mut idents = IDENTS.lock();
        if let Some(existing) = idents
            .iter()
            .copied()
            .find(|existing| existing.to_bytes() == sanitized.as_bytes())
        {
            return existing;
        }
        let owned = CString::new(sanitized).unwrap_or_default();
        let leaked: &'static CStr = Box::leak(owned.into_boxed_c_str());
        idents.push(leaked);
        leaked
    }

    pub(super) fn priority(level: LogLevel) -> libc::c_int {
        match level {
            LogLevel::Debug => libc::LOG_DEBUG,
            LogLevel::Info => libc::LOG_INFO,
            LogLevel::Warn => libc::LOG_WARNING,
            LogLevel::Error => libc::LOG_ERR,
            LogLevel::Fatal => libc::LOG_CRIT,
            LogLevel::Unknown => libc::LOG_ALERT,
        }
    }

    pub(super) fn open(ident: &str) -> Result<()> {
        let ident = ident_ptr(ident);
        // SAFETY: `ident` is a NUL-terminated string that lives for the rest
        // of the process.
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, libc::LOG_USER);
        }
        OPEN_CONNECTIONS.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    pub(super) fn send(level: LogLevel, message: &str) {
        let Ok(message) = CString::new(message.replace('\0', "")) else {
            return;
        };
        // `%s` keeps `%` in the message from being read as a conversion.
        // SAFETY: both arguments are valid NUL-terminated strings.
        unsafe {
            libc::syslog(priority(level), c"%s".as_ptr(), message.as_ptr());
        }
    }

    pub(super) fn close() {
        if OPEN_CONNECTIONS.fetch_sub(1, Ordering::SeqCst) == 1 {
            // SAFETY: closelog has no preconditions.
            unsafe {
                libc::closelog();
            }
        }
    }
}

#[cfg(not(all(unix, feature = "syslog")))]
mod platform {
    use crate::core::{LogLevel, LoggerError, Result};

    pub(super) fn open(_ident: &str) -> Result<()> {
        Err(LoggerError::syslog_unavailable(
            "system log support is not built for this target",
        ))
    }

    pub(super) fn send(_level: LogLevel, _message: &str) {}

    pub(super) fn close() {}
}
