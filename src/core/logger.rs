//! Logger facade

use super::{
    backend::{Backend, BackendKind, BackendSpec},
    call_site::{self, SourceMarker},
    error::Result,
    exception::Exception,
    log_entry::LogEntry,
    log_level::LogLevel,
    silence::SilenceGuard,
    token::{TokenKey, TokenStore},
};
use crate::backends::{BufferBackend, StandardBackend, SyslogBackend};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::hash::Hash;
use std::panic::Location;
use std::path::{Path, PathBuf};

pub(crate) const SOURCE: SourceMarker = SourceMarker::new(file!(), module_path!());

/// Directory for the default log file, relative to the working directory
pub const DEFAULT_LOG_DIR: &str = "log";

/// The logging facade.
///
/// Owns one backend at a time (constructed lazily as a file backend at
/// `<log_dir>/<progname>.log` when none was set), an optional correlation
/// token prefixed to every message, and a store of saved tokens.
///
/// State is behind locks so a logger can be shared through an `Arc`, but the
/// token is one value per logger: concurrent units of work that each need
/// their own token should use their own logger.
///
/// # Example
///
/// ```
/// use token_logger::prelude::*;
///
/// let logger = Logger::builder().backend("buffer").build();
/// logger.set_token("job-42");
/// logger.info("picked up");
/// assert!(logger.buffer().unwrap().contains("[job-42] "));
/// ```
pub struct Logger {
    backend: Mutex<Option<Box<dyn Backend>>>,
    level: RwLock<LogLevel>,
    token: RwLock<Option<String>>,
    tokens: Mutex<TokenStore>,
    pending_write: Mutex<Vec<u8>>,
    progname: String,
    log_dir: PathBuf,
    syslog_socket: Option<PathBuf>,
    call_site: bool,
}

impl Logger {
    /// A logger with default settings; nothing is opened until the first
    /// message.
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    pub fn progname(&self) -> &str {
        &self.progname
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Where the default standard backend writes
    pub fn default_log_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.progname))
    }

    // ------------------------------------------------------------------
    // Backend lifecycle
    // ------------------------------------------------------------------

    /// Replace the backend.
    ///
    /// The previous backend is closed first; errors while closing are
    /// ignored. A [`BackendSpec::Sink`] is used as-is, including its level.
    /// When the system log is requested but unavailable, the logger reverts
    /// to the default standard backend and records an error saying so.
    pub fn set_backend(&self, spec: impl Into<BackendSpec>) {
        let mut slot = self.backend.lock();
        if let Some(mut previous) = slot.take() {
            let _ = previous.close();
        }
        let (backend, fallback) = self.build_backend(spec.into());
        *slot = Some(backend);
        drop(slot);

        if let Some(note) = fallback {
            self.emit(LogLevel::Error, &note, None, true);
        }
    }

    fn build_backend(&self, spec: BackendSpec) -> (Box<dyn Backend>, Option<String>) {
        let level = *self.level.read();
        match spec {
            BackendSpec::Sink(backend) => (backend, None),
            BackendSpec::Path(path) => (Box::new(StandardBackend::open(path).with_level(level)), None),
            BackendSpec::Kind(BackendKind::Standard) => (self.default_backend(), None),
            BackendSpec::Kind(BackendKind::Buffer) => {
                (Box::new(BufferBackend::new().with_level(level)), None)
            }
            BackendSpec::Kind(BackendKind::Syslog) => match self.connect_syslog() {
                Ok(backend) => (Box::new(backend.with_level(level)), None),
                Err(e) => (
                    self.default_backend(),
                    Some(format!(
                        "Syslog backend unavailable ({}); reverted to standard backend",
                        e
                    )),
                ),
            },
        }
    }

    fn connect_syslog(&self) -> Result<SyslogBackend> {
        match &self.syslog_socket {
            Some(socket) => SyslogBackend::connect_via(&self.progname, std::slice::from_ref(socket)),
            None => SyslogBackend::connect(&self.progname),
        }
    }

    fn default_backend(&self) -> Box<dyn Backend> {
        let level = *self.level.read();
        Box::new(StandardBackend::open(self.default_log_path()).with_level(level))
    }

    fn ensure_backend<'s>(
        &self,
        slot: &'s mut Option<Box<dyn Backend>>,
    ) -> &'s mut Box<dyn Backend> {
        slot.get_or_insert_with(|| self.default_backend())
    }

    /// Run `f` against the active backend, constructing the default one first
    /// if none is set.
    pub fn backend<R>(&self, f: impl FnOnce(&mut dyn Backend) -> R) -> R {
        let mut slot = self.backend.lock();
        let backend = self.ensure_backend(&mut slot);
        f(backend.as_mut())
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend(|backend| backend.kind())
    }

    pub fn backend_name(&self) -> String {
        self.backend(|backend| backend.name().to_string())
    }

    /// Contents of the buffering backend; `None` when another kind is active
    pub fn buffer(&self) -> Option<String> {
        self.backend
            .lock()
            .as_ref()
            .and_then(|backend| backend.buffer())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn flush(&self) -> Result<()> {
        self.flush_pending_write();
        match self.backend.lock().as_mut() {
            Some(backend) => backend.flush(),
            None => Ok(()),
        }
    }

    /// Close and drop the backend. The next message constructs a fresh
    /// default backend.
    pub fn close(&self) {
        self.flush_pending_write();
        if let Some(mut backend) = self.backend.lock().take() {
            let _ = backend.close();
        }
    }

    // ------------------------------------------------------------------
    // Threshold
    // ------------------------------------------------------------------

    pub fn level(&self) -> LogLevel {
        match self.backend.lock().as_ref() {
            Some(backend) => backend.level(),
            None => *self.level.read(),
        }
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
        if let Some(backend) = self.backend.lock().as_mut() {
            backend.set_level(level);
        }
    }

    /// Set the threshold by name; unknown names are a configuration error
    pub fn set_level_named(&self, name: &str) -> Result<()> {
        self.set_level(name.parse()?);
        Ok(())
    }

    /// Swap the backend threshold, returning the one it replaced
    pub(crate) fn swap_level(&self, level: LogLevel) -> LogLevel {
        let mut slot = self.backend.lock();
        let backend = self.ensure_backend(&mut slot);
        let previous = backend.level();
        backend.set_level(level);
        previous
    }

    /// Put back a threshold taken by [`Logger::swap_level`]. Only the active
    /// backend changes; the level given to backends built later stays as set.
    pub(crate) fn restore_level(&self, level: LogLevel) {
        if let Some(backend) = self.backend.lock().as_mut() {
            backend.set_level(level);
        }
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    // ------------------------------------------------------------------
    // Silencing
    // ------------------------------------------------------------------

    /// Raise the threshold to `level` until the guard is dropped. Does
    /// nothing while the process-wide silencer is disabled.
    pub fn silence_guard(&self, level: LogLevel) -> SilenceGuard<'_> {
        SilenceGuard::new(self, level)
    }

    /// Run `f` with everything below `error` suppressed
    pub fn silence<R>(&self, f: impl FnOnce() -> R) -> R {
        self.silence_at(LogLevel::Error, f)
    }

    /// Run `f` with everything below `level` suppressed; the previous
    /// threshold is restored however `f` exits.
    pub fn silence_at<R>(&self, level: LogLevel, f: impl FnOnce() -> R) -> R {
        let _guard = self.silence_guard(level);
        f()
    }

    // ------------------------------------------------------------------
    // Tokens
    // ------------------------------------------------------------------

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write() = None;
    }

    /// Set or clear the token, returning the previous one
    pub fn replace_token(&self, token: Option<String>) -> Option<String> {
        std::mem::replace(&mut *self.token.write(), token)
    }

    /// Remember the current token under `key`. No-op when no token is set.
    pub fn save_token<K: Hash + Eq + Send + Sync + 'static>(&self, key: K) {
        self.save_token_key(TokenKey::new(key));
    }

    /// Make the token saved under `key` current again, removing it from the
    /// store. With nothing saved under `key` the token becomes unset.
    pub fn restore_token<K: Hash + Eq + Send + Sync + 'static>(&self, key: K) -> Option<String> {
        self.restore_token_key(&TokenKey::new(key))
    }

    fn save_token_key(&self, key: TokenKey) {
        if let Some(token) = self.token() {
            self.tokens.lock().save(key, token);
        }
    }

    fn restore_token_key(&self, key: &TokenKey) -> Option<String> {
        let restored = self.tokens.lock().take(key);
        *self.token.write() = restored.clone();
        restored
    }

    /// Run `f` with `token` current, stashing the ambient token under `key`
    /// and restoring it afterwards, also on unwind.
    pub fn tagged<K, R>(&self, key: K, token: impl Into<String>, f: impl FnOnce() -> R) -> R
    where
        K: Hash + Eq + Clone + Send + Sync + 'static,
    {
        self.save_token(key.clone());
        self.set_token(token);
        let _restore = TokenRestore {
            logger: self,
            key: Some(TokenKey::new(key)),
        };
        f()
    }

    // ------------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------------

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        let location = if self.call_site {
            Some(Location::caller())
        } else {
            None
        };
        self.emit(level, message.as_ref(), location, true);
    }

    /// Log at a severity given by name; unknown names are a configuration
    /// error and nothing is logged.
    #[track_caller]
    pub fn log_named(&self, severity: &str, message: impl AsRef<str>) -> Result<()> {
        let level: LogLevel = severity.parse()?;
        self.log(level, message);
        Ok(())
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Fatal, message);
    }

    #[inline]
    #[track_caller]
    pub fn unknown(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Unknown, message);
    }

    /// Log an error value or a plain message at `error` severity.
    ///
    /// Errors render as `EXCEPTION: <message>: <backtrace>` without a
    /// call-site prefix, the backtrace already saying where; plain messages
    /// are logged like [`Logger::error`].
    #[track_caller]
    pub fn exception(&self, exception: impl Into<Exception>) {
        match exception.into() {
            Exception::Message(message) => self.log(LogLevel::Error, message),
            exception => self.emit(LogLevel::Error, &exception.render(), None, true),
        }
    }

    /// Shorthand for `exception(Exception::from_error(err))`
    #[track_caller]
    pub fn exception_from<E: std::error::Error + ?Sized>(&self, err: &E) {
        self.exception(Exception::from_error(err));
    }

    /// Compose the message and hand it to the backend.
    ///
    /// Prefixes are `[token] ` then `file:line: `; backend failures are
    /// reported on stderr and never reach the caller.
    pub(crate) fn emit(
        &self,
        level: LogLevel,
        message: &str,
        location: Option<&Location<'_>>,
        with_token: bool,
    ) {
        let mut composed = String::with_capacity(message.len() + 32);
        if with_token {
            if let Some(token) = self.token.read().as_deref() {
                composed.push('[');
                composed.push_str(token);
                composed.push_str("] ");
            }
        }
        if let Some(location) = location {
            composed.push_str(&call_site::resolve(location));
            composed.push_str(": ");
        }
        composed.push_str(message);

        let entry = LogEntry::new(level, composed, self.progname.as_str());
        let mut slot = self.backend.lock();
        let backend = self.ensure_backend(&mut slot);
        if let Err(e) = backend.add(&entry) {
            eprintln!("[LOGGER ERROR] Backend '{}' failed: {}", backend.name(), e);
        }
    }

    pub(crate) fn pending_write(&self) -> &Mutex<Vec<u8>> {
        &self.pending_write
    }

    pub(crate) fn flush_pending_write(&self) {
        let pending = std::mem::take(&mut *self.pending_write.lock());
        if !pending.is_empty() {
            self.emit(LogLevel::Unknown, &String::from_utf8_lossy(&pending), None, false);
        }
    }

    /// Builder for configuring a logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("progname", &self.progname)
            .field("level", &self.level())
            .field("token", &self.token())
            .field(
                "backend",
                &self.backend.lock().as_ref().map(|b| b.name().to_string()),
            )
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

struct TokenRestore<'a> {
    logger: &'a Logger,
    key: Option<TokenKey>,
}

impl Drop for TokenRestore<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.logger.restore_token_key(&key);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use token_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .progname("importer")
///     .level(LogLevel::Info)
///     .backend(BackendKind::Buffer)
///     .build();
/// assert_eq!(logger.level(), LogLevel::Info);
/// ```
pub struct LoggerBuilder {
    progname: Option<String>,
    level: Option<LogLevel>,
    backend: Option<BackendSpec>,
    log_dir: Option<PathBuf>,
    call_site: bool,
    syslog_socket: Option<PathBuf>,
    token: Option<String>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            progname: None,
            level: None,
            backend: None,
            log_dir: None,
            call_site: true,
            syslog_socket: None,
            token: None,
        }
    }

    /// Program name for formatted lines, the default file name and the
    /// system log ident. Defaults to the executable's file name.
    #[must_use = "builder methods return a new value"]
    pub fn progname(mut self, progname: impl Into<String>) -> Self {
        self.progname = Some(progname.into());
        self
    }

    /// Set minimum log level. Also applied to a prebuilt sink.
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn backend(mut self, spec: impl Into<BackendSpec>) -> Self {
        self.backend = Some(spec.into());
        self
    }

    /// Directory of the default log file
    #[must_use = "builder methods return a new value"]
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Prefix messages with `file:line:` of the caller (default on)
    #[must_use = "builder methods return a new value"]
    pub fn call_site(mut self, enabled: bool) -> Self {
        self.call_site = enabled;
        self
    }

    /// Probe this socket instead of the platform defaults when connecting to
    /// the system log
    #[must_use = "builder methods return a new value"]
    pub fn syslog_socket(mut self, socket: impl Into<PathBuf>) -> Self {
        self.syslog_socket = Some(socket.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let logger = Logger {
            backend: Mutex::new(None),
            level: RwLock::new(self.level.unwrap_or_default()),
            token: RwLock::new(self.token),
            tokens: Mutex::new(TokenStore::new()),
            pending_write: Mutex::new(Vec::new()),
            progname: self.progname.unwrap_or_else(default_progname),
            log_dir: self.log_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            syslog_socket: self.syslog_socket,
            call_site: self.call_site,
        };

        if let Some(spec) = self.backend {
            logger.set_backend(spec);
            if let Some(level) = self.level {
                logger.set_level(level);
            }
        }

        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_progname() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_name().map(|name| name.to_string_lossy().into_owned()))
        .or_else(|| {
            std::env::args_os().next().and_then(|arg0| {
                Path::new(&arg0)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
        })
        .unwrap_or_else(|| "app".to_string())
}
