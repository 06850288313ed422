//! Shared logger holder

use super::call_site::SourceMarker;
use super::logger::Logger;
use parking_lot::RwLock;
use std::sync::Arc;

pub(crate) const SOURCE: SourceMarker = SourceMarker::new(file!(), module_path!());

/// An application-owned slot for the logger most code should use.
///
/// Nothing here is a hidden static: the application decides where the holder
/// lives (a `static`, a context struct, a field of its service) and passes it
/// around. `const fn new` makes the `static` case straightforward:
///
/// ```
/// use token_logger::core::SharedLogger;
///
/// static LOGGER: SharedLogger = SharedLogger::new();
///
/// LOGGER.set(token_logger::Logger::builder().backend("buffer").build());
/// LOGGER.get().info("ready");
/// assert!(LOGGER.get().buffer().unwrap().contains("ready"));
/// ```
pub struct SharedLogger {
    current: RwLock<Option<Arc<Logger>>>,
}

impl SharedLogger {
    pub const fn new() -> Self {
        Self {
            current: parking_lot::const_rwlock(None),
        }
    }

    /// The held logger, creating a default one on first use
    pub fn get(&self) -> Arc<Logger> {
        if let Some(logger) = self.current.read().as_ref() {
            return Arc::clone(logger);
        }
        let mut current = self.current.write();
        Arc::clone(current.get_or_insert_with(|| Arc::new(Logger::new())))
    }

    /// The held logger, without creating one
    pub fn try_get(&self) -> Option<Arc<Logger>> {
        self.current.read().clone()
    }

    /// Install `logger`. The outgoing logger, if any, records the replacement
    /// at info level before it is released.
    pub fn set(&self, logger: impl Into<Arc<Logger>>) {
        let logger = logger.into();
        let previous = self.current.write().replace(Arc::clone(&logger));
        if let Some(previous) = previous {
            if !Arc::ptr_eq(&previous, &logger) {
                previous.info(format!(
                    "Shared logger is being replaced by {:?}",
                    logger.progname()
                ));
            }
        }
    }

    /// Remove the held logger, returning it
    pub fn take(&self) -> Option<Arc<Logger>> {
        self.current.write().take()
    }
}

impl Default for SharedLogger {
    fn default() -> Self {
        Self::new()
    }
}
