//! Scoped level suppression

use super::call_site::SourceMarker;
use super::log_level::LogLevel;
use super::logger::Logger;
use std::sync::atomic::{AtomicBool, Ordering};

pub(crate) const SOURCE: SourceMarker = SourceMarker::new(file!(), module_path!());

static SILENCER_ENABLED: AtomicBool = AtomicBool::new(true);

/// Whether [`Logger::silence`] changes levels at all
pub fn silencer_enabled() -> bool {
    SILENCER_ENABLED.load(Ordering::SeqCst)
}

/// Turn silencing on or off for every logger in the process, e.g. to see
/// everything while debugging.
pub fn set_silencer_enabled(enabled: bool) {
    SILENCER_ENABLED.store(enabled, Ordering::SeqCst);
}

/// Restores the logger's threshold when dropped
///
/// Created by [`Logger::silence_guard`]. The restore runs on every exit path,
/// including early returns and unwinding panics.
#[must_use = "the previous level is restored as soon as the guard is dropped"]
pub struct SilenceGuard<'a> {
    logger: &'a Logger,
    previous: Option<LogLevel>,
}

impl<'a> SilenceGuard<'a> {
    pub(crate) fn new(logger: &'a Logger, level: LogLevel) -> Self {
        let previous = silencer_enabled().then(|| logger.swap_level(level));
        Self { logger, previous }
    }

    /// The threshold that will be restored, if one was swapped out
    pub fn previous(&self) -> Option<LogLevel> {
        self.previous
    }
}

impl Drop for SilenceGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.logger.restore_level(previous);
        }
    }
}
