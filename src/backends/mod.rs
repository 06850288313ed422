//! Backend implementations

pub mod buffer;
pub mod standard;
pub mod syslog;

pub use buffer::BufferBackend;
pub use standard::{StandardBackend, Target};
pub use syslog::SyslogBackend;

pub use crate::core::Backend;
