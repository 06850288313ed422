//! Call-site resolution
//!
//! Level methods on [`Logger`](super::Logger) are `#[track_caller]`, so the
//! location handed to [`resolve`] is normally already the caller's. When it
//! still points into the facade (a helper that is not `#[track_caller]`, a
//! closure run by the logger), the resolver walks a captured backtrace
//! outward and reports the first frame that does not belong to the facade.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Reported when no frame outside the facade can be found
pub const UNKNOWN_CALL_SITE: &str = "unknown:0";

/// Identifies one source file of the facade, both by path and by module path
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceMarker {
    pub file: &'static str,
    pub module: &'static str,
}

impl SourceMarker {
    pub(crate) const fn new(file: &'static str, module: &'static str) -> Self {
        Self { file, module }
    }
}

pub(crate) const SOURCE: SourceMarker = SourceMarker::new(file!(), module_path!());

const FACADE_SOURCES: [SourceMarker; 6] = [
    SOURCE,
    super::exception::SOURCE,
    super::logger::SOURCE,
    super::silence::SOURCE,
    super::io_shim::SOURCE,
    super::global::SOURCE,
];

/// Symbol prefixes of the frames `std::backtrace` adds while capturing
const CAPTURE_PREFIXES: [&str; 3] = ["std::backtrace::", "std::backtrace_rs::", "__rustc"];

/// True when `symbol` names an item inside `module`. The module path must
/// start the symbol or follow `<`, `&`, a space or `(`, so a crate whose name
/// merely ends with ours does not match.
fn names_item_of(symbol: &str, module: &str) -> bool {
    symbol.match_indices(module).any(|(at, _)| {
        let bounded = symbol[..at]
            .chars()
            .next_back()
            .map_or(true, |c| matches!(c, '<' | '&' | ' ' | '('));
        bounded && symbol[at + module.len()..].starts_with("::")
    })
}

/// One parsed backtrace frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub symbol: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            file: None,
            line: None,
        }
    }

    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Whether this frame belongs to the logging facade itself
    pub fn is_facade(&self) -> bool {
        if self.file.as_deref().is_some_and(is_facade_path) {
            return true;
        }
        FACADE_SOURCES
            .iter()
            .any(|source| names_item_of(&self.symbol, source.module))
    }

    /// Whether this frame is part of taking the backtrace itself
    pub fn is_capture_machinery(&self) -> bool {
        let symbol = self.symbol.trim_start_matches(['<', '&']);
        CAPTURE_PREFIXES
            .iter()
            .any(|prefix| symbol.starts_with(prefix))
    }

    /// `basename:line`, when the frame carries a location
    pub fn call_site(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some(format_site(file, line)),
            _ => None,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}:in `{}`", file, line, self.symbol),
            _ => write!(f, "{}", self.symbol),
        }
    }
}

/// True when `path` names one of the facade's own source files
pub fn is_facade_path(path: &str) -> bool {
    let path = path.replace('\\', "/");
    FACADE_SOURCES.iter().any(|source| {
        let source = source.file.replace('\\', "/");
        let source = source.trim_start_matches("./");
        match path.strip_suffix(source) {
            Some("") => true,
            Some(prefix) => prefix.ends_with('/'),
            None => false,
        }
    })
}

fn format_site(file: &str, line: u32) -> String {
    let base = Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| file.into());
    format!("{}:{}", base, line)
}

/// Resolve the call site for `location`
pub fn resolve(location: &Location<'_>) -> String {
    if !is_facade_path(location.file()) {
        return format_site(location.file(), location.line());
    }
    first_external(&capture_frames())
}

/// First located frame that is neither capture machinery nor facade;
/// [`UNKNOWN_CALL_SITE`] when there is none.
pub fn first_external(frames: &[Frame]) -> String {
    frames
        .iter()
        .filter(|frame| !frame.is_capture_machinery() && !frame.is_facade())
        .find_map(Frame::call_site)
        .unwrap_or_else(|| UNKNOWN_CALL_SITE.to_string())
}

/// Drop the capture machinery and every facade frame, wherever they sit.
/// Frames of the caller between the capture point and the facade are kept.
pub fn filter_frames(frames: Vec<Frame>) -> Vec<Frame> {
    frames
        .into_iter()
        .filter(|frame| !frame.is_capture_machinery() && !frame.is_facade())
        .collect()
}

/// Capture the current stack; empty when the platform cannot provide one
pub fn capture_frames() -> Vec<Frame> {
    let backtrace = Backtrace::force_capture();
    parse_backtrace(&backtrace.to_string())
}

/// Parse the textual form of a [`Backtrace`]
///
/// Frames look like `  3: crate::module::function` followed by an optional
/// `at path/to/file.rs:LINE:COL` line. Symbols inlined into the same frame
/// appear without an index and become frames of their own.
pub fn parse_backtrace(text: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut().filter(|frame| frame.file.is_none()) {
                let (file, line) = split_location(location);
                frame.file = Some(file.to_string());
                frame.line = line;
            }
            continue;
        }

        let symbol = match line.split_once(": ") {
            Some((index, symbol))
                if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) =>
            {
                symbol
            }
            _ if frames.is_empty() => continue,
            _ => line,
        };
        frames.push(Frame::new(symbol.trim()));
    }

    frames
}

fn split_location(location: &str) -> (&str, Option<u32>) {
    let mut parts = location.rsplitn(3, ':');
    let _column = parts.next();
    match (parts.next(), parts.next()) {
        (Some(line), Some(path)) => match line.parse() {
            Ok(line) => (path, Some(line)),
            Err(_) => (location, None),
        },
        _ => (location, None),
    }
}
