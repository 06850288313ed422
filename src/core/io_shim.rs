//! `std::io` adapters so a logger can stand in for a writable stream
//!
//! Bytes written are split on newlines; each complete line is logged at
//! `unknown` severity with neither token nor call-site prefix. A trailing
//! partial line waits for more input or for `flush`. Reading and seeking are
//! unsupported.

use super::call_site::SourceMarker;
use super::error::LoggerError;
use super::log_level::LogLevel;
use super::logger::Logger;
use std::io::{self, Read, Seek, SeekFrom, Write};

pub(crate) const SOURCE: SourceMarker = SourceMarker::new(file!(), module_path!());

fn write_lines(logger: &Logger, buf: &[u8]) -> io::Result<usize> {
    let lines = {
        let mut pending = logger.pending_write().lock();
        pending.extend_from_slice(buf);
        match pending.iter().rposition(|&b| b == b'\n') {
            Some(last) => {
                let rest = pending.split_off(last + 1);
                std::mem::replace(&mut *pending, rest)
            }
            None => return Ok(buf.len()),
        }
    };

    for line in lines.split(|&b| b == b'\n').filter(|line| !line.is_empty()) {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        logger.emit(LogLevel::Unknown, &String::from_utf8_lossy(line), None, false);
    }
    Ok(buf.len())
}

fn flush_lines(logger: &Logger) -> io::Result<()> {
    logger.flush().map_err(io::Error::from)
}

impl Write for &Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        write_lines(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        flush_lines(self)
    }
}

impl Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        write_lines(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        flush_lines(self)
    }
}

impl Read for &Logger {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(LoggerError::unsupported("read").into())
    }
}

impl Read for Logger {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(LoggerError::unsupported("read").into())
    }
}

impl Seek for &Logger {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(LoggerError::unsupported("seek").into())
    }
}

impl Seek for Logger {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(LoggerError::unsupported("seek").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::BufferBackend;
    use crate::core::{BackendSpec, LineFormat};

    fn buffered() -> Logger {
        Logger::builder()
            .progname("shim")
            .backend(BackendSpec::sink(
                BufferBackend::new().with_format(LineFormat::new("{severity} {message}")),
            ))
            .token("ignored")
            .build()
    }

    #[test]
    fn test_complete_lines_are_logged_raw() {
        let logger = buffered();
        writeln!(&logger, "first").unwrap();
        write!(&logger, "sec").unwrap();
        assert_eq!(logger.buffer().unwrap(), "UNKNOWN first\n");

        write!(&logger, "ond\nthird\n").unwrap();
        assert_eq!(
            logger.buffer().unwrap(),
            "UNKNOWN first\nUNKNOWN second\nUNKNOWN third\n"
        );
    }

    #[test]
    fn test_flush_emits_partial_line() {
        let mut logger = buffered();
        logger.write_all(b"tail").unwrap();
        assert_eq!(logger.buffer().unwrap(), "");
        Write::flush(&mut logger).unwrap();
        assert_eq!(logger.buffer().unwrap(), "UNKNOWN tail\n");
    }

    #[test]
    fn test_read_side_is_unsupported() {
        let mut logger = buffered();
        let mut buf = [0u8; 8];
        let err = logger.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        assert!(err.to_string().contains("write-only"));

        let err = (&logger).seek(SeekFrom::Start(0)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }
}
