//! Integration tests for the logger facade
//!
//! These tests verify:
//! - Threshold filtering and buffer retention
//! - Token prefixes and save/restore
//! - Silencing, including early exit by panic
//! - Backend switching and fallbacks
//! - Call-site annotation and exception rendering
//! - The write-only stream adapter

use std::backtrace::Backtrace;
use std::fs;
use std::io::{self, Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use token_logger::backends::{BufferBackend, StandardBackend, Target};
use token_logger::core::{
    Backend, BackendKind, BackendSpec, Exception, LineFormat, LogEntry, LogLevel, Logger,
    LoggerError, Result,
};

fn buffered(format: &str) -> Logger {
    Logger::builder()
        .progname("itest")
        .call_site(false)
        .backend(BackendSpec::sink(
            BufferBackend::new().with_format(LineFormat::new(format)),
        ))
        .build()
}

/// Backend that counts what happens to it
struct Recorder {
    level: LogLevel,
    appended: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl Backend for Recorder {
    fn append(&mut self, _entry: &LogEntry) -> Result<()> {
        self.appended.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "recorder"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Standard
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn close(&mut self) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn test_buffer_keeps_lines_in_order() {
    let logger = Logger::builder()
        .progname("itest")
        .backend("buffer")
        .call_site(false)
        .build();
    logger.info("one");
    logger.warn("two");
    logger.error("three");

    let contents = logger.buffer().expect("buffer backend");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("itest("));
    assert!(lines[0].ends_with("[INFO] one"));
    assert!(lines[1].ends_with("[WARN] two"));
    assert!(lines[2].ends_with("[ERROR] three"));
}

#[test]
fn test_threshold_warn_filters_lower_levels() {
    let logger = buffered("[{severity}] {message}");
    logger.set_level(LogLevel::Warn);

    logger.debug("d");
    logger.info("i");
    assert_eq!(logger.buffer().unwrap(), "");

    logger.warn("w");
    logger.error("e");
    logger.fatal("f");
    assert_eq!(logger.buffer().unwrap(), "[WARN] w\n[ERROR] e\n[FATAL] f\n");
}

#[test]
fn test_unknown_severity_name_is_rejected() {
    let logger = buffered("{message}");
    assert!(logger.log_named("verbose", "x").is_err());
    assert!(logger.set_level_named("verbose").is_err());
    assert_eq!(logger.buffer().unwrap(), "");
}

#[test]
fn test_silence_suppresses_inside_block_only() {
    let logger = buffered("{message}");
    logger.silence_at(LogLevel::Fatal, || logger.error("x"));
    logger.error("y");
    assert_eq!(logger.buffer().unwrap(), "y\n");
}

#[test]
fn test_silence_restores_level_after_panic() {
    let logger = buffered("{message}");
    logger.set_level(LogLevel::Info);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        logger.silence_at(LogLevel::Fatal, || {
            logger.error("x");
            panic!("job failed");
        })
    }));

    assert!(result.is_err());
    assert_eq!(logger.level(), LogLevel::Info);
    logger.error("y");
    assert_eq!(logger.buffer().unwrap(), "y\n");
}

#[test]
fn test_silence_restores_level_after_error_return() {
    let logger = buffered("{message}");
    let outcome: std::result::Result<(), String> = logger.silence(|| {
        logger.warn("hidden");
        Err("bad input".to_string())
    });

    assert!(outcome.is_err());
    assert_eq!(logger.level(), LogLevel::Debug);
    logger.warn("shown");
    assert_eq!(logger.buffer().unwrap(), "shown\n");
}

#[test]
fn test_token_prefix_set_and_cleared() {
    let logger = buffered("{message}");
    logger.set_token("abc");
    logger.info("hello");
    logger.clear_token();
    logger.info("hello");

    let contents = logger.buffer().unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert!(lines[0].contains("[abc] hello"));
    assert_eq!(lines[1], "hello");
}

#[test]
fn test_save_restore_round_trips_token() {
    let logger = buffered("{message}");
    logger.set_token("worker-1");
    logger.save_token("job-17");
    logger.set_token("job-17");
    assert_eq!(logger.restore_token("job-17").as_deref(), Some("worker-1"));
    assert_eq!(logger.token().as_deref(), Some("worker-1"));
}

#[test]
fn test_save_restore_round_trips_absent_token() {
    let logger = buffered("{message}");
    logger.save_token(1usize);
    logger.set_token("temporary");
    assert_eq!(logger.restore_token(1usize), None);
    assert_eq!(logger.token(), None);
}

#[test]
fn test_interleaved_jobs_keep_their_tokens() {
    let logger = buffered("{message}");
    logger.set_token("worker");

    logger.save_token("a");
    logger.set_token("job-a");
    logger.save_token("b");
    logger.set_token("job-b");
    logger.info("b running");
    logger.restore_token("b");
    logger.info("a running");
    logger.restore_token("a");
    logger.info("idle");

    assert_eq!(
        logger.buffer().unwrap(),
        "[job-b] b running\n[job-a] a running\n[worker] idle\n"
    );
}

#[test]
fn test_tagged_restores_after_panic() {
    let logger = buffered("{message}");
    logger.set_token("worker");
    let _ = panic::catch_unwind(AssertUnwindSafe(|| {
        logger.tagged(42u64, "job-42", || panic!("boom"));
    }));
    assert_eq!(logger.token().as_deref(), Some("worker"));
}

#[test]
fn test_switching_away_from_buffer_drops_content() {
    let logger = Logger::builder().backend("buffer").call_site(false).build();
    logger.info("kept for now");
    assert!(logger.buffer().unwrap().contains("kept for now"));

    logger.set_backend(BackendSpec::sink(StandardBackend::from_writer(
        io::sink(),
        "sink",
    )));
    assert!(logger.buffer().is_none());
}

#[test]
fn test_set_backend_closes_previous() {
    let appended = Arc::new(AtomicUsize::new(0));
    let closed = Arc::new(AtomicUsize::new(0));
    let logger = Logger::builder()
        .call_site(false)
        .backend(BackendSpec::sink(Recorder {
            level: LogLevel::Debug,
            appended: Arc::clone(&appended),
            closed: Arc::clone(&closed),
        }))
        .build();

    logger.info("one");
    logger.set_backend(BackendKind::Buffer);
    logger.info("two");

    assert_eq!(appended.load(Ordering::SeqCst), 1);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert!(logger.buffer().unwrap().contains("two"));
}

#[test]
fn test_file_backend_appends_and_creates_directories() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested/deeper/app.log");

    {
        let logger = Logger::builder()
            .progname("app")
            .call_site(false)
            .backend(path.clone())
            .build();
        logger.info("first run");
    }
    {
        let logger = Logger::builder()
            .progname("app")
            .call_site(false)
            .backend(path.as_path())
            .build();
        logger.info("second run");
    }

    let content = fs::read_to_string(&path).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("app("));
    assert!(lines[0].ends_with("[INFO] first run"));
    assert!(lines[1].ends_with("[INFO] second run"));
}

#[test]
fn test_default_backend_uses_log_dir_and_progname() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder()
        .progname("svc")
        .log_dir(temp_dir.path().join("log"))
        .call_site(false)
        .build();

    logger.info("lazy");
    logger.flush().unwrap();

    assert_eq!(logger.backend_name(), "file");
    let content = fs::read_to_string(temp_dir.path().join("log/svc.log")).unwrap();
    assert!(content.contains("[INFO] lazy"));
}

#[test]
fn test_unwritable_path_falls_back_to_stderr() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("not-a-dir");
    fs::write(&blocker, b"file").unwrap();

    let backend = StandardBackend::open(blocker.join("app.log"));
    assert_eq!(backend.target(), &Target::Stderr);

    let logger = Logger::builder()
        .call_site(false)
        .backend(blocker.join("sub/app.log"))
        .build();
    logger.warn("still delivered");
    assert_eq!(logger.backend_name(), "stderr");
}

/// Set in the re-executed test process that performs the fallback logging
const FALLBACK_CHILD_ENV: &str = "TOKEN_LOGGER_FALLBACK_DIR";

#[test]
fn test_unwritable_path_output_appears_on_stderr() {
    if let Some(dir) = std::env::var_os(FALLBACK_CHILD_ENV) {
        let logger = Logger::builder()
            .progname("fallback")
            .call_site(false)
            .backend(Path::new(&dir).join("not-a-dir/sub/app.log"))
            .build();
        logger.warn("still delivered");
        logger.flush().expect("Failed to flush");
        return;
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("not-a-dir"), b"file").unwrap();

    let output = Command::new(std::env::current_exe().expect("test binary path"))
        .args([
            "test_unwritable_path_output_appears_on_stderr",
            "--exact",
            "--nocapture",
            "--test-threads=1",
        ])
        .env(FALLBACK_CHILD_ENV, temp_dir.path())
        .output()
        .expect("Failed to run child test");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[LOGGER WARNING] Cannot log to"));
    assert!(stderr
        .lines()
        .any(|line| line.contains("fallback(") && line.ends_with("[WARN] still delivered")));
}

#[test]
fn test_close_then_log_reopens_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder()
        .progname("reopen")
        .log_dir(temp_dir.path())
        .backend(BackendKind::Buffer)
        .build();

    logger.close();
    logger.error("after close");
    logger.flush().unwrap();

    let content = fs::read_to_string(temp_dir.path().join("reopen.log")).unwrap();
    assert!(content.contains("after close"));
}

#[test]
fn test_unavailable_syslog_reverts_to_standard() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Logger::builder()
        .progname("daemon")
        .log_dir(temp_dir.path())
        .syslog_socket(temp_dir.path().join("no-such-socket"))
        .backend("syslog")
        .build();

    assert_eq!(logger.backend_kind(), BackendKind::Standard);
    logger.flush().unwrap();

    let content = fs::read_to_string(temp_dir.path().join("daemon.log")).unwrap();
    assert!(content.contains("[ERROR]"));
    assert!(content.contains("Syslog backend unavailable"));
}

#[test]
fn test_call_site_points_at_caller() {
    let logger = Logger::builder()
        .backend(BackendSpec::sink(
            BufferBackend::new().with_format(LineFormat::new("{message}")),
        ))
        .build();

    let line = line!() + 1;
    logger.warn("careful");
    assert_eq!(
        logger.buffer().unwrap(),
        format!("integration_tests.rs:{}: careful\n", line)
    );
}

#[test]
fn test_token_precedes_call_site() {
    let logger = Logger::builder()
        .token("req-9")
        .backend(BackendSpec::sink(
            BufferBackend::new().with_format(LineFormat::new("{message}")),
        ))
        .build();

    let line = line!() + 1;
    logger.info("hello");
    assert_eq!(
        logger.buffer().unwrap(),
        format!("[req-9] integration_tests.rs:{}: hello\n", line)
    );
}

#[derive(Debug, thiserror::Error)]
#[error("payment declined")]
struct PaymentError;

#[test]
fn test_exception_excludes_facade_frames() {
    let logger = buffered("[{severity}] {message}");
    logger.exception_from(&PaymentError);

    let contents = logger.buffer().unwrap();
    assert!(contents.starts_with("[ERROR] EXCEPTION: payment declined"));
    assert!(!contents.contains("src/core/logger.rs"));
    assert!(!contents.contains("src/core/exception.rs"));
    assert!(!contents.contains("src/core/call_site.rs"));
    assert!(!contents.contains("token_logger::core::logger::"));
    assert_eq!(contents.lines().count(), 1);
}

#[inline(never)]
fn failing_import_step() -> Backtrace {
    Backtrace::force_capture()
}

#[test]
fn test_exception_keeps_frames_captured_inside_silence() {
    let logger = buffered("{message}");
    let backtrace = logger.silence(failing_import_step);
    logger.exception(Exception::from(LoggerError::other("import failed")).with_backtrace(&backtrace));

    let contents = logger.buffer().unwrap();
    assert!(contents.starts_with("EXCEPTION: import failed: "));
    assert!(contents.contains("failing_import_step"));
    assert!(!contents.contains("std::backtrace::Backtrace"));
    assert!(!contents.contains("token_logger::core::logger::"));
}

#[test]
fn test_exception_with_plain_message() {
    let logger = buffered("[{severity}] {message}");
    logger.exception("something odd");
    assert_eq!(logger.buffer().unwrap(), "[ERROR] something odd\n");
}

#[test]
fn test_exception_keeps_token() {
    let logger = buffered("{message}");
    logger.set_token("job-3");
    logger.exception(io::Error::new(io::ErrorKind::NotFound, "orders.csv"));
    assert!(logger
        .buffer()
        .unwrap()
        .starts_with("[job-3] EXCEPTION: orders.csv"));
}

#[test]
fn test_write_adapter_logs_unknown_severity_without_prefixes() {
    let logger = Logger::builder()
        .token("tok")
        .backend(BackendSpec::sink(
            BufferBackend::new().with_format(LineFormat::new("[{severity}] {message}")),
        ))
        .build();
    logger.set_level(LogLevel::Fatal);

    let mut out = &logger;
    writeln!(out, "from a writer").unwrap();
    write!(out, "partial").unwrap();
    out.flush().unwrap();

    assert_eq!(
        logger.buffer().unwrap(),
        "[UNKNOWN] from a writer\n[UNKNOWN] partial\n"
    );
}

#[test]
fn test_read_is_unsupported() {
    let mut logger = buffered("{message}");
    let mut text = String::new();
    let err = logger.read_to_string(&mut text).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::Unsupported);
}

#[test]
fn test_logger_is_shareable_across_threads() {
    let logger = Arc::new(buffered("{message}"));
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..50 {
                    logger.info(format!("thread {} message {}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    assert_eq!(logger.buffer().unwrap().lines().count(), 400);
}
