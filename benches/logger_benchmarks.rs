//! Criterion benchmarks for token_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use token_logger::backends::BufferBackend;
use token_logger::core::{call_site, BackendSpec, LineFormat, LogEntry};
use token_logger::prelude::*;

fn sink_logger(call_site: bool) -> Logger {
    Logger::builder()
        .progname("bench")
        .call_site(call_site)
        .backend(BackendSpec::sink(StandardBackend::from_writer(
            std::io::sink(),
            "sink",
        )))
        .build()
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let plain = sink_logger(false);
    group.bench_function("no_call_site", |b| {
        b.iter(|| plain.info(black_box("Info message")));
    });

    let annotated = sink_logger(true);
    group.bench_function("with_call_site", |b| {
        b.iter(|| annotated.info(black_box("Info message")));
    });

    let tokened = sink_logger(true);
    tokened.set_token("job-1234");
    group.bench_function("with_token", |b| {
        b.iter(|| tokened.info(black_box("Info message")));
    });

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");

    let logger = sink_logger(true);
    logger.set_level(LogLevel::Error);

    group.bench_function("filtered_out", |b| {
        b.iter(|| logger.debug(black_box("dropped")));
    });

    group.bench_function("silenced_block", |b| {
        b.iter(|| logger.silence(|| logger.warn(black_box("dropped"))));
    });

    group.finish();
}

// ============================================================================
// Component Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    let entry = LogEntry::new(LogLevel::Warn, "disk usage at 91%", "bench");

    let default_format = LineFormat::default();
    group.bench_function("default_template", |b| {
        b.iter(|| default_format.render(black_box(&entry)));
    });

    let short = LineFormat::new("[{severity}] {message}");
    group.bench_function("short_template", |b| {
        b.iter(|| short.render(black_box(&entry)));
    });

    group.finish();
}

fn bench_call_site(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_site");

    group.bench_function("fast_path", |b| {
        b.iter(|| call_site::resolve(black_box(std::panic::Location::caller())));
    });

    group.bench_function("backtrace_capture", |b| {
        b.iter(|| black_box(call_site::capture_frames()));
    });

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");
    group.throughput(Throughput::Elements(400));
    group.sample_size(20);

    group.bench_function("4_threads_buffer", |b| {
        b.iter(|| {
            let logger = Arc::new(
                Logger::builder()
                    .call_site(false)
                    .backend(BackendSpec::sink(BufferBackend::new()))
                    .build(),
            );
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let logger = Arc::clone(&logger);
                    std::thread::spawn(move || {
                        for i in 0..100 {
                            logger.info(format!("thread {} message {}", t, i));
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }
            black_box(logger)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_logging,
    bench_level_filtering,
    bench_formatting,
    bench_call_site,
    bench_concurrent_logging,
);
criterion_main!(benches);
