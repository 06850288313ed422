//! Tokens, silencing and the shared holder
//!
//! One worker processes several jobs; each job's lines carry the job id, and
//! a noisy step is silenced.
//!
//! Run with: cargo run --example tokens_and_silencing

use token_logger::prelude::*;
use token_logger::{info, warn};

static LOGGER: SharedLogger = SharedLogger::new();

struct Job {
    id: u32,
    rows: usize,
}

fn noisy_step(logger: &Logger, job: &Job) {
    for row in 0..job.rows {
        logger.info(format!("row {} ok", row));
    }
    logger.error(format!("{} rows processed", job.rows));
}

fn run(job: &Job) {
    let logger = LOGGER.get();
    logger.tagged(job.id, format!("job-{}", job.id), || {
        info!(logger, "starting with {} rows", job.rows);
        logger.silence(|| noisy_step(&logger, job));
        if job.rows == 0 {
            warn!(logger, "nothing to do");
        }
    });
}

fn main() {
    println!("=== Token Logger - Tokens and Silencing Example ===\n");

    LOGGER.set(
        Logger::builder()
            .progname("worker")
            .backend("buffer")
            .token("worker-1")
            .build(),
    );

    for job in [Job { id: 7, rows: 3 }, Job { id: 8, rows: 0 }] {
        run(&job);
    }
    LOGGER.get().info("idle");

    if let Some(out) = LOGGER.get().buffer() {
        print!("{}", out);
    }

    // Replacing the holder's logger leaves a note in the outgoing one.
    let previous = LOGGER.get();
    LOGGER.set(Logger::builder().progname("replacement").backend("buffer").build());
    if let Some(out) = previous.buffer() {
        print!("{}", out.lines().last().unwrap_or_default());
        println!();
    }

    println!("\n=== Example completed successfully! ===");
}
