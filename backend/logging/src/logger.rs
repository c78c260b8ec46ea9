//! Structured Logger
//!
//! Wraps `tracing` with a console layer, a rolling JSON file layer, and
//! `RUST_LOG` level control.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global logger.
///
/// Writes NDJSON to `<log_dir>/vizassist.log.YYYY-MM-DD` and human-readable
/// lines to stderr (stdout belongs to spoken output in the harness). Keep
/// the returned guard alive for the life of the program so buffered file
/// lines are flushed.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) -> WorkerGuard {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "vizassist.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_ansi(false);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    guard
}
