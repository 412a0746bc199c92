//! Logging Infrastructure
//!
//! Structured logging setup for development (stdout) and deployments with a
//! log directory (daily rolling files).

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger at `info`
pub fn init_logger() -> bool {
    init_logger_with_file(None, None)
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG` wins over `log_level` when set. Returns `false` if a global
/// subscriber was already installed.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) -> bool {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir_str) = log_dir.and_then(existing_dir) {
        let file_appender = tracing_appender::rolling::daily(dir_str, "venue-edge");
        return subscriber
            .with_ansi(false)
            .with_writer(file_appender)
            .try_init()
            .is_ok();
    }

    subscriber.try_init().is_ok()
}

fn existing_dir(dir: &str) -> Option<&str> {
    let path = Path::new(dir);
    if path.is_dir() { path.to_str() } else { None }
}
