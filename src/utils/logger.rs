//! Logging Infrastructure
//!
//! Structured logging setup for development and production environments.

use tracing_subscriber::EnvFilter;

/// Initialize the logger
///
/// `LOG_LEVEL` (or `RUST_LOG` with full filter syntax) controls verbosity;
/// defaults to `info`.
pub fn init_logger() {
    init_logger_with_level(None);
}

/// Initialize the logger with an explicit default level
pub fn init_logger_with_level(log_level: Option<&str>) {
    let default = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}
