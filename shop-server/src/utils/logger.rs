//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use std::path::Path;
use std::time::{Duration, SystemTime};

/// Rolling log file prefix
const LOG_FILE_PREFIX: &str = "shop-server";

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional JSON output and file output
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Add file output if log_dir is provided
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, LOG_FILE_PREFIX);
            if json == Some(true) {
                subscriber.json().with_writer(file_appender).init();
            } else {
                subscriber.with_writer(file_appender).init();
            }
            return;
        }
    }

    if json == Some(true) {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Remove rolling log files older than `days`
///
/// Only files carrying the rolling prefix are touched; anything else in
/// the directory is left alone.
pub fn cleanup_old_logs(log_dir: &str, days: u64) -> std::io::Result<()> {
    let dir = Path::new(log_dir);
    if !dir.is_dir() {
        return Ok(());
    }

    let cutoff = SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with(LOG_FILE_PREFIX) {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        if modified < cutoff
            && let Err(e) = std::fs::remove_file(&path)
        {
            tracing::warn!("Failed to remove old log file {}: {}", name, e);
        }
    }

    Ok(())
}
