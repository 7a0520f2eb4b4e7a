//! Logging system configuration and initialization
//!
//! This module provides the logging setup with:
//! - Console output on stderr
//! - Optional daily-rolling file output, plain or JSON
//! - `RUST_LOG` override of the configured level
//! - Timestamps rendered in the listing's timezone

use anyhow::{Result, anyhow};
use chrono::Utc;
use chrono_tz::Tz;
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

const LOG_FILE_NAME: &str = "showtime-calendar.log";

/// Dependencies that are only interesting at TRACE level
const QUIET_TARGETS: [&str; 5] = ["reqwest", "hyper", "hyper_util", "html5ever", "selectors"];

// Global guard to keep the log file writer alive
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<tracing_appender::non_blocking::WorkerGuard>> =
        Mutex::new(Vec::new());
}

/// Time formatter that renders log timestamps in a fixed zone
struct ZonedTimeFormatter(Tz);

impl FormatTime for ZonedTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Utc::now().with_timezone(&self.0);
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S%.3f %Z"))
    }
}

/// Get the log directory relative to the executable location
pub fn get_log_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(std::path::Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    exe_dir.join("logs")
}

/// Filter for the configured level with noisy dependencies capped at WARN.
///
/// `RUST_LOG`, when set, replaces the whole filter:
/// ```bash
/// RUST_LOG="debug,html5ever=trace" showtime-calendar out.ics
/// ```
pub fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(level)
        .map_err(|e| anyhow!("Invalid log level '{}': {}", level, e))?;

    if !level.to_lowercase().contains("trace") {
        for target in QUIET_TARGETS {
            filter = filter.add_directive(format!("{target}=warn").parse()?);
        }
    }

    Ok(filter)
}

/// Initialize the logging system with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LoggingConfig::default(), chrono_tz::UTC)
}

/// Initialize logging with custom configuration
pub fn init_logging_with_config(config: &LoggingConfig, timezone: Tz) -> Result<()> {
    if !config.console_output && !config.file_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = build_env_filter(&config.level)?;

    let console_layer = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(ZonedTimeFormatter(timezone))
            .with_target(false)
    });

    let log_dir = config.log_dir.clone().unwrap_or_else(get_log_directory);
    let file_layer = if config.file_output {
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

        let (file_writer, file_guard) = non_blocking(rolling::daily(&log_dir, LOG_FILE_NAME));
        LOG_GUARDS
            .lock()
            .map_err(|_| anyhow!("Log guard registry is poisoned"))?
            .push(file_guard);

        let layer = fmt::layer()
            .with_writer(file_writer)
            .with_timer(ZonedTimeFormatter(timezone))
            .with_ansi(false);

        Some(if config.json_format {
            layer.json().with_file(true).with_line_number(true).boxed()
        } else {
            layer.with_target(false).boxed()
        })
    } else {
        None
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    if config.file_output {
        info!("Log directory: {:?}", log_dir);
        info!("JSON format: {}", config.json_format);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
        assert!(!config.file_output);
    }

    #[test]
    fn test_log_directory_location() {
        let log_dir = get_log_directory();
        assert!(log_dir.to_string_lossy().ends_with("logs"));
    }

    #[test]
    fn test_build_filter_accepts_levels() {
        assert!(build_env_filter("debug").is_ok());
        assert!(build_env_filter("trace").is_ok());
    }

    #[test]
    fn test_no_output_is_rejected() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(&config, chrono_tz::UTC).is_err());
    }
}
