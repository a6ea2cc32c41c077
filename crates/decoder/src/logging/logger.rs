// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use rolling_file::*;
use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the active log file inside the log directory.
pub const LOG_FILE_NAME: &str = "chronos-decoder.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log level '{level}': {source}")]
    InvalidLogLevel {
        level: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to create log directory or file appender: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to install the global subscriber: {0}")]
    InitError(#[from] tracing_subscriber::util::TryInitError),
}

/// Configuration for logging initialization
pub struct LoggingConfig<'a> {
    pub level: &'a str,
    pub json_format: bool,
    pub strip_ansi: bool,
    pub write_to_file: bool,
    pub write_path: &'a str,
    pub write_max_file_size: u64,
    pub write_max_files: usize,
}

impl<'a> From<&'a config::LogConfig> for LoggingConfig<'a> {
    fn from(log: &'a config::LogConfig) -> Self {
        Self {
            level: &log.level,
            json_format: log.json,
            strip_ansi: log.strip_ansi,
            write_to_file: log.write,
            write_path: &log.write_path,
            write_max_file_size: log.write_max_file_size,
            write_max_files: log.write_max_files,
        }
    }
}

/// Builds the level filter. `RUST_LOG`-style directives are accepted too,
/// e.g. `info,chronos_decoder::cache=debug`.
pub fn level_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|source| LoggingError::InvalidLogLevel {
        level: level.to_string(),
        source,
    })
}

/// Initialize tracing/logging with the specified configuration.
///
/// Returns the guard of the file writer when file output is enabled; buffered
/// lines are flushed when it is dropped, so keep it alive until exit.
///
/// # Log Rotation
/// When the log file reaches `write_max_file_size` it is rotated to
/// `chronos-decoder.log.1`, `.2` and so on, keeping `write_max_files` files
/// including the active one.
pub fn init_with_config(config: LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = level_filter(config.level)?;
    let registry = tracing_subscriber::registry().with(filter);

    if !config.write_to_file {
        if config.json_format {
            registry.with(fmt::layer().json()).try_init()?;
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_ansi(!config.strip_ansi),
                )
                .try_init()?;
        }
        return Ok(None);
    }

    std::fs::create_dir_all(config.write_path)?;

    let log_file_path = PathBuf::from(config.write_path).join(LOG_FILE_NAME);
    // write_max_files counts the active file
    let rotated_files_count = config.write_max_files.saturating_sub(1);
    let file_appender = BasicRollingFileAppender::new(
        log_file_path,
        RollingConditionBasic::new().max_size(config.write_max_file_size),
        rotated_files_count,
    )?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    if config.json_format {
        registry
            .with(fmt::layer().json())
            .with(fmt::layer().json().with_writer(non_blocking))
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(!config.strip_ansi),
            )
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .try_init()?;
    }

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        assert!(level_filter("debug").is_ok());
        assert!(level_filter("info,chronos_decoder::cache=trace").is_ok());
        assert!(matches!(
            level_filter("chronos_decoder=loud"),
            Err(LoggingError::InvalidLogLevel { .. })
        ));
    }

    #[test]
    fn test_from_log_config() {
        let log = config::LogConfig {
            level: "warn".to_string(),
            write: true,
            write_max_files: 3,
            ..Default::default()
        };

        let logging = LoggingConfig::from(&log);
        assert_eq!(logging.level, "warn");
        assert!(logging.write_to_file);
        assert_eq!(logging.write_path, "./logs");
        assert_eq!(logging.write_max_files, 3);
    }
}
