// --- File: crates/safari_common/src/logging.rs ---
//! Logging utilities for the safari frontend.
//!
//! One subscriber is installed per process: a formatted stdout layer, an
//! optional daily-rolling file layer and, on Linux, an optional journald
//! layer. `RUST_LOG` overrides the configured level.

use safari_config::LoggingConfig;
use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_NAME: &str = "safari-frontend.log";

/// Keeps the background file writer alive. Drop it only at shutdown.
#[must_use]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Parses a level name, falling back to INFO.
pub fn parse_level(level: &str) -> Level {
    level.trim().parse::<Level>().unwrap_or(Level::INFO)
}

fn build_filter(level: Level) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(format!("warn,safari={},tower_http={}", level, level)),
    }
}

/// Initialize the tracing subscriber from the `[logging]` config section.
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_from_config(config: &LoggingConfig) -> LogGuard {
    let level = parse_level(&config.level);

    let (file_layer, file_guard) = match config.directory.as_deref() {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(file_layer);

    #[cfg(target_os = "linux")]
    let registry = registry.with(journald_layer(config.journald));

    if registry.try_init().is_ok() {
        info!("Logging initialized at level: {}", level);
        if let Some(directory) = &config.directory {
            info!("Writing logs to {}/{}.*", directory, LOG_FILE_NAME);
        }
    }

    LogGuard { _file: file_guard }
}

/// Initialize stdout logging only, at a fixed level.
pub fn init_with_level(level: Level) -> LogGuard {
    init_from_config(&LoggingConfig {
        level: level.to_string(),
        ..LoggingConfig::default()
    })
}

#[cfg(target_os = "linux")]
fn journald_layer(enabled: bool) -> Option<tracing_journald::Layer> {
    if !enabled {
        return None;
    }
    match tracing_journald::layer() {
        Ok(layer) => Some(layer),
        Err(err) => {
            eprintln!("journald logging unavailable: {}", err);
            None
        }
    }
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result so it can be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }

    #[test]
    fn test_log_result_passes_value_through() {
        let ok: Result<u8, String> = log_result(Ok(7), "done", "failed");
        assert_eq!(ok, Ok(7));
        let err: Result<u8, String> = log_result(Err("boom".into()), "done", "failed");
        assert_eq!(err, Err("boom".to_string()));
    }
}
