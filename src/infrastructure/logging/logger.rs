use anyhow::{anyhow, Result};
use std::io;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use super::config::{LogFormat, RotationPolicy};
use crate::domain::models::LoggingConfig;

const LOG_FILE: &str = "cogmesh.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logger implementation using tracing
///
/// Holds the appender guard; dropping the logger flushes pending file writes.
pub struct LoggerImpl {
    _guard: Option<WorkerGuard>,
}

impl LoggerImpl {
    /// Initialize the global subscriber from configuration.
    ///
    /// Console output goes to stderr so that command output on stdout stays
    /// machine readable. `RUST_LOG` directives override the configured level.
    ///
    /// # Errors
    /// Returns an error for an invalid level, format or rotation, or when a
    /// global subscriber is already installed.
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let (layers, guard) = Self::build_layers(config)?;

        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .map_err(|e| anyhow!("failed to install subscriber: {e}"))?;

        tracing::debug!(
            level = %config.level,
            format = %config.format,
            file_output = config.log_dir.is_some(),
            "logger initialized"
        );

        Ok(Self { _guard: guard })
    }

    fn build_layers(config: &LoggingConfig) -> Result<(Vec<BoxedLayer>, Option<WorkerGuard>)> {
        let default_level = parse_log_level(&config.level)?;
        let format: LogFormat = config.format.parse().map_err(|e: String| anyhow!(e))?;
        let rotation: RotationPolicy = config.rotation.parse().map_err(|e: String| anyhow!(e))?;

        let filter = || {
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy()
        };

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if let Some(ref log_dir) = config.log_dir {
            let appender = match rotation {
                RotationPolicy::Daily => rolling::daily(log_dir, LOG_FILE),
                RotationPolicy::Hourly => rolling::hourly(log_dir, LOG_FILE),
                RotationPolicy::Never => rolling::never(log_dir, LOG_FILE),
            };
            let (writer, file_guard) = tracing_appender::non_blocking(appender);
            guard = Some(file_guard);

            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(filter())
                    .boxed(),
            );
        }

        if config.enable_stdout {
            let console: BoxedLayer = match format {
                LogFormat::Json => tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_current_span(true)
                    .with_target(true)
                    .with_filter(filter())
                    .boxed(),
                LogFormat::Pretty => tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_filter(filter())
                    .boxed(),
            };
            layers.push(console);
        }

        Ok((layers, guard))
    }
}

/// Parse log level string to Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert!(matches!(parse_log_level("trace"), Ok(Level::TRACE)));
        assert!(matches!(parse_log_level("debug"), Ok(Level::DEBUG)));
        assert!(matches!(parse_log_level("info"), Ok(Level::INFO)));
        assert!(matches!(parse_log_level("warn"), Ok(Level::WARN)));
        assert!(matches!(parse_log_level("error"), Ok(Level::ERROR)));
        assert!(matches!(parse_log_level("TRACE"), Ok(Level::TRACE)));
        assert!(parse_log_level("invalid").is_err());
    }

    #[test]
    fn test_layers_for_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            log_dir: Some(dir.path().to_path_buf()),
            enable_stdout: false,
            rotation: "never".to_string(),
            ..LoggingConfig::default()
        };

        let (layers, guard) = LoggerImpl::build_layers(&config).unwrap();
        assert_eq!(layers.len(), 1);
        assert!(guard.is_some());
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let config = LoggingConfig {
            format: "xml".to_string(),
            ..LoggingConfig::default()
        };
        assert!(LoggerImpl::build_layers(&config).is_err());
    }

    #[test]
    fn test_logger_init_stdout_only() {
        // Only one global subscriber per process; the second install errors.
        let config = LoggingConfig::default();
        let _first = LoggerImpl::init(&config);
        assert!(LoggerImpl::init(&config).is_err());
    }
}
