//! Structured logging configuration.
//!
//! Text output by default; JSON when `logging.json` is set, one object per
//! line:
//!
//! ```json
//! {"timestamp":"2024-01-15T10:30:00.000Z","level":"INFO","fields":{"message":"Write benchmark finished","records":10000},"target":"uuidbench_runner::runner"}
//! ```
//!
//! `RUST_LOG` overrides the configured level.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

/// Configuration for structured logging.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Whether to use JSON format (true) or text format (false)
    pub json_format: bool,
    /// The default log level if RUST_LOG is not set
    pub default_level: Level,
    /// Whether to include span events (enter/exit)
    pub include_spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json_format: false,
            default_level: Level::INFO,
            include_spans: false,
        }
    }
}

impl LoggingConfig {
    /// Builds the logging configuration from the `logging` settings section.
    pub fn from_settings(settings: &crate::config::LoggingSettings) -> Self {
        Self {
            json_format: settings.json,
            default_level: parse_log_level(&settings.level),
            include_spans: settings.spans,
        }
    }
}

/// Initialize the global subscriber.
///
/// Only the first call installs a subscriber; later calls are no-ops.
pub fn init_logging(config: LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));

    let span_events = if config.include_spans {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_current_span(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        );

        // Try to set as global default, ignore if already set
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .with_span_events(span_events)
                .with_target(true),
        );

        // Try to set as global default, ignore if already set
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// Creates a JSON subscriber writing to `writer`, for capturing log output in tests.
pub fn create_json_subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::new("trace"))
        .with(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_current_span(true),
        )
}

/// Parse log level from string, falling back to INFO.
pub fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// A writer that captures output to a shared buffer.
    #[derive(Clone)]
    pub(crate) struct CaptureWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl CaptureWriter {
        pub(crate) fn new() -> Self {
            Self {
                buffer: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn get_output(&self) -> String {
            let buffer = self.buffer.lock().unwrap();
            String::from_utf8_lossy(&buffer).to_string()
        }
    }

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let mut buffer = self.buffer.lock().unwrap();
            buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(!config.json_format);
        assert_eq!(config.default_level, Level::INFO);
        assert!(!config.include_spans);
    }

    #[test]
    fn test_logging_config_from_settings() {
        let settings = crate::config::LoggingSettings {
            level: "WARN".to_string(),
            json: true,
            spans: false,
        };
        let config = LoggingConfig::from_settings(&settings);
        assert!(config.json_format);
        assert_eq!(config.default_level, Level::WARN);
        assert!(!config.include_spans);

        let settings = crate::config::LoggingSettings {
            level: "debug".to_string(),
            json: false,
            spans: true,
        };
        let config = LoggingConfig::from_settings(&settings);
        assert_eq!(config.default_level, Level::DEBUG);
        assert!(config.include_spans);
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("trace"), Level::TRACE);
        assert_eq!(parse_log_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_log_level("Info"), Level::INFO);
        assert_eq!(parse_log_level("warn"), Level::WARN);
        assert_eq!(parse_log_level("error"), Level::ERROR);
        assert_eq!(parse_log_level("nonsense"), Level::INFO);
    }

    #[test]
    fn test_structured_logs_are_json_formatted() {
        use tracing::info;

        let writer = CaptureWriter::new();
        let subscriber = create_json_subscriber(writer.clone());

        tracing::subscriber::with_default(subscriber, || {
            info!(records = 25_000u64, batch_size = 10_000u64, "Write benchmark finished");
        });

        let output = writer.get_output();
        assert!(!output.is_empty(), "Should have captured log output");

        for line in output.lines().filter(|l| !l.is_empty()) {
            let json: serde_json::Value = serde_json::from_str(line)
                .unwrap_or_else(|e| panic!("Log line should be valid JSON: {line} ({e})"));
            assert!(json.get("level").is_some());
            assert!(json.get("target").is_some());
            assert_eq!(json["fields"]["records"], 25_000);
        }
    }
}
