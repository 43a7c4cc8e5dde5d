//! Logging setup for the sobind CLI
//!
//! This module provides:
//! - Session ID generation and tracking
//! - Structured logging setup on stderr
//! - Performance timing spans
//!
//! Logs always go to stderr so that stdout carries only command results
//! (and whatever the library itself prints).

use crate::config;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Global session ID for this invocation
static SESSION_ID: OnceLock<String> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Enable console output
    pub console: bool,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact format for production
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "full" => Some(Self::Full),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            thread_ids: false,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {
                config.level = "warn".to_string();
            }
            1 => {
                config.level = "info".to_string();
            }
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
            }
        }

        config
    }

    /// Apply the `logging` section of the config file
    ///
    /// The file's level only applies when no `-v` flag was given.
    pub fn merge_with_file(&mut self, file: &config::LoggingConfig, verbosity: u8) {
        if verbosity == 0 {
            if let Some(level) = &file.level {
                self.level = level.clone();
            }
        }
        if let Some(format) = file.format.as_deref() {
            match LogFormat::parse(format) {
                Some(format) => self.format = format,
                None => eprintln!("Warning: invalid log format in config: {}", format),
            }
        }
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        // RUST_LOG takes precedence
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        if let Ok(format) = std::env::var("SOBIND_LOG_FORMAT") {
            match LogFormat::parse(&format) {
                Some(format) => self.format = format,
                None => eprintln!("Warning: invalid SOBIND_LOG_FORMAT: {}", format),
            }
        }
    }
}

/// Initialize the global logging system
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::config(format!("Invalid log filter '{}': {}", config.level, e)))?;
    let ansi = config.console && std::io::stderr().is_terminal();

    // Each format produces a different subscriber type
    let installed = match config.format {
        LogFormat::Compact => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .compact()
                .finish(),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .json()
                .finish(),
        ),
        LogFormat::Full => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .finish(),
        ),
    };
    installed.map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(
        session_id = session_id(),
        config = ?config,
        "Logging system initialized"
    );

    Ok(())
}

/// Generate a unique ID for this session
pub fn generate_session_id() -> String {
    format!("sess_{}", Uuid::new_v4().simple())
}

/// The session ID for this process, generated on first use
pub fn session_id() -> &'static str {
    SESSION_ID.get_or_init(generate_session_id)
}

/// Create a span carrying the session ID and a duration slot
pub fn create_operation_span(operation: &str) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        session_id = session_id(),
        duration_ms = field::Empty,
    )
}

/// Performance timing utilities
pub mod timing {
    use std::time::{Duration, Instant};
    use tracing::span::EnteredSpan;

    /// A timer that logs its duration when dropped
    ///
    /// The operation span stays entered for the timer's lifetime, so events
    /// logged meanwhile carry the operation name and session ID.
    pub struct Timer {
        start: Instant,
        span: EnteredSpan,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation).entered(),
                operation: operation.to_string(),
            }
        }

        /// Elapsed time so far
        pub fn elapsed(&self) -> Duration {
            self.start.elapsed()
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SharedBuffer;

    #[test]
    fn test_logging_config_from_verbosity() {
        let config = LoggingConfig::from_verbosity(0);
        assert_eq!(config.level, "warn");
        assert!(!config.source_location);

        let config = LoggingConfig::from_verbosity(2);
        assert_eq!(config.level, "debug");
        assert!(config.source_location);

        let config = LoggingConfig::from_verbosity(3);
        assert_eq!(config.level, "trace");
        assert_eq!(config.format, LogFormat::Full);
        assert!(config.thread_ids);
    }

    #[test]
    fn test_file_level_yields_to_verbosity_flag() {
        let file = config::LoggingConfig {
            level: Some("error".to_string()),
            format: Some("json".to_string()),
        };

        let mut quiet = LoggingConfig::from_verbosity(0);
        quiet.merge_with_file(&file, 0);
        assert_eq!(quiet.level, "error");
        assert_eq!(quiet.format, LogFormat::Json);

        let mut verbose = LoggingConfig::from_verbosity(1);
        verbose.merge_with_file(&file, 1);
        assert_eq!(verbose.level, "info");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn test_session_id_format() {
        let id = generate_session_id();
        assert!(id.starts_with("sess_"));
        assert_eq!(id.len(), "sess_".len() + 32);
    }

    #[test]
    fn test_events_inside_timer_carry_session_id() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let _timer = timing::Timer::new("greet");
            tracing::info!("calling into the library");
        });

        let logs = buffer.contents();
        let line = logs
            .lines()
            .find(|l| l.contains("calling into the library"))
            .unwrap();
        assert!(line.contains("greet"));
        assert!(line.contains(session_id()));
        assert!(logs.contains("Operation completed"));
    }

    #[test]
    fn test_session_id_is_stable() {
        assert_eq!(session_id(), session_id());
        assert!(session_id().starts_with("sess_"));
    }

    #[test]
    fn test_timer_measures_elapsed_time() {
        let timer = timing::Timer::new("test");
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(timer.elapsed().as_millis() >= 2);
    }
}
