//! Logging and tracing configuration
//!
//! This module provides centralized logging configuration for the processor.
//! Console output goes to stderr; when a log file is configured, a JSON layer
//! is written through a non-blocking `tracing-appender` writer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::types::{ConfigValidationError, LoggingSection};

/// Tracing target of events emitted by the `process-shapefiles` binary
const BINARY_TARGET: &str = "process_shapefiles";

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Default single-line text
    Full,
    /// Multi-line human readable output
    Pretty,
    /// Abbreviated single-line text
    Compact,
    /// Newline-delimited JSON
    Json,
}

impl LogFormat {
    /// Map a configured format name; unknown names fall back to [`LogFormat::Full`]
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some("compact") => LogFormat::Compact,
            _ => LogFormat::Full,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application
    pub level: Level,
    /// Console output format
    pub format: LogFormat,
    /// Log file path (JSON lines), if any
    pub log_file: Option<PathBuf>,
    /// Whether to enable span events
    pub enable_span_events: bool,
    /// Whether to enable ansi colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Full,
            log_file: None,
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a logging configuration from the `logging` config section
    pub fn from_section(section: &LoggingSection) -> Result<Self, ConfigValidationError> {
        let mut config = Self::new()
            .with_level(section.tracing_level()?)
            .with_format(LogFormat::from_name(section.format.as_deref()));
        if let Some(file) = &section.file {
            config = config.with_file_logging(file);
        }
        Ok(config)
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the console format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable file logging
    pub fn with_file_logging(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Initialize the global tracing subscriber
    ///
    /// The returned guard flushes the log file on drop and must be held for
    /// the lifetime of the run.
    pub fn init(self) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = if let Some(filter) = &self.env_filter {
            EnvFilter::try_new(filter)?
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(format!(
                    "{crate_name}={level},{BINARY_TARGET}={level}",
                    crate_name = env!("CARGO_PKG_NAME").replace('-', "_"),
                    level = self.level
                ))
            })
        };

        let registry = Registry::default().with(env_filter);

        let mut guard = None;
        let file_layer = match &self.log_file {
            Some(path) => {
                let (directory, file_name) = split_log_path(path)?;
                fs::create_dir_all(&directory)?;
                let (file_writer, file_guard) = non_blocking(rolling::never(directory, file_name));
                guard = Some(file_guard);
                Some(
                    fmt::layer()
                        .json()
                        .with_writer(file_writer)
                        .with_ansi(false)
                        .with_span_events(self.span_events()),
                )
            }
            None => None,
        };

        let registry = registry.with(file_layer);

        match self.format {
            LogFormat::Json => {
                let layer = fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_span_events(self.span_events());
                registry.with(layer).try_init()?;
            }
            LogFormat::Pretty => {
                let layer = fmt::layer()
                    .pretty()
                    .with_writer(io::stderr)
                    .with_ansi(self.enable_ansi)
                    .with_span_events(self.span_events());
                registry.with(layer).try_init()?;
            }
            LogFormat::Compact => {
                let layer = fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_ansi(self.enable_ansi)
                    .with_span_events(self.span_events());
                registry.with(layer).try_init()?;
            }
            LogFormat::Full => {
                let layer = fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(self.enable_ansi)
                    .with_span_events(self.span_events());
                registry.with(layer).try_init()?;
            }
        }

        info!(level = %self.level, format = ?self.format, "Logging initialized");
        Ok(guard)
    }
}

fn split_log_path(path: &Path) -> io::Result<(PathBuf, PathBuf)> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log file path has no file name: {}", path.display()),
        )
    })?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, PathBuf::from(file_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_creation() {
        let config = LoggingConfig::new();
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, LogFormat::Full);
        assert!(config.log_file.is_none());
        assert!(!config.enable_span_events);
        assert!(config.enable_ansi);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn test_logging_config_builder_pattern() {
        let config = LoggingConfig::new()
            .with_level(Level::DEBUG)
            .with_format(LogFormat::Json)
            .with_file_logging("logs/processing.log")
            .with_span_events()
            .without_ansi()
            .with_env_filter("debug");

        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_file, Some(PathBuf::from("logs/processing.log")));
        assert!(config.enable_span_events);
        assert!(!config.enable_ansi);
        assert_eq!(config.env_filter, Some("debug".to_string()));
    }

    #[test]
    fn test_from_logging_section() {
        let section = LoggingSection {
            level: "WARNING".to_string(),
            format: Some("{time} | {level} | {message}".to_string()),
            file: Some(PathBuf::from("logs/shapefile_processing.log")),
        };

        let config = LoggingConfig::from_section(&section).unwrap();
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.format, LogFormat::Full);
        assert_eq!(config.log_file, Some(PathBuf::from("logs/shapefile_processing.log")));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(LogFormat::from_name(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::from_name(Some("pretty")), LogFormat::Pretty);
        assert_eq!(LogFormat::from_name(Some("compact")), LogFormat::Compact);
        assert_eq!(LogFormat::from_name(None), LogFormat::Full);
    }

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("logs/run.log")).unwrap();
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(name, PathBuf::from("run.log"));

        let (dir, name) = split_log_path(Path::new("run.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, PathBuf::from("run.log"));
    }
}
