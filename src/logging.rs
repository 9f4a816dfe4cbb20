//! Structured logging setup for the CLI
//!
//! Library code only emits `tracing` events; installing a subscriber is up
//! to the binary. Logs go to stderr so stdout stays clean for `dump` and
//! `template` output.

use std::str::FromStr;

use tracing::debug;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

const LEVEL_VAR: &str = "TILEMAP_LOG_LEVEL";
const FORMAT_VAR: &str = "TILEMAP_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_source: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable
    Pretty,
    /// One line per event
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            include_source: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from `TILEMAP_LOG_LEVEL` and `TILEMAP_LOG_FORMAT`.
    /// Unparseable values keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup(LEVEL_VAR) {
            if let Ok(parsed_level) = LogLevel::from_str(&level) {
                config.level = parsed_level;
            }
        }

        if let Some(format) = lookup(FORMAT_VAR) {
            if let Ok(parsed_format) = LogFormat::from_str(&format) {
                config.format = parsed_format;
            }
        }

        config
    }

    /// Raise the level to at least `debug` (the CLI's `--verbose`).
    pub fn verbose(mut self) -> Self {
        if matches!(self.level, LogLevel::Info | LogLevel::Warn | LogLevel::Error) {
            self.level = LogLevel::Debug;
        }
        self.include_source = true;
        self
    }

    fn filter_directive(&self) -> String {
        format!("warn,tilemap_config={}", self.level.as_str())
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_file(config.include_source)
            .with_line_number(config.include_source)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(config.include_source)
            .with_line_number(config.include_source)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()?;

    debug!(?config, "Logging initialized");
    Ok(())
}
