//! Logging infrastructure for diagram export
//!
//! Structured logging built on `tracing`. The export pipeline opens one INFO
//! span per request and DEBUG spans per stage; non-fatal diagnostics are also
//! emitted as WARN events so they show up without extra wiring.
//!
//! # Usage
//!
//! ```rust,no_run
//! use umlgen::core::logging::init_logging;
//!
//! init_logging(Some("debug"), Some("pretty")).ok();
//! ```
//!
//! # Log Formats
//!
//! - `compact`: single line, the default
//! - `pretty`: multi-line with source locations
//! - `json`: one JSON object per event
//!
//! # Environment Variables
//!
//! - `UMLGEN_LOG_LEVEL`: log level or filter directive
//! - `RUST_LOG`: standard `tracing-subscriber` filter
//! - `UMLGEN_LOG_FORMAT`: `compact|pretty|json`
//!
//! # Filtering Logs
//!
//! ```bash
//! # Only the relation analyzer at debug level
//! RUST_LOG="info,umlgen::analysis=debug" umlgen export --input request.json
//! ```

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

pub const LEVEL_ENV: &str = "UMLGEN_LOG_LEVEL";
pub const FORMAT_ENV: &str = "UMLGEN_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line format
    #[default]
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Resolved logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub directive: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve settings from explicit values, falling back to the environment
    ///
    /// Level precedence: argument, `UMLGEN_LOG_LEVEL`, `RUST_LOG`, `info`.
    /// Format precedence: argument, `UMLGEN_LOG_FORMAT`, `compact`.
    pub fn resolve(level: Option<&str>, format: Option<&str>) -> Result<Self, String> {
        let directive = level
            .map(str::to_string)
            .or_else(|| std::env::var(LEVEL_ENV).ok())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string());

        let format = match format
            .map(str::to_string)
            .or_else(|| std::env::var(FORMAT_ENV).ok())
        {
            Some(raw) => {
                LogFormat::from_str(&raw).map_err(|e| format!("Invalid log format: {}", e))?
            }
            None => LogFormat::default(),
        };

        Ok(Self { directive, format })
    }

    fn filter(&self) -> EnvFilter {
        if self.directive == "off" {
            return EnvFilter::new("off");
        }
        EnvFilter::try_new(&self.directive).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given log level and format
///
/// Returns an error for an unknown format or when a global subscriber is
/// already installed. It never panics, so tests may call it repeatedly.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = LogSettings::resolve(level, format)?;
    let registry = Registry::default().with(settings.filter());

    match settings.format {
        LogFormat::Compact => registry
            .with(
                fmt::Layer::default()
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(
                fmt::Layer::default()
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::Layer::default()
                    .json()
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()?,
    }

    Ok(())
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
