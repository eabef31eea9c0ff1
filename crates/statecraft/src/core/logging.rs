//! Logging infrastructure for automaton processing
//!
//! Structured logging is provided by the `tracing` crate. Every public
//! operation of the engine opens a span (`subset_construction`, `minimize`,
//! `describe`, ...) and emits `debug!`/`trace!` events for discovered
//! states and refinement rounds. This module only installs a subscriber;
//! library code never does so on its own.
//!
//! # Usage
//!
//! ```rust
//! use statecraft::core::logging::init_logging;
//!
//! // Initialize with default settings
//! let _ = init_logging(None, None);
//!
//! // Or with custom level and format
//! let _ = init_logging(Some("debug"), Some("pretty"));
//! ```
//!
//! # Log Formats
//!
//! - `compact`: Single-line format, good for production
//! - `pretty`: Multi-line format with colors, good for development
//! - `json`: JSON format, good for log aggregation systems
//!
//! # Environment Variables
//!
//! - `STATECRAFT_LOG_LEVEL`: Set log level (trace|debug|info|warn|error|off)
//! - `STATECRAFT_LOG_FORMAT`: Set log format (compact|pretty|json)
//! - `RUST_LOG`: Standard `tracing-subscriber` filter, also honored
//!
//! # Filtering Logs
//!
//! ```bash
//! # Watch every refinement round of the minimizer
//! RUST_LOG="statecraft::automaton::minimize=trace" statecraft minimize -i table.fa
//! ```

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Initialize the tracing subscriber with the given log level and format
///
/// # Arguments
///
/// * `level` - Optional log level string. If None, uses `STATECRAFT_LOG_LEVEL`
///   or `RUST_LOG`, or defaults to `warn`.
/// * `format` - Optional log format (compact|pretty|json). If None, uses
///   `STATECRAFT_LOG_FORMAT`, or defaults to `compact`.
///
/// # Returns
///
/// Returns an error if the format is unknown or a global subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = level
        .map(|s| s.to_string())
        .or_else(|| std::env::var("STATECRAFT_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "warn".to_string());

    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var("STATECRAFT_LOG_FORMAT").ok())
        .unwrap_or_else(|| "compact".to_string());

    let filter = if log_level == "off" {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&log_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let format =
        LogFormat::from_str(&log_format).map_err(|e| format!("Invalid log format: {}", e))?;

    // Logs go to stderr so rendered automata on stdout stay pipeable
    match format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_level(true)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}
