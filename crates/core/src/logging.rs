//! Logging infrastructure.
//!
//! Initializes the tracing subscriber. All logs go to stderr so stdout stays
//! free for envelope output.

use std::io::IsTerminal;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Configuration(format!(
                "Unknown log format: {}. Supported: pretty, json",
                other
            ))),
        }
    }
}

/// Settings consumed by [`init_logging`].
#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    /// Filter directive override (e.g. "debug", "pagechunk_chunking=trace")
    pub level: Option<String>,
    pub format: LogFormat,
    pub no_color: bool,
}

impl LogSettings {
    /// Resolve the filter directive: explicit level, then `RUST_LOG`, then `info`.
    pub fn filter_directive(&self) -> String {
        self.level
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string())
    }
}

/// Initialize the global tracing subscriber.
///
/// Fails with a configuration error when the filter directive does not parse
/// or when a global subscriber is already installed.
///
/// # Example
/// ```no_run
/// use pagechunk_core::logging::{init_logging, LogSettings};
///
/// init_logging(&LogSettings::default()).expect("Failed to initialize logging");
/// ```
pub fn init_logging(settings: &LogSettings) -> AppResult<()> {
    let directive = settings.filter_directive();
    let env_filter = EnvFilter::try_new(&directive)
        .map_err(|e| AppError::Configuration(format!("Invalid log filter '{}': {}", directive, e)))?;

    let ansi = !settings.no_color && supports_color();

    let result = match settings.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(ansi),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(false),
            )
            .try_init(),
    };

    result.map_err(|e| AppError::Configuration(format!("Failed to init logging: {}", e)))
}

/// Colour only when NO_COLOR is unset and stderr is a terminal.
fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}
