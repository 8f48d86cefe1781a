//! Logging infrastructure for Anchorage.
//!
//! Logging is configured from the environment and emitted through `tracing`.
//!
//! # Environment Variables
//!
//! - `ANCHORAGE_DEBUG=true|1|yes` - Enable debug logging
//! - `ANCHORAGE_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific log level
//! - `ANCHORAGE_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use anchorage_query::logging::{self, LogConfig, LogFormat};
//!
//! // Initialize from the environment (call once at startup)
//! logging::init();
//!
//! // Or with explicit settings
//! logging::init_with(LogConfig::default().level("trace").format(LogFormat::Pretty));
//! ```
//!
//! Plan construction emits `trace` events when directives are built, chained and
//! cloned, and `debug` events when a query model is cloned or re-linked. Use the
//! [`anchorage_trace!`](crate::anchorage_trace) and
//! [`anchorage_debug!`](crate::anchorage_debug) macros for events that should
//! only fire when `ANCHORAGE_DEBUG` is set.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

const DEBUG_VAR: &str = "ANCHORAGE_DEBUG";
const LEVEL_VAR: &str = "ANCHORAGE_LOG_LEVEL";
const FORMAT_VAR: &str = "ANCHORAGE_LOG_FORMAT";

/// Output format for the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human readable output.
    Pretty,
    /// Single-line human readable output.
    Compact,
}

impl LogFormat {
    /// Parse a format name, falling back to JSON for anything unrecognised.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        }
    }

    /// Get the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether debug logging was requested.
    pub debug: bool,
    /// Explicit level, if one was configured.
    pub level: Option<&'static str>,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: None,
            format: LogFormat::Json,
        }
    }
}

impl LogConfig {
    /// Read the configuration from `ANCHORAGE_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            debug: is_debug_enabled(),
            level: env::var(LEVEL_VAR).ok().and_then(|l| parse_level(&l)),
            format: env::var(FORMAT_VAR)
                .map(|f| LogFormat::parse(&f))
                .unwrap_or_default(),
        }
    }

    /// Enable or disable debug logging.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the log level. Unknown levels are ignored.
    pub fn level(mut self, level: &str) -> Self {
        self.level = parse_level(level);
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// The level that will actually be used.
    ///
    /// An explicit level wins; otherwise `debug` when debugging, else `warn`.
    pub fn effective_level(&self) -> &'static str {
        match self.level {
            Some(level) => level,
            None if self.debug => "debug",
            None => "warn",
        }
    }

    /// Whether any logging was requested at all.
    pub fn is_enabled(&self) -> bool {
        self.debug || self.level.is_some()
    }
}

fn parse_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Check if debug logging is enabled via `ANCHORAGE_DEBUG`.
///
/// Returns `true` if it is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var(DEBUG_VAR)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Initialize logging from the environment.
///
/// Subsequent calls (to this or [`init_with`]) are no-ops.
pub fn init() {
    init_with(LogConfig::from_env());
}

/// Initialize logging with an explicit configuration.
///
/// Does nothing when the configuration requests no logging, or when the
/// `tracing-subscriber` feature is disabled; in that case events reach
/// whatever subscriber the application installed itself.
pub fn init_with(config: LogConfig) {
    INIT.call_once(|| {
        if !config.is_enabled() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = config.effective_level();
            let filter = EnvFilter::try_new(format!(
                "anchorage={},anchorage_query={}",
                level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let registry = tracing_subscriber::registry().with(filter);
            let installed = match config.format {
                LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
                LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
                LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = config.format.as_str(),
                    "Anchorage logging initialized"
                );
            }
        }
    });
}

/// Conditional debug logging, only emitted when `ANCHORAGE_DEBUG` is enabled.
#[macro_export]
macro_rules! anchorage_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}

/// Conditional trace logging, only emitted when `ANCHORAGE_DEBUG` is enabled.
#[macro_export]
macro_rules! anchorage_trace {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            tracing::trace!($($arg)*);
        }
    };
}
