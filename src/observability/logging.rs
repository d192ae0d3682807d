//! Logging configuration.

use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Selects the output format.
pub const ENV_LOG_FORMAT: &str = "GRAPHDB_LOG_FORMAT";
/// Appends log output to this file instead of stderr.
pub const ENV_LOG_FILE: &str = "GRAPHDB_LOG_FILE";
/// Standard `tracing` filter directives.
pub const ENV_RUST_LOG: &str = "RUST_LOG";

const DEFAULT_FILTER: &str = "warn,graphdb=info";
const VERBOSE_FILTER: &str = "info,graphdb=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Returns the format name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(Error::InvalidInput(format!("unknown log format: {other}"))),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directives.
    pub filter: String,
    /// Append to this file instead of writing to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_FILTER.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds the configuration from the process environment.
    #[must_use]
    pub fn from_env(verbose: bool) -> Self {
        Self::from_lookup(verbose, |key| std::env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup.
    ///
    /// An unparseable format falls back to pretty output with a warning.
    #[must_use]
    pub fn from_lookup<F>(verbose: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let format = env(ENV_LOG_FORMAT)
            .and_then(|raw| {
                raw.parse()
                    .inspect_err(|e| tracing::warn!(error = %e, "ignoring {ENV_LOG_FORMAT}"))
                    .ok()
            })
            .unwrap_or_default();

        let default_filter = if verbose {
            VERBOSE_FILTER
        } else {
            DEFAULT_FILTER
        };
        let filter = env(ENV_RUST_LOG).unwrap_or_else(|| default_filter.to_string());

        Self {
            format,
            filter,
            file: env(ENV_LOG_FILE).map(PathBuf::from),
        }
    }

    /// Sets the output format.
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}
