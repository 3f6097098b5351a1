//! Shared configuration for the Refract toolchain.
//!
//! Values are layered by `ortho_config`, lowest precedence first:
//!
//! 1. built-in defaults;
//! 2. a TOML file named by `--config-path` or `REFRACT_CONFIG_PATH`;
//! 3. `REFRACT_*` environment variables;
//! 4. command-line flags such as `--max-replacements`.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_MAX_REPLACEMENTS, default_log_filter, default_log_filter_string,
    default_log_format, default_max_replacements,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration for Refract binaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "REFRACT")]
pub struct Config {
    /// `tracing` filter expression, e.g. `info` or `refract_cli=debug`.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log events.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Replacements allowed before a transformation is declared
    /// non-terminating.
    #[serde(default = "default_max_replacements")]
    #[ortho_config(default = default_max_replacements())]
    pub max_replacements: usize,
}

impl Config {
    /// Returns the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the replacement bound.
    #[must_use]
    pub const fn max_replacements(&self) -> usize {
        self.max_replacements
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            max_replacements: DEFAULT_MAX_REPLACEMENTS,
        }
    }
}
