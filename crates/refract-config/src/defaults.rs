//! Default configuration values.

use crate::logging::LogFormat;

/// Default log filter expression. Warnings only, so rewritten text on stdout
/// is not drowned in diagnostics on stderr.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default replacement bound for a single transformation run.
pub const DEFAULT_MAX_REPLACEMENTS: usize = refract_syntax::DEFAULT_MAX_REPLACEMENTS;

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default replacement bound, for serde.
#[must_use]
pub const fn default_max_replacements() -> usize {
    DEFAULT_MAX_REPLACEMENTS
}
