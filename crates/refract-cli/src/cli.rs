//! CLI argument definitions for the Refract toolchain.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use refract_syntax::SupportedLanguage;

/// Command-line interface for the Refract rewriting tool.
///
/// Configuration flags (`--config-path`, `--log-filter`, `--log-format`,
/// `--max-replacements`) are handled before these arguments are parsed and
/// must come first.
#[derive(Parser, Debug)]
#[command(
    name = "refract",
    version,
    about = "Rewrites source files with Tree-sitter queries and templates."
)]
#[command(group(
    ArgGroup::new("query_input")
        .required(true)
        .args(["query", "query_text"])
))]
#[command(group(
    ArgGroup::new("template_input")
        .required(true)
        .args(["template", "template_file"])
))]
pub(crate) struct Cli {
    /// Reads the Tree-sitter query from a file.
    #[arg(long, value_name = "FILE")]
    pub(crate) query: Option<PathBuf>,
    /// Uses the given Tree-sitter query pattern.
    #[arg(long, value_name = "PATTERN")]
    pub(crate) query_text: Option<String>,
    /// Replacement template; `@name` inserts the text of capture `name`.
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true)]
    pub(crate) template: Option<String>,
    /// Reads the replacement template from a file.
    #[arg(long, value_name = "FILE")]
    pub(crate) template_file: Option<PathBuf>,
    /// Grammar to parse with; detected from the file extension when omitted.
    #[arg(long, value_name = "LANG")]
    pub(crate) language: Option<SupportedLanguage>,
    /// Writes the result back to the source file instead of stdout.
    #[arg(long)]
    pub(crate) in_place: bool,
    /// Fails when the rewrite introduces syntax errors.
    #[arg(long)]
    pub(crate) strict: bool,
    /// Source file to rewrite.
    #[arg(value_name = "SOURCE")]
    pub(crate) source: PathBuf,
}
