//! Error types for parsing, query compilation, and transformation.
//!
//! [`SyntaxError`] covers failures of the grammar layer: loading a grammar,
//! producing a tree, and compiling a query. [`TransformationError`] covers the
//! fixed-point rewrite loop and wraps any grammar failure that happens while
//! it runs.

use std::ops::Range;
use std::path::PathBuf;

use thiserror::Error;

use crate::language::SupportedLanguage;

/// Errors from the grammar layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser for a language.
    #[error("failed to initialise parser for {language}: {message}")]
    ParserInit {
        /// The language that failed to initialise.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// The native parser produced no tree.
    ///
    /// Syntax errors in the input never cause this; they surface as error
    /// nodes inside an otherwise valid tree.
    #[error("failed to parse {language}: {message}")]
    Parse {
        /// The language that failed to parse.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// A query pattern failed to compile against the grammar.
    #[error("invalid query for {language} ({kind} at {row}:{column}): {message} in `{fragment}`")]
    Query {
        /// The grammar the query was compiled for.
        language: SupportedLanguage,
        /// Category of the failure reported by Tree-sitter.
        kind: String,
        /// One-based line of the offending fragment.
        row: usize,
        /// One-based column of the offending fragment.
        column: usize,
        /// Tree-sitter's description of the problem.
        message: String,
        /// The pattern line containing the problem.
        fragment: String,
    },

    /// The file extension is not associated with a grammar.
    #[error("unsupported file extension: {extension}")]
    UnsupportedExtension {
        /// The extension that was not recognised.
        extension: String,
    },

    /// Failed to determine the grammar from a file path.
    #[error("could not determine language for path: {}", path.display())]
    UnknownLanguage {
        /// The path that could not be mapped to a language.
        path: PathBuf,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParserInit {
            language,
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::Parse {
            language,
            message: message.into(),
        }
    }

    /// Creates an unsupported extension error.
    #[must_use]
    pub fn unsupported_extension(extension: impl Into<String>) -> Self {
        Self::UnsupportedExtension {
            extension: extension.into(),
        }
    }

    /// Creates an unknown language error.
    #[must_use]
    pub const fn unknown_language(path: PathBuf) -> Self {
        Self::UnknownLanguage { path }
    }
}

/// Errors raised while running a [`Transformation`](crate::Transformation).
///
/// Every variant aborts the whole run. No partially rewritten text is ever
/// returned alongside one of these errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransformationError {
    /// Parsing an intermediate text failed.
    #[error("transformation could not parse the source: {0}")]
    Parse(#[source] SyntaxError),

    /// The query was compiled for a different grammar than the parser uses.
    #[error("query targets {query} but the parser is configured for {parser}")]
    LanguageMismatch {
        /// Language of the parser.
        parser: SupportedLanguage,
        /// Language of the query.
        query: SupportedLanguage,
    },

    /// The template references a capture the query never declares.
    #[error("template references capture @{name}, which the query does not declare")]
    UnknownCapture {
        /// The undeclared capture name.
        name: String,
    },

    /// A declared capture was absent from the match being rendered.
    #[error("capture @{name} is not part of the match at bytes {start}..{end}")]
    UnresolvedCapture {
        /// The capture that could not be resolved.
        name: String,
        /// Start of the match that lacked the capture.
        start: usize,
        /// End of the match that lacked the capture.
        end: usize,
    },

    /// A match carried no captures, so no replacement range exists.
    #[error("pattern {pattern_index} matched without captures; capture the node to replace")]
    EmptyMatch {
        /// Index of the query pattern that produced the match.
        pattern_index: usize,
    },

    /// The replacement range does not fit the current text.
    #[error("cannot splice bytes {}..{} into text of length {len}", range.start, range.end)]
    InvalidSplice {
        /// The offending byte range.
        range: Range<usize>,
        /// Length of the text being spliced.
        len: usize,
    },

    /// The replacement bound was reached before a fixed point.
    #[error(
        "transformation stopped after {replacements} replacements (limit {limit}); \
         the template likely produces text the query matches again"
    )]
    IterationLimit {
        /// Number of replacements applied before stopping.
        replacements: usize,
        /// The configured bound.
        limit: usize,
    },
}

impl TransformationError {
    /// Returns the human-readable description of the failure.
    #[must_use]
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Returns whether the failure is the non-termination guard.
    #[must_use]
    pub const fn is_iteration_limit(&self) -> bool {
        matches!(self, Self::IterationLimit { .. })
    }

    /// Returns the replacements applied before the bound was hit, if this is
    /// an iteration-limit failure.
    #[must_use]
    pub const fn replacements_made(&self) -> Option<usize> {
        match self {
            Self::IterationLimit { replacements, .. } => Some(*replacements),
            _ => None,
        }
    }
}

impl From<SyntaxError> for TransformationError {
    fn from(error: SyntaxError) -> Self {
        Self::Parse(error)
    }
}
