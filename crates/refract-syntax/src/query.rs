//! Compiled structural queries.
//!
//! A [`Query`] is a Tree-sitter S-expression pattern compiled against one
//! grammar. Compilation happens once, up front; a compiled query is immutable
//! and can be shared across threads and transformations behind an `Arc`.

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;

/// A compiled query with its declared capture names.
pub struct Query {
    inner: tree_sitter::Query,
    language: SupportedLanguage,
    source: String,
    capture_names: Vec<String>,
}

impl Query {
    /// Compiles a query pattern for the given language.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::Query`] if the pattern is syntactically invalid
    /// or references node types, fields, or captures the grammar does not
    /// know. The error carries the offending line of the pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use refract_syntax::{Query, SupportedLanguage};
    ///
    /// let query = Query::new(
    ///     SupportedLanguage::Rust,
    ///     "(call_expression function: (identifier) @name) @call",
    /// )?;
    /// assert_eq!(query.capture_names(), ["name", "call"]);
    /// # Ok::<(), refract_syntax::SyntaxError>(())
    /// ```
    pub fn new(language: SupportedLanguage, pattern: &str) -> Result<Self, SyntaxError> {
        let inner = tree_sitter::Query::new(&language.grammar(), pattern)
            .map_err(|error| query_error(language, pattern, &error))?;
        let capture_names = inner
            .capture_names()
            .iter()
            .map(|name| (*name).to_owned())
            .collect();

        Ok(Self {
            inner,
            language,
            source: pattern.to_owned(),
            capture_names,
        })
    }

    /// Returns the capture names in declaration order.
    #[must_use]
    pub fn capture_names(&self) -> &[String] {
        &self.capture_names
    }

    /// Returns the index of a capture name, if declared.
    #[must_use]
    pub fn capture_index(&self, name: &str) -> Option<usize> {
        self.capture_names.iter().position(|candidate| candidate == name)
    }

    /// Returns whether the query declares a capture with this name.
    #[must_use]
    pub fn has_capture(&self, name: &str) -> bool {
        self.capture_index(name).is_some()
    }

    /// Returns the number of top-level patterns in the query.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.inner.pattern_count()
    }

    /// Returns the grammar this query was compiled for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the pattern text the query was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) const fn inner(&self) -> &tree_sitter::Query {
        &self.inner
    }

    pub(crate) fn capture_name(&self, index: u32) -> &str {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.capture_names.get(index))
            .map_or("", String::as_str)
    }
}

impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("language", &self.language)
            .field("source", &self.source)
            .field("capture_names", &self.capture_names)
            .finish_non_exhaustive()
    }
}

fn query_error(
    language: SupportedLanguage,
    pattern: &str,
    error: &tree_sitter::QueryError,
) -> SyntaxError {
    let fragment = pattern
        .lines()
        .nth(error.row)
        .map(str::trim)
        .unwrap_or_default()
        .to_owned();

    SyntaxError::Query {
        language,
        kind: format!("{:?}", error.kind),
        row: error.row.saturating_add(1),
        column: error.column.saturating_add(1),
        message: error.message.clone(),
        fragment,
    }
}
