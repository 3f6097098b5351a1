//! Fixed-point structural rewriting.
//!
//! A [`Transformation`] repeatedly parses its text, finds the leftmost match
//! of a query, renders the template for it, and splices the result into a new
//! text snapshot. It stops when the query no longer matches, or fails once
//! the replacement bound is reached.
//!
//! Each cycle builds a brand-new tree and applies exactly one replacement.
//! Nodes from the previous cycle cannot be reused because the splice shifts
//! every byte offset after it, so a fresh parse is the only way to obtain
//! valid positions.

use std::ops::Range;
use std::sync::Arc;

use crate::cursor::QueryCursor;
use crate::error::TransformationError;
use crate::parser::Parser;
use crate::query::Query;
use crate::template::Template;
use crate::tree::Tree;

/// Replacement bound used unless [`Transformation::with_max_replacements`]
/// sets another.
pub const DEFAULT_MAX_REPLACEMENTS: usize = 100;

/// A query-driven rewrite of one source text.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use refract_syntax::{Parser, Query, SupportedLanguage, Transformation};
///
/// let language = SupportedLanguage::Rust;
/// let query = Query::new(
///     language,
///     r#"((call_expression
///         function: (identifier) @name
///         arguments: (arguments (_) @arg)) @call
///       (#eq? @name "foo"))"#,
/// )?;
///
/// let mut transformation = Transformation::new(
///     "foo(1); foo(2);",
///     Parser::new(language)?,
///     Arc::new(query),
///     "bar(@arg)",
/// );
/// assert_eq!(transformation.run()?, "bar(1); bar(2);");
/// assert_eq!(transformation.replacements_made(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Transformation {
    source: String,
    parser: Parser,
    query: Arc<Query>,
    template: String,
    max_replacements: usize,
    replacements: usize,
}

impl Transformation {
    /// Creates a transformation of `source`.
    ///
    /// The parser and query must target the same grammar; the template may
    /// reference any capture the query declares.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        parser: Parser,
        query: Arc<Query>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            parser,
            query,
            template: template.into(),
            max_replacements: DEFAULT_MAX_REPLACEMENTS,
            replacements: 0,
        }
    }

    /// Sets the replacement bound. Values below one are raised to one.
    #[must_use]
    pub fn with_max_replacements(mut self, limit: usize) -> Self {
        self.max_replacements = limit.max(1);
        self
    }

    /// Returns the replacement bound.
    #[must_use]
    pub const fn max_replacements(&self) -> usize {
        self.max_replacements
    }

    /// Returns the number of replacements applied by the last [`run`].
    ///
    /// After a failed run this is the count reached before the failure.
    ///
    /// [`run`]: Self::run
    #[must_use]
    pub const fn replacements_made(&self) -> usize {
        self.replacements
    }

    /// Returns the original source text. Running never modifies it.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Consumes the transformation and returns its parser for reuse.
    #[must_use]
    pub fn into_parser(self) -> Parser {
        self.parser
    }

    /// Rewrites the source until no match remains.
    ///
    /// # Errors
    ///
    /// Fails without returning any partial text when:
    ///
    /// - the parser and query target different grammars
    ///   ([`TransformationError::LanguageMismatch`]);
    /// - the template names an undeclared capture
    ///   ([`TransformationError::UnknownCapture`]);
    /// - an intermediate text cannot be parsed
    ///   ([`TransformationError::Parse`]);
    /// - a match lacks a capture the template needs
    ///   ([`TransformationError::UnresolvedCapture`]) or has no captures at
    ///   all ([`TransformationError::EmptyMatch`]);
    /// - the replacement bound is reached
    ///   ([`TransformationError::IterationLimit`]).
    pub fn run(&mut self) -> Result<String, TransformationError> {
        self.replacements = 0;

        let parser_language = self.parser.language();
        if parser_language != self.query.language() {
            return Err(TransformationError::LanguageMismatch {
                parser: parser_language,
                query: self.query.language(),
            });
        }

        let template = Template::compile(&self.template, &self.query)?;
        let mut cursor = QueryCursor::new();
        let mut text = self.source.clone();

        loop {
            let tree = self.parser.parse(text)?;
            let Some(next) = rewrite_leftmost(&mut cursor, &self.query, &tree, &template)? else {
                return Ok(tree.into_source());
            };

            text = next;
            self.replacements = self.replacements.saturating_add(1);
            if self.replacements >= self.max_replacements {
                return Err(TransformationError::IterationLimit {
                    replacements: self.replacements,
                    limit: self.max_replacements,
                });
            }
        }
    }
}

/// Applies the template to the leftmost match of `tree`.
///
/// Returns the new text, or `None` at the fixed point.
fn rewrite_leftmost(
    cursor: &mut QueryCursor,
    query: &Query,
    tree: &Tree,
    template: &Template,
) -> Result<Option<String>, TransformationError> {
    let Some(matched) = cursor.matches(query, tree).leftmost() else {
        return Ok(None);
    };

    let range = matched
        .byte_range()
        .ok_or_else(|| TransformationError::EmptyMatch {
            pattern_index: matched.pattern_index(),
        })?;
    let replacement = template.render(&matched)?;
    splice(tree.source(), range, &replacement).map(Some)
}

/// Builds a new text with `range` of `source` replaced by `replacement`.
fn splice(
    source: &str,
    range: Range<usize>,
    replacement: &str,
) -> Result<String, TransformationError> {
    let invalid = || TransformationError::InvalidSplice {
        range: range.clone(),
        len: source.len(),
    };
    let head = source.get(..range.start).ok_or_else(invalid)?;
    let tail = source.get(range.end..).ok_or_else(invalid)?;
    if range.start > range.end {
        return Err(invalid());
    }

    let mut out = String::with_capacity(head.len() + replacement.len() + tail.len());
    out.push_str(head);
    out.push_str(replacement);
    out.push_str(tail);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("foo(1);", 0..6, "bar(1)", "bar(1);")]
    #[case("abc", 1..1, "X", "aXbc")]
    #[case("abc", 0..3, "", "")]
    fn splice_replaces_range(
        #[case] source: &str,
        #[case] range: Range<usize>,
        #[case] replacement: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(splice(source, range, replacement).expect("splice"), expected);
    }

    #[rstest]
    #[case("abc", 2..5)]
    #[case("héllo", 1..2)]
    #[case("abc", 2..1)]
    fn splice_rejects_bad_ranges(#[case] source: &str, #[case] range: Range<usize>) {
        let error = splice(source, range, "x").expect_err("invalid range");
        assert!(matches!(error, TransformationError::InvalidSplice { .. }));
    }

    #[test]
    fn limit_is_at_least_one() {
        let parser = Parser::new(crate::SupportedLanguage::Rust).expect("parser");
        let query =
            Query::new(crate::SupportedLanguage::Rust, "(identifier) @id").expect("query");
        let transformation =
            Transformation::new("", parser, Arc::new(query), "@id").with_max_replacements(0);

        assert_eq!(transformation.max_replacements(), 1);
    }

    #[test]
    fn parser_is_returned_after_a_run() {
        let language = crate::SupportedLanguage::Python;
        let parser = Parser::new(language).expect("parser");
        let query = Query::new(language, "(identifier) @id").expect("query");
        let mut transformation = Transformation::new("1 + 2", parser, Arc::new(query), "@id");

        assert_eq!(transformation.run().expect("run"), "1 + 2");
        let mut parser = transformation.into_parser();
        assert_eq!(parser.language(), language);
        assert!(!parser.parse("x = 1").expect("parse").has_errors());
    }
}
