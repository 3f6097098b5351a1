//! Replacement templates.
//!
//! A template is plain text with `@name` placeholders, using the same
//! spelling as query captures. Rendering a template against a [`Match`]
//! replaces every placeholder with the text of the named capture.
//!
//! - `@name` inserts the text of capture `name`. Bare names consist of ASCII
//!   letters, digits, and `_`, so `@value.len()` reads capture `value`.
//! - `@{name}` inserts a capture whose name contains other characters, such
//!   as `@{function.name}`.
//! - `@@` inserts a literal `@`.
//! - An `@` that starts no placeholder is kept as is.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::cursor::Match;
use crate::error::TransformationError;
use crate::query::Query;

const PLACEHOLDER_SIGIL: char = '@';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Capture(String),
}

/// A parsed replacement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parses a template without checking its placeholders.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self {
            source: source.to_owned(),
            segments: split_segments(source),
        }
    }

    /// Parses a template and checks every placeholder against the captures
    /// the query declares.
    ///
    /// # Errors
    ///
    /// Returns [`TransformationError::UnknownCapture`] for the first
    /// placeholder naming a capture the query does not declare.
    pub fn compile(source: &str, query: &Query) -> Result<Self, TransformationError> {
        let template = Self::parse(source);
        if let Some(name) = template.captures().find(|name| !query.has_capture(name)) {
            return Err(TransformationError::UnknownCapture {
                name: name.to_owned(),
            });
        }
        Ok(template)
    }

    /// Returns the template text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the capture names referenced by the template, in order of
    /// appearance. Repeated references are repeated.
    pub fn captures(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Capture(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Renders the template against a match.
    ///
    /// # Errors
    ///
    /// Returns [`TransformationError::UnresolvedCapture`] if a placeholder
    /// names a capture the match does not bind, such as an optional capture
    /// that did not participate.
    pub fn render(&self, matched: &Match<'_, '_>) -> Result<String, TransformationError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Capture(name) => {
                    let text = matched.text(name).ok_or_else(|| {
                        let range = matched.byte_range().unwrap_or_default();
                        TransformationError::UnresolvedCapture {
                            name: name.clone(),
                            start: range.start,
                            end: range.end,
                        }
                    })?;
                    out.push_str(text);
                }
            }
        }
        Ok(out)
    }
}

/// Returns whether `c` may appear in a bare capture name.
const fn is_bare_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Reads a placeholder name from a stream positioned just after the sigil.
///
/// Returns `None` when the sigil starts no placeholder; nothing is consumed
/// in that case.
fn read_name(chars: &mut Peekable<CharIndices<'_>>) -> Option<String> {
    match chars.peek().copied() {
        Some((_, '{')) => read_braced_name(chars),
        Some((_, c)) if is_bare_name_char(c) => {
            let mut name = String::new();
            while let Some((_, c)) = chars.next_if(|(_, c)| is_bare_name_char(*c)) {
                name.push(c);
            }
            Some(name)
        }
        _ => None,
    }
}

fn read_braced_name(chars: &mut Peekable<CharIndices<'_>>) -> Option<String> {
    let mut lookahead = chars.clone();
    lookahead.next();
    let mut name = String::new();
    loop {
        match lookahead.next() {
            Some((_, '}')) if !name.is_empty() => break,
            Some((_, '}')) | None => return None,
            Some((_, c)) => name.push(c),
        }
    }
    *chars = lookahead;
    Some(name)
}

fn split_segments(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if ch != PLACEHOLDER_SIGIL {
            text.push(ch);
            continue;
        }

        if chars.peek().is_some_and(|(_, c)| *c == PLACEHOLDER_SIGIL) {
            chars.next();
            text.push(PLACEHOLDER_SIGIL);
            continue;
        }

        let Some(name) = read_name(&mut chars) else {
            text.push(PLACEHOLDER_SIGIL);
            continue;
        };

        if !text.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut text)));
        }
        segments.push(Segment::Capture(name));
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}
