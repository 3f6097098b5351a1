//! Owned syntax trees.
//!
//! A [`Tree`] is the single owner of one native parse result together with
//! the exact text snapshot it was produced from. Trees are move-only: the type
//! deliberately does not implement `Clone`, so a parse result always has
//! exactly one owner. Nodes borrow the tree, which means the compiler rejects
//! any [`Node`] that would outlive it or survive a change to its text.

use std::ops::Range;

use crate::language::SupportedLanguage;
use crate::node::Node;
use crate::position::point_to_one_based;

/// A parsed snapshot of source text.
pub struct Tree {
    inner: tree_sitter::Tree,
    source: String,
    language: SupportedLanguage,
}

impl Tree {
    pub(crate) const fn new(
        inner: tree_sitter::Tree,
        source: String,
        language: SupportedLanguage,
    ) -> Self {
        Self {
            inner,
            source,
            language,
        }
    }

    /// Returns the root node of the tree.
    #[must_use]
    pub fn root_node(&self) -> Node<'_> {
        Node::new(self.inner.root_node(), self)
    }

    /// Returns the text this tree was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the grammar used to build this tree.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Exchanges the contents of two trees.
    ///
    /// Both trees must be free of outstanding node borrows, which the borrow
    /// checker guarantees through the `&mut` receivers.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Releases the native tree and returns the source text.
    #[must_use]
    pub fn into_source(self) -> String {
        self.source
    }

    /// Returns the smallest node spanning the given byte range, if any.
    #[must_use]
    pub fn descendant_for_byte_range(&self, range: Range<usize>) -> Option<Node<'_>> {
        self.inner
            .root_node()
            .descendant_for_byte_range(range.start, range.end)
            .map(|raw| Node::new(raw, self))
    }

    /// Returns whether the tree contains `ERROR` or missing nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.inner.root_node().has_error()
    }

    /// Collects every `ERROR` and missing node in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.root_node(), &mut errors);
        errors
    }

    pub(crate) const fn inner(&self) -> &tree_sitter::Tree {
        &self.inner
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("language", &self.language)
            .field("len", &self.source.len())
            .finish_non_exhaustive()
    }
}

/// A syntax error located in a parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error in the source.
    pub byte_range: Range<usize>,
    /// Line number (one-based) where the error starts.
    pub line: u32,
    /// Column number (one-based) where the error starts.
    pub column: u32,
    /// A snippet of the problematic source text.
    pub context: String,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    const CONTEXT_LIMIT: usize = 50;

    fn from_node(node: Node<'_>) -> Self {
        let text = node.text();
        let context = if text.chars().count() > Self::CONTEXT_LIMIT {
            let truncated: String = text.chars().take(Self::CONTEXT_LIMIT - 3).collect();
            format!("{truncated}...")
        } else {
            text.to_owned()
        };

        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_owned()
        };

        let (line, column) = point_to_one_based(node.raw().start_position());

        Self {
            byte_range: node.byte_range(),
            line,
            column,
            context,
            message,
        }
    }
}

impl std::fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)?;
        if !self.context.is_empty() {
            write!(f, " near `{}`", self.context)?;
        }
        Ok(())
    }
}

fn collect_error_nodes(node: Node<'_>, errors: &mut Vec<SyntaxErrorInfo>) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxErrorInfo::from_node(node));
    }

    if !node.has_error() {
        return;
    }

    for child in node.children() {
        collect_error_nodes(child, errors);
    }
}
