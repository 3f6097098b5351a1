//! Query execution over trees.
//!
//! A [`QueryCursor`] runs a [`Query`] over a [`Tree`] and yields [`Match`]es
//! lazily. The cursor holds native iteration state only; it can be reused for
//! any number of queries and trees, one execution at a time.

use std::ops::Range;

use streaming_iterator::StreamingIterator;

use crate::node::Node;
use crate::query::Query;
use crate::tree::Tree;

/// One node bound to a capture name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'query, 'tree> {
    name: &'query str,
    index: u32,
    node: Node<'tree>,
}

impl<'query, 'tree> Capture<'query, 'tree> {
    /// Returns the capture name, without the leading `@`.
    #[must_use]
    pub const fn name(&self) -> &'query str {
        self.name
    }

    /// Returns the index of the capture name in [`Query::capture_names`].
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Returns the captured node.
    #[must_use]
    pub const fn node(&self) -> Node<'tree> {
        self.node
    }
}

/// One occurrence of a query pattern.
///
/// A match is only meaningful while the tree it came from is alive, which the
/// `'tree` lifetime enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'query, 'tree> {
    pattern_index: usize,
    captures: Vec<Capture<'query, 'tree>>,
}

impl<'query, 'tree> Match<'query, 'tree> {
    /// Returns the index of the query pattern that matched.
    #[must_use]
    pub const fn pattern_index(&self) -> usize {
        self.pattern_index
    }

    /// Returns every capture of the match, in the order Tree-sitter reported
    /// them.
    #[must_use]
    pub fn captures(&self) -> &[Capture<'query, 'tree>] {
        &self.captures
    }

    /// Returns the nodes bound to `name`, in source order.
    ///
    /// Quantified captures such as `(_)* @items` may bind several nodes.
    #[must_use]
    pub fn nodes(&self, name: &str) -> Vec<Node<'tree>> {
        let mut nodes: Vec<_> = self
            .captures
            .iter()
            .filter(|capture| capture.name == name)
            .map(|capture| capture.node)
            .collect();
        nodes.sort_by_key(Node::start_byte);
        nodes
    }

    /// Returns the first node bound to `name`.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<Node<'tree>> {
        self.nodes(name).into_iter().next()
    }

    /// Returns the nodes bound to `name` that lie within `range`.
    #[must_use]
    pub fn nodes_in_range(&self, name: &str, range: &Range<usize>) -> Vec<Node<'tree>> {
        self.nodes(name)
            .into_iter()
            .filter(|node| range.start <= node.start_byte() && node.end_byte() <= range.end)
            .collect()
    }

    /// Returns whether the match binds `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.captures.iter().any(|capture| capture.name == name)
    }

    /// Returns the text covered by capture `name`.
    ///
    /// When the capture binds several nodes the text runs from the start of
    /// the first node to the end of the last, separators included.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&'tree str> {
        let nodes = self.nodes(name);
        let first = nodes.first()?;
        let end = nodes.iter().map(Node::end_byte).max()?;
        first.tree().source().get(first.start_byte()..end)
    }

    /// Returns the smallest byte range covering every captured node.
    ///
    /// This is the region a transformation replaces. Returns `None` when the
    /// pattern declares no captures.
    #[must_use]
    pub fn byte_range(&self) -> Option<Range<usize>> {
        let start = self.captures.iter().map(|c| c.node.start_byte()).min()?;
        let end = self.captures.iter().map(|c| c.node.end_byte()).max()?;
        Some(start..end)
    }
}

/// Lazy sequence of matches produced by [`QueryCursor`].
pub struct Matches<'query, 'tree: 'query> {
    inner: tree_sitter::QueryMatches<'query, 'tree, &'tree [u8], &'tree [u8]>,
    query: &'query Query,
    tree: &'tree Tree,
}

impl<'query, 'tree: 'query> Matches<'query, 'tree> {
    /// Consumes the sequence and returns the leftmost match.
    ///
    /// Matches are ordered by start byte, then by descending length so the
    /// outermost of two matches sharing a start wins, then by pattern index.
    /// Matches without captures sort last.
    #[must_use]
    pub fn leftmost(self) -> Option<Match<'query, 'tree>> {
        self.min_by_key(|m| {
            let range = m.byte_range();
            (
                range.is_none(),
                range.as_ref().map_or(usize::MAX, |r| r.start),
                std::cmp::Reverse(range.map_or(0, |r| r.end)),
                m.pattern_index(),
            )
        })
    }
}

impl<'query, 'tree: 'query> Iterator for Matches<'query, 'tree> {
    type Item = Match<'query, 'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        let query = self.query;
        let tree = self.tree;
        let raw = self.inner.next()?;
        let captures = raw
            .captures
            .iter()
            .map(|capture| Capture {
                name: query.capture_name(capture.index),
                index: capture.index,
                node: Node::new(capture.node, tree),
            })
            .collect();

        Some(Match {
            pattern_index: raw.pattern_index,
            captures,
        })
    }
}

/// Reusable executor for queries.
pub struct QueryCursor {
    inner: tree_sitter::QueryCursor,
}

impl QueryCursor {
    /// Creates a cursor with no byte range restriction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tree_sitter::QueryCursor::new(),
        }
    }

    /// Caps the number of in-progress matches Tree-sitter tracks at once.
    pub fn set_match_limit(&mut self, limit: u32) {
        self.inner.set_match_limit(limit);
    }

    /// Returns whether the last execution dropped matches because of the
    /// match limit.
    #[must_use]
    pub fn did_exceed_match_limit(&self) -> bool {
        self.inner.did_exceed_match_limit()
    }

    /// Runs `query` over the whole tree.
    ///
    /// Matches are produced lazily in the order Tree-sitter completes them,
    /// which follows source position for patterns that do not nest.
    pub fn matches<'query, 'tree>(
        &'query mut self,
        query: &'query Query,
        tree: &'tree Tree,
    ) -> Matches<'query, 'tree>
    where
        'tree: 'query,
    {
        self.execute(query, tree, tree.root_node(), 0..usize::MAX)
    }

    /// Runs `query` over the nodes that intersect `range`.
    ///
    /// A reversed range (start after end) matches nothing.
    pub fn matches_in_range<'query, 'tree>(
        &'query mut self,
        query: &'query Query,
        tree: &'tree Tree,
        range: Range<usize>,
    ) -> Matches<'query, 'tree>
    where
        'tree: 'query,
    {
        self.execute(query, tree, tree.root_node(), range)
    }

    /// Runs `query` over the subtree rooted at `node`.
    pub fn matches_in_node<'query, 'tree>(
        &'query mut self,
        query: &'query Query,
        node: Node<'tree>,
    ) -> Matches<'query, 'tree>
    where
        'tree: 'query,
    {
        self.execute(query, node.tree(), node, 0..usize::MAX)
    }

    fn execute<'query, 'tree>(
        &'query mut self,
        query: &'query Query,
        tree: &'tree Tree,
        node: Node<'tree>,
        range: Range<usize>,
    ) -> Matches<'query, 'tree>
    where
        'tree: 'query,
    {
        // Tree-sitter keeps the previous range when handed a reversed one.
        let bounded = if range.start > range.end {
            usize::MAX..usize::MAX
        } else {
            range
        };
        self.inner.set_byte_range(bounded);
        let inner = self
            .inner
            .matches(query.inner(), node.raw(), tree.source().as_bytes());
        Matches { inner, query, tree }
    }
}

impl Default for QueryCursor {
    fn default() -> Self {
        Self::new()
    }
}
