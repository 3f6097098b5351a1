//! Non-owning views into a [`Tree`].
//!
//! A [`Node`] pairs a native node handle with the tree that owns it. All
//! navigation is resolved against the owning tree on demand, and the text of a
//! node is always sliced from the tree's source rather than stored.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use crate::position::point_to_one_based;
use crate::tree::Tree;

/// A reference to one node of a [`Tree`].
///
/// The `'tree` lifetime ties the node to the tree it came from; a node can
/// never be used after its tree is dropped or moved into a new parse.
#[derive(Clone, Copy)]
pub struct Node<'tree> {
    raw: tree_sitter::Node<'tree>,
    tree: &'tree Tree,
}

impl<'tree> Node<'tree> {
    pub(crate) const fn new(raw: tree_sitter::Node<'tree>, tree: &'tree Tree) -> Self {
        Self { raw, tree }
    }

    pub(crate) const fn raw(&self) -> tree_sitter::Node<'tree> {
        self.raw
    }

    fn wrap(&self, raw: tree_sitter::Node<'tree>) -> Self {
        Self::new(raw, self.tree)
    }

    /// Returns the tree this node belongs to.
    #[must_use]
    pub const fn tree(&self) -> &'tree Tree {
        self.tree
    }

    /// Returns the grammar type of this node, e.g. `call_expression`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.raw.kind()
    }

    /// Returns an identifier unique to this node within its tree.
    #[must_use]
    pub fn id(&self) -> usize {
        self.raw.id()
    }

    /// Returns whether the node is named in the grammar.
    ///
    /// Anonymous nodes are punctuation and keywords such as `(` or `fn`.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.raw.is_named()
    }

    /// Returns whether the parser marked this node as a syntax error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.raw.is_error()
    }

    /// Returns whether the parser inserted this node to recover from an error.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.raw.is_missing()
    }

    /// Returns whether this node or any descendant is an error.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.raw.has_error()
    }

    /// Returns the half-open byte range `[start, end)` of the node.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.raw.byte_range()
    }

    /// Returns the first byte of the node.
    #[must_use]
    pub fn start_byte(&self) -> usize {
        self.raw.start_byte()
    }

    /// Returns the byte after the last byte of the node.
    #[must_use]
    pub fn end_byte(&self) -> usize {
        self.raw.end_byte()
    }

    /// Returns the one-based (line, column) where the node starts.
    #[must_use]
    pub fn start_position(&self) -> (u32, u32) {
        point_to_one_based(self.raw.start_position())
    }

    /// Returns the one-based (line, column) where the node ends.
    #[must_use]
    pub fn end_position(&self) -> (u32, u32) {
        point_to_one_based(self.raw.end_position())
    }

    /// Returns the source text covered by the node.
    #[must_use]
    pub fn text(&self) -> &'tree str {
        self.tree.source().get(self.byte_range()).unwrap_or_default()
    }

    /// Returns the parent node, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.raw.parent().map(|raw| self.wrap(raw))
    }

    /// Returns the number of children, named and anonymous.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.raw.child_count()
    }

    /// Returns the child at `index`, counting anonymous children.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<Self> {
        self.raw.child(index).map(|raw| self.wrap(raw))
    }

    /// Returns all children in source order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        let mut cursor = self.raw.walk();
        self.raw
            .children(&mut cursor)
            .map(|raw| self.wrap(raw))
            .collect()
    }

    /// Returns the named children in source order.
    #[must_use]
    pub fn named_children(&self) -> Vec<Self> {
        let mut cursor = self.raw.walk();
        self.raw
            .named_children(&mut cursor)
            .map(|raw| self.wrap(raw))
            .collect()
    }

    /// Returns the child stored under a grammar field such as `arguments`.
    #[must_use]
    pub fn child_by_field_name(&self, field: &str) -> Option<Self> {
        self.raw.child_by_field_name(field).map(|raw| self.wrap(raw))
    }

    /// Returns the next sibling, named or anonymous.
    #[must_use]
    pub fn next_sibling(&self) -> Option<Self> {
        self.raw.next_sibling().map(|raw| self.wrap(raw))
    }

    /// Returns the previous sibling, named or anonymous.
    #[must_use]
    pub fn prev_sibling(&self) -> Option<Self> {
        self.raw.prev_sibling().map(|raw| self.wrap(raw))
    }

    /// Returns the next named sibling.
    #[must_use]
    pub fn next_named_sibling(&self) -> Option<Self> {
        self.raw.next_named_sibling().map(|raw| self.wrap(raw))
    }

    /// Returns the previous named sibling.
    #[must_use]
    pub fn prev_named_sibling(&self) -> Option<Self> {
        self.raw.prev_named_sibling().map(|raw| self.wrap(raw))
    }

    /// Renders the subtree as an S-expression of node kinds.
    #[must_use]
    pub fn to_sexp(&self) -> String {
        self.raw.to_sexp()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.raw == other.raw
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.tree, state);
        self.raw.hash(state);
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.byte_range();
        write!(f, "{} [{}..{}]", self.kind(), range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::{fixture, rstest};

    use crate::{Parser, SupportedLanguage, Tree};

    #[fixture]
    fn call_tree() -> Tree {
        let mut parser = Parser::new(SupportedLanguage::Rust).expect("parser init");
        parser.parse("fn main() { foo(1, 2); }").expect("parse")
    }

    fn find_call(tree: &Tree) -> crate::Node<'_> {
        let start = tree.source().find("foo").expect("call");
        let end = tree.source().find("2)").expect("close paren") + 2;
        tree.descendant_for_byte_range(start..end).expect("call node")
    }

    #[rstest]
    fn text_is_sliced_from_source(call_tree: Tree) {
        let call = find_call(&call_tree);

        assert_eq!(call.kind(), "call_expression");
        assert_eq!(call.text(), "foo(1, 2)");
        assert_eq!(call.start_position(), (1, 13));
    }

    #[rstest]
    fn field_and_child_navigation(call_tree: Tree) {
        let call = find_call(&call_tree);

        let function = call.child_by_field_name("function").expect("function");
        assert_eq!(function.text(), "foo");

        let arguments = call.child_by_field_name("arguments").expect("arguments");
        let named: Vec<_> = arguments.named_children().iter().map(|n| n.text()).collect();
        assert_eq!(named, ["1", "2"]);
        assert!(arguments.child_count() > named.len());
        assert_eq!(arguments.child(0).map(|n| n.kind()), Some("("));
    }

    #[rstest]
    fn sibling_and_parent_navigation(call_tree: Tree) {
        let call = find_call(&call_tree);
        let arguments = call.child_by_field_name("arguments").expect("arguments");
        let first = arguments.named_children().into_iter().next().expect("first");

        let second = first.next_named_sibling().expect("second");
        assert_eq!(second.text(), "2");
        assert_eq!(second.prev_named_sibling(), Some(first));
        assert_eq!(first.next_sibling().map(|n| n.kind()), Some(","));
        assert_eq!(first.parent(), Some(arguments));
    }

    #[rstest]
    fn child_indexes_past_the_end_are_none(call_tree: Tree) {
        let arguments = find_call(&call_tree)
            .child_by_field_name("arguments")
            .expect("arguments");

        let last = arguments.child_count() - 1;
        assert_eq!(arguments.child(last).map(|n| n.kind()), Some(")"));
        assert_eq!(arguments.child(1).map(|n| n.text()), Some("1"));
        assert!(arguments.child(last + 1).is_none());
    }

    #[rstest]
    fn same_node_in_twin_trees_is_distinct(call_tree: Tree) {
        let twin = Parser::new(SupportedLanguage::Rust)
            .expect("parser init")
            .parse(call_tree.source())
            .expect("parse");
        let ours = find_call(&call_tree);
        let theirs = find_call(&twin);

        let mut seen = HashSet::new();
        seen.insert(ours);
        assert!(seen.contains(&ours));
        assert!(seen.contains(&find_call(&call_tree)));
        assert!(!seen.contains(&theirs));
        assert_ne!(ours, theirs);
    }

    #[rstest]
    fn root_has_no_parent(call_tree: Tree) {
        let root = call_tree.root_node();

        assert!(root.parent().is_none());
        assert_eq!(root.kind(), "source_file");
        assert!(root.to_sexp().starts_with("(source_file"));
    }
}
