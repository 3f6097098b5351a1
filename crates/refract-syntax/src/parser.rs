//! Tree-sitter parser wrapper.
//!
//! A [`Parser`] is bound to one grammar and turns source text into an owned
//! [`Tree`]. It keeps no state between parses beyond the grammar, so a single
//! parser can be reused for every iteration of a transformation.

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::tree::Tree;

/// Tree-sitter parser configured for a single language.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl Parser {
    /// Creates a new parser for the given language.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded, which happens when
    /// the grammar was generated for an incompatible Tree-sitter ABI.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.grammar())
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;

        Ok(Self { inner, language })
    }

    /// Returns the language this parser is configured for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Parses source text into a fresh tree that owns the text.
    ///
    /// Syntax errors do not fail the parse: the tree contains `ERROR` and
    /// missing nodes instead. Use [`Tree::has_errors`] to check for them.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::Parse`] if Tree-sitter fails to produce a tree
    /// at all.
    pub fn parse(&mut self, source: impl Into<String>) -> Result<Tree, SyntaxError> {
        let source = source.into();
        let tree = self
            .inner
            .parse(&source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parser produced no tree"))?;

        Ok(Tree::new(tree, source, self.language))
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SupportedLanguage::Rust, "fn main() {}")]
    #[case(SupportedLanguage::Python, "def hello():\n    pass")]
    #[case(
        SupportedLanguage::TypeScript,
        "function hello(): string { return 'hi'; }"
    )]
    fn parser_parses_valid_source(#[case] language: SupportedLanguage, #[case] source: &str) {
        let mut parser = Parser::new(language).expect("parser init");
        let tree = parser.parse(source).expect("parse");

        assert!(!tree.has_errors());
        assert_eq!(tree.language(), language);
        assert_eq!(tree.source(), source);
    }

    #[rstest]
    #[case(SupportedLanguage::Rust, "fn broken() {")]
    #[case(SupportedLanguage::Python, "def broken(")]
    #[case(SupportedLanguage::TypeScript, "function broken( {")]
    fn malformed_input_still_yields_a_tree(
        #[case] language: SupportedLanguage,
        #[case] source: &str,
    ) {
        let mut parser = Parser::new(language).expect("parser init");
        let tree = parser.parse(source).expect("parse");

        assert!(tree.has_errors());
        assert!(!tree.errors().is_empty());
    }

    #[test]
    fn parser_is_reusable_across_parses() {
        let mut parser = Parser::new(SupportedLanguage::Rust).expect("parser init");
        let first = parser.parse("fn a() {}").expect("first parse");
        let second = parser.parse(String::from("fn b() {}")).expect("second parse");

        assert_eq!(first.root_node().kind(), "source_file");
        assert_eq!(second.source(), "fn b() {}");
    }
}
