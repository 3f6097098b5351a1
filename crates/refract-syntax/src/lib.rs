//! Tree-sitter powered structural rewriting for the Refract toolchain.
//!
//! The crate turns source text into syntax trees, finds structural patterns
//! with Tree-sitter queries, and rewrites the matched regions through
//! capture-driven templates until no match remains.
//!
//! - [`Parser`] turns text into an owned [`Tree`].
//! - [`Node`] is a borrowed view into a tree.
//! - [`Query`] is a compiled pattern; [`QueryCursor`] yields its [`Match`]es.
//! - [`Template`] renders `@capture` placeholders from a match.
//! - [`Transformation`] drives the parse, match, splice loop to a fixed point.
//!
//! # Supported Languages
//!
//! - Rust (`.rs`)
//! - Python (`.py`, `.pyi`)
//! - TypeScript (`.ts`, `.tsx`, `.mts`, `.cts`)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use refract_syntax::{Parser, Query, SupportedLanguage, Transformation};
//!
//! let query = Query::new(
//!     SupportedLanguage::Rust,
//!     r#"((macro_invocation macro: (identifier) @name (token_tree) @args) @call
//!         (#eq? @name "dbg"))"#,
//! )?;
//!
//! let mut transformation = Transformation::new(
//!     "fn main() { dbg!(x); }",
//!     Parser::new(SupportedLanguage::Rust)?,
//!     Arc::new(query),
//!     "println!(\"{:?}\", @args)",
//! );
//! let rewritten = transformation.run()?;
//! assert_eq!(rewritten, "fn main() { println!(\"{:?}\", (x)); }");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The engine performs no logging and no I/O; callers supply text and decide
//! what to do with the result.

mod cursor;
mod error;
mod language;
mod node;
mod parser;
mod position;
mod query;
mod template;
mod transformation;
mod tree;

pub use cursor::{Capture, Match, Matches, QueryCursor};
pub use error::{SyntaxError, TransformationError};
pub use language::{LanguageParseError, SupportedLanguage};
pub use node::Node;
pub use parser::Parser;
pub use query::Query;
pub use template::Template;
pub use transformation::{DEFAULT_MAX_REPLACEMENTS, Transformation};
pub use tree::{SyntaxErrorInfo, Tree};

#[cfg(test)]
mod tests;
