//! End-to-end tests for refract-syntax using insta for snapshot testing.
//!
//! These tests drive the public API the way an embedding tool would: compile
//! a query once, then run transformations over whole files.

use std::sync::Arc;

use insta::assert_snapshot;
use rstest::{fixture, rstest};

use refract_syntax::{
    Parser, Query, QueryCursor, SupportedLanguage, SyntaxError, Transformation,
};

// =============================================================================
// Happy Path: Multi-line Sources
// =============================================================================

#[fixture]
fn unwrap_query() -> Arc<Query> {
    let query = Query::new(
        SupportedLanguage::Rust,
        r#"((call_expression
             function: (field_expression
               value: (_) @receiver
               field: (field_identifier) @method)
             arguments: (arguments)) @call
           (#eq? @method "unwrap"))"#,
    )
    .unwrap_or_else(|err| panic!("query: {err}"));
    Arc::new(query)
}

#[rstest]
fn rewrites_method_calls_across_lines(unwrap_query: Arc<Query>) {
    let source = "\
fn load() -> Result<Config, Error> {
    let text = read(path).unwrap();
    let config = parse(&text).unwrap();
    Ok(config)
}
";
    let parser = Parser::new(SupportedLanguage::Rust).unwrap_or_else(|err| panic!("{err}"));
    let mut transformation = Transformation::new(source, parser, unwrap_query, "@receiver?");

    let output = transformation
        .run()
        .unwrap_or_else(|err| panic!("run: {err}"));

    assert_snapshot!(output, @r"
    fn load() -> Result<Config, Error> {
        let text = read(path)?;
        let config = parse(&text)?;
        Ok(config)
    }
    ");
    assert_eq!(transformation.replacements_made(), 2);
}

#[test]
fn typescript_sources_are_rewritten() {
    let query = Query::new(
        SupportedLanguage::TypeScript,
        r#"((call_expression
             function: (member_expression
               object: (identifier) @object
               property: (property_identifier) @property)
             arguments: (arguments) @args) @call
           (#eq? @object "console")
           (#eq? @property "log"))"#,
    )
    .unwrap_or_else(|err| panic!("query: {err}"));
    let parser = Parser::new(SupportedLanguage::TypeScript).unwrap_or_else(|err| panic!("{err}"));
    let mut transformation = Transformation::new(
        "console.log(a);\nconsole.warn(b);\nconsole.log(c, d);\n",
        parser,
        Arc::new(query),
        "logger.debug@args",
    );

    let output = transformation
        .run()
        .unwrap_or_else(|err| panic!("run: {err}"));

    assert_eq!(
        output,
        "logger.debug(a);\nconsole.warn(b);\nlogger.debug(c, d);\n"
    );
}

#[test]
fn cursor_reports_matches_with_positions() {
    let mut parser = Parser::new(SupportedLanguage::Python).unwrap_or_else(|err| panic!("{err}"));
    let tree = parser
        .parse("def a():\n    pass\n\ndef b():\n    pass\n")
        .unwrap_or_else(|err| panic!("parse: {err}"));
    let query = Query::new(
        SupportedLanguage::Python,
        "(function_definition name: (identifier) @name) @function",
    )
    .unwrap_or_else(|err| panic!("query: {err}"));

    let mut cursor = QueryCursor::new();
    let found: Vec<_> = cursor
        .matches(&query, &tree)
        .filter_map(|m| m.node("name"))
        .map(|node| format!("{} at {:?}", node.text(), node.start_position()))
        .collect();

    assert_snapshot!(found.join("\n"), @r"
    a at (1, 5)
    b at (4, 5)
    ");
}

// =============================================================================
// Unhappy Path: Diagnostics
// =============================================================================

#[rstest]
fn iteration_limit_description_is_stable(unwrap_query: Arc<Query>) {
    let parser = Parser::new(SupportedLanguage::Rust).unwrap_or_else(|err| panic!("{err}"));
    let mut transformation =
        Transformation::new("x.unwrap();", parser, unwrap_query, "@call").with_max_replacements(3);

    let Err(error) = transformation.run() else {
        panic!("a self-reproducing template must not converge");
    };

    assert_snapshot!(
        error.description(),
        @"transformation stopped after 3 replacements (limit 3); the template likely produces text the query matches again"
    );
}

#[rstest]
fn unknown_capture_description_is_stable(unwrap_query: Arc<Query>) {
    let parser = Parser::new(SupportedLanguage::Rust).unwrap_or_else(|err| panic!("{err}"));
    let mut transformation =
        Transformation::new("x.unwrap();", parser, unwrap_query, "@receiver.expect(@message)");

    let Err(error) = transformation.run() else {
        panic!("the template references an undeclared capture");
    };

    assert_snapshot!(
        error.description(),
        @"template references capture @message, which the query does not declare"
    );
}

#[test]
fn query_errors_quote_the_offending_fragment() {
    let pattern = "(call_expression\n  function: (not_a_real_node) @f)";
    let Err(error) = Query::new(SupportedLanguage::Rust, pattern) else {
        panic!("unknown node types must not compile");
    };

    let SyntaxError::Query { row, fragment, .. } = &error else {
        panic!("expected a query error, got {error:?}");
    };
    assert_eq!(*row, 2);
    assert_eq!(fragment, "function: (not_a_real_node) @f)");
    assert!(error.to_string().starts_with("invalid query for rust"));
}

#[test]
fn malformed_sources_are_still_transformed() {
    let query = Query::new(SupportedLanguage::Rust, "(identifier) @id")
        .unwrap_or_else(|err| panic!("query: {err}"));
    let parser = Parser::new(SupportedLanguage::Rust).unwrap_or_else(|err| panic!("{err}"));
    let mut transformation = Transformation::new("fn ok() {}\nfn broken( {", parser, Arc::new(query), "_@id")
        .with_max_replacements(10);

    // Each rewrite produces a new identifier, so the bound must trip even on
    // error-recovered trees.
    let Err(error) = transformation.run() else {
        panic!("identifier rewrite never converges");
    };
    assert!(error.is_iteration_limit());
}
