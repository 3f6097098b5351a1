//! The rewrite command: read inputs, transform, emit the result.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use refract_config::Config;
use refract_syntax::{Parser, Query, SupportedLanguage, SyntaxErrorInfo, Transformation};
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::errors::{AppError, InputKind};

/// Fully resolved inputs for one rewrite.
#[derive(Debug)]
pub(crate) struct RewriteRequest {
    pub(crate) path: PathBuf,
    pub(crate) source: String,
    pub(crate) language: SupportedLanguage,
    pub(crate) pattern: String,
    pub(crate) template: String,
    pub(crate) in_place: bool,
    pub(crate) strict: bool,
}

impl TryFrom<Cli> for RewriteRequest {
    type Error = AppError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let source = read_input(InputKind::Source, &cli.source)?;
        let language = match cli.language {
            Some(language) => language,
            None => SupportedLanguage::detect(&cli.source)?,
        };
        let pattern = match (cli.query_text, cli.query) {
            (Some(text), _) => text,
            (None, Some(path)) => read_input(InputKind::Query, &path)?,
            (None, None) => String::new(),
        };
        let template = match (cli.template, cli.template_file) {
            (Some(text), _) => text,
            (None, Some(path)) => trim_final_newline(read_input(InputKind::Template, &path)?),
            (None, None) => String::new(),
        };

        Ok(Self {
            path: cli.source,
            source,
            language,
            pattern,
            template,
            in_place: cli.in_place,
            strict: cli.strict,
        })
    }
}

fn read_input(kind: InputKind, path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::ReadInput {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

/// Drops the single line terminator editors append to template files.
fn trim_final_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

/// Runs the rewrite and writes the result to `stdout` or back to the source.
pub(crate) fn execute<W: Write>(
    request: RewriteRequest,
    config: &Config,
    stdout: &mut W,
) -> Result<(), AppError> {
    let RewriteRequest {
        path,
        source,
        language,
        pattern,
        template,
        in_place,
        strict,
    } = request;

    let query = Query::new(language, &pattern)?;
    debug!(
        path = %path.display(),
        %language,
        captures = query.capture_names().len(),
        limit = config.max_replacements(),
        "starting transformation"
    );

    let mut parser = Parser::new(language)?;
    let input_errors = parser.parse(source.as_str())?.errors();
    if let Some(first) = input_errors.first() {
        warn!(
            path = %path.display(),
            count = input_errors.len(),
            first = %first,
            "input already contains syntax errors"
        );
    }

    let mut transformation = Transformation::new(source, parser, Arc::new(query), template)
        .with_max_replacements(config.max_replacements());
    let output = transformation
        .run()
        .map_err(|error| AppError::Transformation {
            path: path.clone(),
            source: Box::new(error),
        })?;
    let replacements = transformation.replacements_made();
    info!(path = %path.display(), replacements, "transformation complete");

    if replacements > 0 {
        let mut output_parser = transformation.into_parser();
        check_introduced_errors(&mut output_parser, &path, &output, &input_errors, strict)?;
    }

    if in_place {
        if replacements == 0 {
            debug!(path = %path.display(), "no replacements; leaving file untouched");
            return Ok(());
        }
        return fs::write(&path, output).map_err(|source| AppError::WriteOutput { path, source });
    }

    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(AppError::EmitOutput)
}

/// Warns about syntax errors the rewrite added, failing in strict mode.
fn check_introduced_errors(
    parser: &mut Parser,
    path: &Path,
    output: &str,
    input_errors: &[SyntaxErrorInfo],
    strict: bool,
) -> Result<(), AppError> {
    let introduced = introduced_errors(input_errors, parser.parse(output)?.errors());
    let count = introduced.len();
    let Some(first) = introduced.into_iter().next() else {
        return Ok(());
    };

    warn!(path = %path.display(), count, first = %first, "rewrite introduced syntax errors");
    if strict {
        return Err(AppError::IntroducedSyntaxErrors {
            path: path.to_path_buf(),
            count,
            first: Box::new(first),
        });
    }
    Ok(())
}

/// Returns the output errors with no counterpart in the input.
///
/// Errors are paired by message and context text, since a rewrite shifts
/// the byte offsets of everything after it.
fn introduced_errors(
    input: &[SyntaxErrorInfo],
    output: Vec<SyntaxErrorInfo>,
) -> Vec<SyntaxErrorInfo> {
    let mut unpaired: Vec<&SyntaxErrorInfo> = input.iter().collect();
    output
        .into_iter()
        .filter(|error| {
            let Some(index) = unpaired
                .iter()
                .position(|known| known.message == error.message && known.context == error.context)
            else {
                return true;
            };
            unpaired.swap_remove(index);
            false
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bar(@arg)\n", "bar(@arg)")]
    #[case("bar(@arg)\r\n", "bar(@arg)")]
    #[case("bar(@arg)\n\n", "bar(@arg)\n")]
    #[case("bar(@arg)", "bar(@arg)")]
    fn template_files_lose_one_trailing_newline(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(trim_final_newline(input.to_owned()), expected);
    }

    fn syntax_error(start: usize, context: &str) -> SyntaxErrorInfo {
        SyntaxErrorInfo {
            byte_range: start..start + context.len(),
            line: 1,
            column: u32::try_from(start + 1).expect("column"),
            context: context.to_owned(),
            message: String::from("syntax error"),
        }
    }

    #[test]
    fn shifted_existing_errors_are_not_introduced() {
        let input = [syntax_error(10, "let x = ;")];
        let output = vec![syntax_error(24, "let x = ;")];

        assert!(introduced_errors(&input, output).is_empty());
    }

    #[test]
    fn swapping_one_error_for_another_is_reported() {
        let input = [syntax_error(10, "let x = ;")];
        let output = vec![syntax_error(3, "bar(1;")];

        let introduced = introduced_errors(&input, output);
        assert_eq!(introduced.len(), 1);
        assert_eq!(introduced.first().map(|e| e.context.as_str()), Some("bar(1;"));
    }

    #[test]
    fn repeated_errors_pair_one_to_one() {
        let input = [syntax_error(0, "(")];
        let output = vec![syntax_error(0, "("), syntax_error(9, "(")];

        assert_eq!(introduced_errors(&input, output).len(), 1);
    }
}
