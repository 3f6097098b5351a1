//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use refract_syntax::{SyntaxError, SyntaxErrorInfo, TransformationError};
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to read {kind} from {}: {source}", .path.display())]
    ReadInput {
        kind: InputKind,
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    WriteOutput { path: PathBuf, source: io::Error },
    #[error("failed to emit rewritten source: {0}")]
    EmitOutput(io::Error),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("failed to rewrite {}: {source}", .path.display())]
    Transformation {
        path: PathBuf,
        source: Box<TransformationError>,
    },
    #[error(
        "rewriting {} introduced {count} syntax error(s); first at {first}",
        .path.display()
    )]
    IntroducedSyntaxErrors {
        path: PathBuf,
        count: usize,
        first: Box<SyntaxErrorInfo>,
    },
}

/// Names the kind of file a read failure concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputKind {
    Source,
    Query,
    Template,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Query => "query",
            Self::Template => "template",
        })
    }
}
