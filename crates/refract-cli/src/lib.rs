//! Command-line interface runtime for the Refract toolchain.
//!
//! The module owns argument parsing, configuration bootstrapping, logging
//! setup, and the rewrite command itself. The runtime is exercised both from
//! the binary entrypoint and from tests, where the configuration loader and
//! the output streams are substituted.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

mod cli;
mod config;
mod errors;
mod execution;
mod telemetry;

use cli::Cli;
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;
use execution::{RewriteRequest, execute};

/// Bundles the output streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: IoStreams<'a, W, E>,
    loader: &'a L,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    const fn new(io: IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        match self.rewrite(split_config_arguments(&args)) {
            Ok(()) => ExitCode::SUCCESS,
            // `--help` and `--version` arrive as clap errors bound for stdout.
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                write!(self.io.stdout, "{error}").ok();
                ExitCode::SUCCESS
            }
            Err(error) => {
                writeln!(self.io.stderr, "{error}").ok();
                ExitCode::FAILURE
            }
        }
    }

    fn rewrite(&mut self, split: ConfigArgumentSplit) -> Result<(), AppError> {
        let cli = Cli::try_parse_from(split.command_arguments).map_err(AppError::CliUsage)?;
        let config = self.loader.load(&split.config_arguments)?;
        telemetry::initialise(&config)?;

        let request = RewriteRequest::try_from(cli)?;
        execute(request, &config, &mut *self.io.stdout)
    }
}

/// Runs the CLI using the provided arguments and output handles.
///
/// Rewritten source is written to `stdout` (unless `--in-place` is given);
/// errors are written to `stderr` and reported as a failing exit code.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, IoStreams::new(stdout, stderr), &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<I, W, E, L>(args: I, io: IoStreams<'_, W, E>, loader: &L) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

#[cfg(test)]
mod tests;
