//! CLI entrypoint for the Refract structural rewriting tool.
//!
//! The binary delegates to [`refract_cli::run`], which loads configuration,
//! parses arguments, and rewrites the requested source file.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    refract_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
