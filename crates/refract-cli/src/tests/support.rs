//! Test support utilities for CLI coverage.
//!
//! Supplies a fixed configuration loader, a scratch directory for source
//! files, and a harness that captures both output streams.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use refract_config::Config;
use rstest::fixture;
use tempfile::TempDir;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

/// A config loader that returns a fixed configuration for tests.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Scratch workspace holding source files and captured output.
pub(super) struct TestWorld {
    pub(super) config: Config,
    pub(super) stdout: Vec<u8>,
    pub(super) stderr: Vec<u8>,
    pub(super) exit_code: Option<ExitCode>,
    temp_dir: TempDir,
}

impl TestWorld {
    pub(super) fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write test file");
        path
    }

    pub(super) fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.temp_dir.path().join(name)).expect("read test file")
    }

    pub(super) fn run<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.stdout.clear();
        self.stderr.clear();
        let args = std::iter::once(OsString::from("refract")).chain(args.into_iter().map(Into::into));
        let loader = StaticConfigLoader {
            config: self.config.clone(),
        };
        let io = IoStreams::new(&mut self.stdout, &mut self.stderr);
        self.exit_code = Some(run_with_loader(args, io, &loader));
    }

    pub(super) fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.clone()).expect("stdout utf8")
    }

    pub(super) fn stderr_text(&self) -> String {
        String::from_utf8(self.stderr.clone()).expect("stderr utf8")
    }

    pub(super) fn assert_success(&self) {
        assert_eq!(
            self.exit_code,
            Some(ExitCode::SUCCESS),
            "stderr: {}",
            self.stderr_text()
        );
    }

    pub(super) fn assert_failure(&self) {
        assert_eq!(self.exit_code, Some(ExitCode::FAILURE));
    }
}

#[fixture]
pub(super) fn world() -> TestWorld {
    TestWorld {
        config: Config::default(),
        stdout: Vec::new(),
        stderr: Vec::new(),
        exit_code: None,
        temp_dir: TempDir::new().expect("temporary directory"),
    }
}
