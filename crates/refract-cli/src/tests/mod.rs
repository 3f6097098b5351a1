//! Unit coverage for the CLI runtime.

mod support;
