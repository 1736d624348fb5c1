//! Shared test utilities for integration tests.
//!
//! Provides helpers for writing markdown fixtures into temporary
//! directories and running the wikirender binary against them.

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Markdown exercising tag, user, plain and regular links.
pub const WIKI_DOCUMENT: &str = "\
# Reading list

Filed under [[/as-tag?tag=c++ & co]] by [[Jo|/as-user?user=jo@x]].

See also [[Front Page]] and [the site](http://example.com/a_b).
";

/// Writes markdown file into temporary directory.
///
/// # Returns
///
/// Temporary directory (kept alive by caller) and path of written file
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn write_markdown(name: &str, content: &str) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let path = dir.path().join(name);
    fs::write(&path, content)?;
    Ok((dir, path))
}

/// Runs wikirender binary with arguments.
///
/// # Errors
///
/// Returns error if the process cannot be spawned
pub fn run_wikirender(args: &[&str], cwd: &Path) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_wikirender"))
        .args(args)
        .current_dir(cwd)
        .output()?;
    Ok(output)
}
