//! Git command wrappers
//!
//! Shells out to the system `git` through a [`CommandRunner`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::CommandRunner;

const GIT: &str = "git";

/// Errors that can occur during git operations
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Not a git repository: {0}")]
    NotARepository(String),
    #[error("git {command} exited with status {code:?}")]
    Failed { command: String, code: Option<i32> },
}

/// Top-level directory of the work tree containing `cwd`
///
/// Equivalent to `git rev-parse --show-toplevel`.
pub fn show_toplevel(runner: &dyn CommandRunner, cwd: &Path) -> Result<PathBuf, GitError> {
    let output = runner.run(GIT, &["rev-parse", "--show-toplevel"], cwd)?;

    if !output.success() {
        debug!("git rev-parse failed: {}", output.stderr.trim());
        return Err(GitError::NotARepository(cwd.display().to_string()));
    }

    let line = output.stdout.split(|b| *b == b'\n').next().unwrap_or_default();
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.is_empty() {
        return Err(GitError::NotARepository(cwd.display().to_string()));
    }

    Ok(PathBuf::from(os_string_from_bytes(line)))
}

#[cfg(unix)]
fn os_string_from_bytes(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    std::ffi::OsStr::from_bytes(bytes).to_os_string()
}

#[cfg(not(unix))]
fn os_string_from_bytes(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Clone `url` into a new directory under `dest_parent`
pub fn clone(runner: &dyn CommandRunner, url: &str, dest_parent: &Path) -> Result<(), GitError> {
    debug!("Cloning {} into {}", url, dest_parent.display());
    let output = runner.run(GIT, &["clone", url], dest_parent)?;

    if !output.success() {
        for line in output.stderr.lines() {
            warn!("git: {}", line);
        }
        return Err(GitError::Failed {
            command: "clone".to_string(),
            code: output.code,
        });
    }

    Ok(())
}
