//! Repository location
//!
//! Resolves the directory `osbs locate` should switch into.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::config::Settings;
use crate::git::{self, CommandRunner};

/// Errors that can occur while locating a repository
#[derive(Error, Debug)]
pub enum LocateError {
    #[error("Only one argument is accepted")]
    TooManyArguments,
    #[error("{0} is not inside a git repository")]
    NotInRepository(String),
    #[error("{0} doesn't seem to be a valid repo")]
    InvalidRepo(String),
}

/// Checkout directory for a named repository: `<git dir>/<name>/<repo dir>`
pub fn checkout_path(settings: &Settings, name: &str) -> PathBuf {
    settings.git_dir.join(name).join(&settings.repo_dir)
}

/// Resolve the directory to switch into
///
/// With no argument this is the top level of the work tree containing `cwd`;
/// with one it is the named checkout under the git directory. Either way the
/// directory must hold the marker file.
pub fn locate(
    runner: &dyn CommandRunner,
    settings: &Settings,
    cwd: &Path,
    args: &[String],
) -> Result<PathBuf, LocateError> {
    let candidate = match args {
        [] => git::show_toplevel(runner, cwd).map_err(|e| {
            debug!("No work tree: {}", e);
            LocateError::NotInRepository(cwd.display().to_string())
        })?,
        [name] => checkout_path(settings, name),
        _ => return Err(LocateError::TooManyArguments),
    };

    debug!("Checking {} for {}", candidate.display(), settings.marker);
    if !candidate.join(&settings.marker).is_file() {
        return Err(LocateError::InvalidRepo(candidate.display().to_string()));
    }

    Ok(candidate)
}
