//! Base directory checks shared by the commands

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::Settings;

/// Errors about the base directory itself
#[derive(Error, Debug)]
pub enum BaseDirError {
    #[error("{0} doesn't exist")]
    Missing(String),
}

/// Whether `path` is a directory we could change into
///
/// Entering needs search (execute) permission, not read permission.
#[cfg(unix)]
pub fn can_enter(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_dir() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn can_enter(path: &Path) -> bool {
    path.is_dir() && fs::read_dir(path).is_ok()
}

/// The base directory, provided it exists and can be entered
pub fn ensure_git_dir(settings: &Settings) -> Result<PathBuf, BaseDirError> {
    if can_enter(&settings.git_dir) {
        Ok(settings.git_dir.clone())
    } else {
        Err(BaseDirError::Missing(settings.git_dir.display().to_string()))
    }
}
