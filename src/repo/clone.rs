//! Fresh checkouts
//!
//! `osbs clone <name>` creates `<git dir>/<name>`, clones the remote into it
//! and hands back the checkout directory. Each failed precondition is its own
//! error; nothing created along the way is rolled back.

use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use super::{can_enter, ensure_git_dir};
use crate::config::Settings;
use crate::git::{self, CommandRunner, GitError};

/// Errors that can occur while cloning a new checkout
#[derive(Error, Debug)]
pub enum CloneError {
    #[error("No directory name given")]
    MissingArgument,
    #[error("Only one argument is accepted")]
    TooManyArguments,
    #[error("{0} doesn't exist")]
    BaseMissing(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("Couldn't create {path}: {source}")]
    CreateFailed {
        path: String,
        source: std::io::Error,
    },
    #[error("Created {0} but it doesn't seem to be there")]
    CreatedButMissing(String),
    #[error("Created {0} but couldn't cd into it")]
    CannotEnter(String),
    #[error("Failed to clone into {path}: {source}")]
    CloneFailed { path: String, source: GitError },
    #[error("Cloned into {path} but {checkout} doesn't exist")]
    CheckoutMissing { path: String, checkout: String },
    #[error("{0} seems to exist but couldn't cd into it")]
    CannotEnterCheckout(String),
}

/// Create `<git dir>/<name>`, clone into it and return the checkout path
pub fn clone_checkout(
    runner: &dyn CommandRunner,
    settings: &Settings,
    args: &[String],
) -> Result<PathBuf, CloneError> {
    let name = match args {
        [] => return Err(CloneError::MissingArgument),
        [name] => name,
        _ => return Err(CloneError::TooManyArguments),
    };

    let base = ensure_git_dir(settings).map_err(|_| {
        CloneError::BaseMissing(settings.git_dir.display().to_string())
    })?;

    let target = base.join(name);
    let shown = target.display().to_string();
    // symlink_metadata so a dangling link still counts as taken
    if target.symlink_metadata().is_ok() {
        return Err(CloneError::AlreadyExists(shown));
    }

    debug!("Creating {}", shown);
    fs::create_dir(&target).map_err(|source| CloneError::CreateFailed {
        path: shown.clone(),
        source,
    })?;
    if !target.is_dir() {
        return Err(CloneError::CreatedButMissing(shown));
    }
    if !can_enter(&target) {
        return Err(CloneError::CannotEnter(shown));
    }

    info!("Cloning {} into {}", settings.repo_url, shown);
    git::clone(runner, &settings.repo_url, &target).map_err(|source| {
        CloneError::CloneFailed {
            path: shown.clone(),
            source,
        }
    })?;

    let checkout = target.join(&settings.repo_dir);
    if !checkout.exists() {
        return Err(CloneError::CheckoutMissing {
            path: shown,
            checkout: checkout.display().to_string(),
        });
    }
    if !can_enter(&checkout) {
        return Err(CloneError::CannotEnterCheckout(
            checkout.display().to_string(),
        ));
    }

    Ok(checkout)
}
