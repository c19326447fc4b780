//! Repository directory layout.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ConfigError;
use crate::expand::expand_path;

/// Configuration filename inside the repository directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Overrides the repository directory.
const HOME_ENV: &str = "QUIRE_HOME";
/// Overrides the resource directory.
const RESOURCES_ENV: &str = "QUIRE_RESOURCES";
const DEFAULT_REPO_DIR: &str = "~/.quire";
const RESOURCE_DIR_NAME: &str = "res";

/// Repository directory: `$QUIRE_HOME`, or `~/.quire`.
///
/// # Errors
///
/// Returns `ConfigError::EnvVar` if the location references an unset
/// variable.
pub fn repo_dir() -> Result<PathBuf, ConfigError> {
    let raw = non_empty_env(HOME_ENV).unwrap_or_else(|| DEFAULT_REPO_DIR.to_owned());
    expand_path(Path::new(&raw), HOME_ENV)
}

/// Resource directory of the default repository.
///
/// # Errors
///
/// Same as [`repo_dir`].
pub fn resource_dir() -> Result<PathBuf, ConfigError> {
    Ok(resource_dir_in(&repo_dir()?))
}

/// Resource directory for `repo`: `$QUIRE_RESOURCES`, or `<repo>/res`.
#[must_use]
pub fn resource_dir_in(repo: &Path) -> PathBuf {
    non_empty_env(RESOURCES_ENV).map_or_else(|| repo.join(RESOURCE_DIR_NAME), PathBuf::from)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Whether a directory has no entries.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be read.
pub fn is_dir_empty(path: &Path) -> Result<bool, ConfigError> {
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Make sure `repo` exists and is empty.
///
/// A missing directory is created. A non-empty one is cleared when
/// `overwrite` is set, otherwise `ConfigError::DirectoryNotEmpty` is
/// returned.
///
/// # Errors
///
/// Returns `ConfigError::DirectoryNotEmpty` or an I/O error.
pub fn ensure_repo_dir(repo: &Path, overwrite: bool) -> Result<(), ConfigError> {
    if !repo.is_dir() {
        fs::create_dir_all(repo)?;
        return Ok(());
    }
    if is_dir_empty(repo)? {
        return Ok(());
    }
    if !overwrite {
        return Err(ConfigError::DirectoryNotEmpty(repo.to_path_buf()));
    }

    tracing::warn!(path = %repo.display(), "Overwriting repository directory");
    fs::remove_dir_all(repo)?;
    fs::create_dir_all(repo)?;
    Ok(())
}
