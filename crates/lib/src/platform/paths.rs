use std::path::PathBuf;

use crate::consts::{APP_NAME, DATA_DIR_ENV};

fn env_path(var: &str) -> Option<PathBuf> {
  std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  env_path("USERPROFILE")
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  env_path("HOME")
}

/// Returns the platform data directory for the application
#[cfg(windows)]
pub fn data_dir() -> Option<PathBuf> {
  env_path("APPDATA").map(|appdata| appdata.join(APP_NAME))
}

/// Returns the platform data directory for the application
#[cfg(not(windows))]
pub fn data_dir() -> Option<PathBuf> {
  let data_home = env_path("XDG_DATA_HOME").or_else(|| home_dir().map(|home| home.join(".local").join("share")))?;
  Some(data_home.join(APP_NAME))
}

/// Returns the directory holding the storage files.
///
/// `KEYSTASH_DATA_DIR` takes precedence over the platform data directory.
/// `None` means neither could be resolved, and local storage is unavailable.
pub fn storage_dir() -> Option<PathBuf> {
  env_path(DATA_DIR_ENV).or_else(data_dir)
}
