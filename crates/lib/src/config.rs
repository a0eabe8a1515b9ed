//! Store configuration.
//!
//! Settings come from code (builder-style setters) or from the environment:
//! - `KEYSTASH_DATA_DIR`: directory holding `local_storage.json` and `cookies.txt`
//! - `KEYSTASH_BACKEND`: `auto` (default), `local` or `cookie`

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::warn;

use crate::consts::{BACKEND_ENV, DATA_DIR_ENV};
use crate::platform::paths::storage_dir;

/// Which backend a store should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
  /// Local storage when it is usable, cookies otherwise
  #[default]
  Auto,
  /// Local storage, kept in memory for the session if it cannot be opened
  Local,
  /// Always cookies
  Cookie,
}

impl BackendPreference {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Local => "local",
      Self::Cookie => "cookie",
    }
  }
}

impl fmt::Display for BackendPreference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for BackendPreference {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "auto" | "" => Ok(Self::Auto),
      "local" | "localstorage" => Ok(Self::Local),
      "cookie" | "cookies" => Ok(Self::Cookie),
      other => Err(format!("unknown backend '{}', expected auto, local or cookie", other)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreConfig {
  data_dir: Option<PathBuf>,
  backend: BackendPreference,
}

impl StoreConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// Read `KEYSTASH_DATA_DIR` and `KEYSTASH_BACKEND`.
  ///
  /// An unrecognized backend name is logged and treated as `auto`.
  pub fn from_env() -> Self {
    let backend = match std::env::var(BACKEND_ENV) {
      Ok(value) => value.parse::<BackendPreference>().unwrap_or_else(|e| {
        warn!(var = BACKEND_ENV, error = %e, "Ignoring invalid backend preference");
        BackendPreference::Auto
      }),
      Err(_) => BackendPreference::Auto,
    };

    Self {
      data_dir: std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()).map(PathBuf::from),
      backend,
    }
  }

  pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.data_dir = Some(dir.into());
    self
  }

  pub fn with_backend(mut self, backend: BackendPreference) -> Self {
    self.backend = backend;
    self
  }

  pub fn backend(&self) -> BackendPreference {
    self.backend
  }

  /// The configured data directory, if one was set explicitly.
  pub fn data_dir(&self) -> Option<&Path> {
    self.data_dir.as_deref()
  }

  /// The directory storage files live in: the configured one, else the platform default.
  pub fn resolve_data_dir(&self) -> Option<PathBuf> {
    self.data_dir.clone().or_else(storage_dir)
  }
}
