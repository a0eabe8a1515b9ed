//! Error types for keystash backends

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the storage backends.
///
/// These never cross the [`Store`](crate::Store) contract; the facade turns them
/// into `None`/`false` results or a logged warning.
#[derive(Debug, Error)]
pub enum BackendError {
  #[error("No data directory could be resolved (set KEYSTASH_DATA_DIR)")]
  NoDataDir,

  #[error("Failed to create data directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Failed to encode value: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("Invalid cookie name: {0:?}")]
  InvalidCookieName(String),

  #[error("Cookie '{name}' is {size} bytes encoded, limit is {limit}")]
  CookieTooLarge { name: String, size: usize, limit: usize },

  #[error("Malformed cookie line {line} in {path}")]
  MalformedCookie { path: PathBuf, line: usize },
}
