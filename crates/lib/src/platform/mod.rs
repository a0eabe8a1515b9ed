pub mod paths;

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::Result;
use crate::backend::{CookieJar, LocalStorage, StorageBackend};
use crate::config::{BackendPreference, StoreConfig};
use crate::error::BackendError;

/// Which backend a store ended up with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
  Local,
  Cookie,
}

impl BackendKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Local => "local",
      Self::Cookie => "cookie",
    }
  }
}

impl fmt::Display for BackendKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Choose and open the backend for a new store.
///
/// Local storage is used when the data directory resolves and can be created,
/// read and written. Otherwise:
/// - `auto` falls back to the cookie jar (in memory if its file cannot be opened)
/// - `local` keeps a session-only local storage
///
/// `cookie` skips the probe entirely. This never fails.
pub fn detect(config: &StoreConfig) -> StorageBackend {
  let dir = config.resolve_data_dir();
  let preference = config.backend();

  if preference != BackendPreference::Cookie {
    match open_local(dir.as_deref()) {
      Ok(storage) => {
        info!(backend = %BackendKind::Local, path = ?storage.path(), "Selected storage backend");
        return storage.into();
      }
      Err(e) if preference == BackendPreference::Local => {
        warn!(error = %e, "Local storage unavailable, keeping entries in memory");
        return LocalStorage::in_memory().into();
      }
      Err(e) => {
        warn!(error = %e, "Local storage unavailable, falling back to cookies");
      }
    }
  }

  let jar = open_cookies(dir.as_deref());
  info!(backend = %BackendKind::Cookie, path = ?jar.path(), "Selected storage backend");
  jar.into()
}

fn open_local(dir: Option<&Path>) -> Result<LocalStorage> {
  let dir = dir.ok_or(BackendError::NoDataDir)?;
  LocalStorage::open(dir)
}

fn open_cookies(dir: Option<&Path>) -> CookieJar {
  let Some(dir) = dir else {
    debug!("No data directory, cookie jar kept in memory");
    return CookieJar::in_memory();
  };

  CookieJar::open(dir).unwrap_or_else(|e| {
    warn!(error = %e, "Cookie jar unavailable, keeping cookies in memory");
    CookieJar::in_memory()
  })
}
