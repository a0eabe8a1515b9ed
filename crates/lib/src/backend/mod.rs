//! Storage backends.
//!
//! A [`Store`](crate::Store) owns exactly one backend, chosen when it is opened:
//! - [`LocalStorage`]: persistent key/value text, holds envelopes with expiry
//! - [`CookieJar`]: the fallback, plain JSON values with no expiry

mod cookie_jar;
mod local;

pub use cookie_jar::CookieJar;
pub use local::LocalStorage;

use crate::platform::BackendKind;

#[derive(Debug, Clone)]
pub enum StorageBackend {
  Local(LocalStorage),
  Cookie(CookieJar),
}

impl StorageBackend {
  pub fn kind(&self) -> BackendKind {
    match self {
      Self::Local(_) => BackendKind::Local,
      Self::Cookie(_) => BackendKind::Cookie,
    }
  }
}

impl From<LocalStorage> for StorageBackend {
  fn from(storage: LocalStorage) -> Self {
    Self::Local(storage)
  }
}

impl From<CookieJar> for StorageBackend {
  fn from(jar: CookieJar) -> Self {
    Self::Cookie(jar)
  }
}
