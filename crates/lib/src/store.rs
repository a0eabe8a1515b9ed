//! The storage facade.
//!
//! A [`Store`] owns one backend, picked once when it is opened, and routes every
//! operation to it:
//!
//! | Backend | Record | Expiry | Failures |
//! |---|---|---|---|
//! | local storage | `{"v": .., "e": ..}` envelope | yes | logged, entry kept in memory |
//! | cookie jar | JSON value | ignored | `None` / `false` plus a warning |
//!
//! No operation returns an error. Missing, expired and unreadable entries all read
//! as `None`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{LocalStorage, StorageBackend};
use crate::bind::{Binding, Field};
use crate::clock::{Clock, SystemClock};
use crate::coerce::{coerce, coerce_payload, is_falsy};
use crate::config::StoreConfig;
use crate::envelope::Envelope;
use crate::platform::{self, BackendKind};

pub struct Store {
  backend: Mutex<StorageBackend>,
  clock: Arc<dyn Clock>,
}

impl Store {
  /// Detect the backend for `config` and open it.
  ///
  /// Never fails: if local storage is unusable the store runs on the cookie jar.
  pub fn open(config: &StoreConfig) -> Self {
    Self::new(platform::detect(config))
  }

  /// Create a store on an already opened backend.
  pub fn new(backend: impl Into<StorageBackend>) -> Self {
    Self {
      backend: Mutex::new(backend.into()),
      clock: Arc::new(SystemClock),
    }
  }

  /// A store whose local storage lives only in this process.
  pub fn in_memory() -> Self {
    Self::new(LocalStorage::in_memory())
  }

  /// Replace the clock used for expiry.
  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  pub fn backend_kind(&self) -> BackendKind {
    self.backend().kind()
  }

  /// Whether the primary backend is in use (envelopes and expiry available).
  pub fn is_supported(&self) -> bool {
    self.backend_kind() == BackendKind::Local
  }

  fn backend(&self) -> MutexGuard<'_, StorageBackend> {
    self.backend.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Store `value` under `key`, optionally expiring after `expires`.
  ///
  /// With local storage the result is the coerced envelope that was written
  /// (`{"v": value, "e": expiry}`), not the bare value. The cookie fallback
  /// returns `value` itself, or `None` when the jar rejects it.
  pub fn set(&self, key: &str, value: impl Serialize, expires: Option<Duration>) -> Option<Value> {
    let value = match serde_json::to_value(value) {
      Ok(value) => value,
      Err(e) => {
        warn!(key = %key, error = %e, "Value cannot be represented as JSON");
        return None;
      }
    };

    let mut backend = self.backend();
    match &mut *backend {
      StorageBackend::Cookie(jar) => {
        if expires.is_some() {
          debug!(key = %key, "Cookie backend ignores expiry");
        }
        match jar.put(key, &value) {
          Ok(()) => Some(value),
          Err(e) => {
            warn!(
              key = %key,
              error = %e,
              "Local storage not supported and the cookie fallback rejected the value"
            );
            None
          }
        }
      }
      StorageBackend::Local(storage) => {
        let envelope = Envelope::new(value, expires, self.clock.now_millis());
        let text = match envelope.to_text() {
          Ok(text) => text,
          Err(e) => {
            warn!(key = %key, error = %e, "Failed to encode envelope");
            return None;
          }
        };

        if let Err(e) = storage.set_item(key, &text) {
          warn!(key = %key, error = %e, "Failed to persist local storage, entry kept for this session");
        }
        debug!(key = %key, expires_at = ?envelope.e, "Stored value");
        Some(coerce(&text))
      }
    }
  }

  /// Read `key`.
  ///
  /// Expired entries are removed as a side effect. Text that was not written as an
  /// envelope is returned unchanged as a string.
  pub fn get(&self, key: &str) -> Option<Value> {
    let mut backend = self.backend();
    let value = match &mut *backend {
      StorageBackend::Cookie(jar) => coerce(jar.get(key)?),
      StorageBackend::Local(storage) => {
        let text = storage.get_item(key).filter(|text| !text.is_empty())?;

        let envelope = match Envelope::from_text(text) {
          Ok(envelope) => envelope,
          Err(_) => return Some(Value::String(text.to_string())),
        };

        if envelope.is_expired(self.clock.now_millis()) {
          debug!(key = %key, expired_at = ?envelope.e, "Entry expired");
          if let Err(e) = storage.remove_item(key) {
            warn!(key = %key, error = %e, "Failed to persist removal of expired entry");
          }
          return None;
        }

        coerce_payload(envelope.v)
      }
    };

    (!value.is_null()).then_some(value)
  }

  /// Read `key` and deserialize it; `None` if missing or of another shape.
  pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let value = self.get(key)?;
    serde_json::from_value(value).ok()
  }

  /// Delete `key`.
  ///
  /// Local storage always reports `true`, whether or not the key existed. The
  /// cookie fallback reports `false` when the jar refuses the removal.
  pub fn remove(&self, key: &str) -> bool {
    let mut backend = self.backend();
    match &mut *backend {
      StorageBackend::Cookie(jar) => match jar.remove(key) {
        Ok(()) => true,
        Err(e) => {
          debug!(key = %key, error = %e, "Cookie removal failed");
          false
        }
      },
      StorageBackend::Local(storage) => {
        if let Err(e) = storage.remove_item(key) {
          warn!(key = %key, error = %e, "Failed to persist removal");
        }
        true
      }
    }
  }

  /// Keep `field` and the stored `key` in sync.
  ///
  /// A missing `default` means `""`. The default is written whenever the stored
  /// value is falsy (`null`, `false`, `0`, `""`), not only when it is missing. The
  /// field then receives the stored value, and each [`Binding::digest`] writes
  /// field changes back.
  pub fn bind<F: Field>(
    &self,
    field: F,
    key: &str,
    default: Option<Value>,
    expires: Option<Duration>,
  ) -> Binding<'_, F> {
    let default = default.unwrap_or_else(|| Value::String(String::new()));
    if is_falsy(self.get(key).as_ref()) {
      self.set(key, default, expires);
    }

    field.write(self.get(key).unwrap_or(Value::Null));
    let value = self.get(key);
    debug!(key = %key, "Bound field");

    Binding::new(self, field, key, expires, value)
  }

  /// Null the bound field, stop syncing it and delete the stored key.
  pub fn unbind<F: Field>(&self, binding: &mut Binding<'_, F>) {
    binding.field().write(Value::Null);
    binding.cancel();
    self.remove(binding.key());
    debug!(key = %binding.key(), "Unbound field");
  }
}

impl Default for Store {
  fn default() -> Self {
    Self::open(&StoreConfig::from_env())
  }
}
