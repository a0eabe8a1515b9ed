//! Binding view-model fields to stored keys.
//!
//! A field is anything implementing [`Field`]: a getter/setter pair ([`FnField`])
//! or a named slot on a [`Scope`]. [`Store::bind`](crate::Store::bind) returns a
//! [`Binding`]; the host calls [`Binding::digest`] after it mutates view state,
//! and every change (compared by deep equality) is persisted.
//!
//! ```
//! use keystash::{Scope, Store};
//! use serde_json::json;
//!
//! let store = Store::in_memory();
//! let scope = Scope::new();
//!
//! let mut binding = store.bind(scope.field("volume"), "volume", Some(json!(5)), None);
//! assert_eq!(scope.get("volume"), Some(json!(5)));
//!
//! scope.set("volume", json!(7));
//! binding.digest();
//! assert_eq!(store.get("volume"), Some(json!(7)));
//!
//! store.unbind(&mut binding);
//! assert_eq!(scope.get("volume"), Some(json!(null)));
//! assert_eq!(store.get("volume"), None);
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;
use tracing::trace;

use crate::store::Store;

/// Read/write access to a single view-model field.
pub trait Field {
  /// The current value, or `None` while the field is undefined.
  fn read(&self) -> Option<Value>;

  fn write(&self, value: Value);
}

/// A field backed by a getter and a setter closure.
pub struct FnField<G, S> {
  get: G,
  set: S,
}

impl<G, S> FnField<G, S>
where
  G: Fn() -> Option<Value>,
  S: Fn(Value),
{
  pub fn new(get: G, set: S) -> Self {
    Self { get, set }
  }
}

impl<G, S> Field for FnField<G, S>
where
  G: Fn() -> Option<Value>,
  S: Fn(Value),
{
  fn read(&self) -> Option<Value> {
    (self.get)()
  }

  fn write(&self, value: Value) {
    (self.set)(value)
  }
}

/// A minimal view-model: named JSON fields shared between clones.
#[derive(Debug, Clone, Default)]
pub struct Scope {
  fields: Rc<RefCell<BTreeMap<String, Value>>>,
}

impl Scope {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, name: &str) -> Option<Value> {
    self.fields.borrow().get(name).cloned()
  }

  pub fn set(&self, name: &str, value: impl Into<Value>) {
    self.fields.borrow_mut().insert(name.to_string(), value.into());
  }

  /// Make `name` undefined again.
  pub fn clear(&self, name: &str) -> Option<Value> {
    self.fields.borrow_mut().remove(name)
  }

  /// Accessor for the field `name`.
  pub fn field(&self, name: &str) -> ScopeField {
    ScopeField {
      scope: self.clone(),
      name: name.to_string(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct ScopeField {
  scope: Scope,
  name: String,
}

impl ScopeField {
  pub fn name(&self) -> &str {
    &self.name
  }
}

impl Field for ScopeField {
  fn read(&self) -> Option<Value> {
    self.scope.get(&self.name)
  }

  fn write(&self, value: Value) {
    self.scope.set(&self.name, value);
  }
}

/// A live link between a field and a stored key, created by [`Store::bind`].
pub struct Binding<'s, F: Field> {
  store: &'s Store,
  field: F,
  key: String,
  expires: Option<Duration>,
  value: Option<Value>,
  /// Field value seen by the last digest; `None` until the first one.
  last_seen: Option<Option<Value>>,
  active: bool,
}

impl<'s, F: Field> Binding<'s, F> {
  pub(crate) fn new(store: &'s Store, field: F, key: &str, expires: Option<Duration>, value: Option<Value>) -> Self {
    Self {
      store,
      field,
      key: key.to_string(),
      expires,
      value,
      last_seen: None,
      active: true,
    }
  }

  /// The stored value right after binding.
  pub fn value(&self) -> Option<&Value> {
    self.value.as_ref()
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn field(&self) -> &F {
    &self.field
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Run one change-detection pass.
  ///
  /// Persists the field when it differs (deeply) from the previous pass and is
  /// defined. The first pass always counts as a change. Returns whether a write
  /// happened.
  pub fn digest(&mut self) -> bool {
    if !self.active {
      return false;
    }

    let current = self.field.read();
    if self.last_seen.as_ref() == Some(&current) {
      return false;
    }
    self.last_seen = Some(current.clone());

    match current {
      Some(value) => {
        trace!(key = %self.key, "Field changed, persisting");
        self.store.set(&self.key, value, self.expires);
        true
      }
      None => false,
    }
  }

  /// Stop syncing. Later digests do nothing; the stored value is left alone.
  pub fn cancel(&mut self) {
    self.active = false;
  }
}

impl<F: Field> fmt::Debug for Binding<'_, F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Binding")
      .field("key", &self.key)
      .field("expires", &self.expires)
      .field("value", &self.value)
      .field("active", &self.active)
      .finish_non_exhaustive()
  }
}
