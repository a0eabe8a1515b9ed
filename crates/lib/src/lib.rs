//! keystash: key/value persistence for client-side state
//!
//! This crate provides a small storage facade:
//! - `Store`: `set`/`get`/`remove` over a persistent local store, with optional expiry
//! - `CookieJar`: the fallback backend used when local storage is unavailable
//! - `Binding`: keeps a view-model field and a stored key in sync
//!
//! ```no_run
//! use keystash::{Store, StoreConfig};
//! use serde_json::json;
//!
//! let store = Store::open(&StoreConfig::from_env());
//! store.set("theme", json!("dark"), None);
//! assert_eq!(store.get("theme"), Some(json!("dark")));
//! ```

pub mod backend;
pub mod bind;
pub mod clock;
mod coerce;
pub mod config;
pub mod consts;
pub mod envelope;
pub mod error;
pub mod platform;
pub mod store;

pub use backend::{CookieJar, LocalStorage, StorageBackend};
pub use bind::{Binding, Field, FnField, Scope, ScopeField};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BackendPreference, StoreConfig};
pub use envelope::Envelope;
pub use error::BackendError;
pub use platform::BackendKind;
pub use store::Store;

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;
