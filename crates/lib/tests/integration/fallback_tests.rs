//! Cookie fallback scenarios.

use std::time::Duration;

use keystash::consts::{COOKIE_FILENAME, LOCAL_STORAGE_FILENAME};
use keystash::{BackendKind, Scope};
use serde_json::json;

use super::common::TestEnv;

#[test]
fn forced_cookie_backend_skips_local_storage() {
  let env = TestEnv::new();
  let store = env.cookie_store();

  assert_eq!(store.backend_kind(), BackendKind::Cookie);
  assert!(!store.is_supported());
  assert!(env.read_data_file(LOCAL_STORAGE_FILENAME).is_none());
}

#[test]
fn values_round_trip_through_cookies() {
  let env = TestEnv::new();
  let store = env.cookie_store();

  assert_eq!(store.set("name", "ada", None), Some(json!("ada")));
  assert_eq!(store.set("prefs", json!({"dark": true}), None), Some(json!({"dark": true})));
  store.set("count", 3, None);

  assert_eq!(store.get("name"), Some(json!("ada")));
  assert_eq!(store.get("prefs"), Some(json!({"dark": true})));
  assert_eq!(store.get("count"), Some(json!(3)));
  assert_eq!(store.get("missing"), None);
}

#[test]
fn cookies_are_not_envelopes_and_never_expire() {
  let env = TestEnv::new();
  let store = env.cookie_store();

  store.set("token", "abc", Some(Duration::from_secs(5)));
  env.clock.advance(Duration::from_secs(3600));

  assert_eq!(store.get("token"), Some(json!("abc")));
  let file = env.read_data_file(COOKIE_FILENAME).unwrap();
  assert!(file.starts_with("token="));
  assert!(!file.contains("%22v%22"));
}

#[test]
fn cookies_survive_reopening() {
  let env = TestEnv::new();
  env.cookie_store().set("lang", "en", None);

  assert_eq!(env.cookie_store().get("lang"), Some(json!("en")));
}

#[test]
fn remove_reports_success_and_failure() {
  let env = TestEnv::new();
  let store = env.cookie_store();
  store.set("k", "v", None);

  assert!(store.remove("k"));
  assert_eq!(store.get("k"), None);
  assert!(store.remove("k"));

  assert!(!store.remove("not a cookie name"));
}

#[test]
fn rejected_values_yield_none() {
  let env = TestEnv::new();
  let store = env.cookie_store();

  assert_eq!(store.set("k=v", "x", None), None);
  assert_eq!(store.set("huge", "x".repeat(5000), None), None);
  assert_eq!(store.get("huge"), None);
}

#[test]
fn binding_works_on_cookies() {
  let env = TestEnv::new();
  let store = env.cookie_store();
  let scope = Scope::new();

  let mut binding = store.bind(scope.field("spec"), "spec", None, None);
  assert_eq!(scope.get("spec"), Some(json!("")));

  scope.set("spec", "typed");
  binding.digest();
  assert_eq!(store.get("spec"), Some(json!("typed")));

  store.unbind(&mut binding);
  assert_eq!(store.get("spec"), None);
}

#[test]
fn unusable_data_dir_falls_back_to_cookies() {
  let env = TestEnv::new();
  std::fs::write(env.data_dir(), "a file, not a directory").unwrap();

  let store = env.store();
  assert_eq!(store.backend_kind(), BackendKind::Cookie);

  store.set("k", "session only", None);
  assert_eq!(store.get("k"), Some(json!("session only")));
}
