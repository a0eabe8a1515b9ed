//! Local storage scenarios: set/get/remove, expiry and persistence.

use std::time::Duration;

use keystash::BackendKind;
use keystash::consts::LOCAL_STORAGE_FILENAME;
use serde_json::{Value, json};

use super::common::TestEnv;

#[test]
fn opens_on_local_storage() {
  let env = TestEnv::new();
  let store = env.store();

  assert_eq!(store.backend_kind(), BackendKind::Local);
  assert!(store.is_supported());
  assert!(env.data_dir().join(LOCAL_STORAGE_FILENAME).exists());
}

#[test]
fn stores_and_reads_a_string() {
  let env = TestEnv::new();
  let store = env.store();

  store.set("spec", "some test string", None);
  assert_eq!(store.get("spec"), Some(json!("some test string")));
}

#[test]
fn supported_types_round_trip() {
  let env = TestEnv::new();
  let store = env.store();

  let cases = [
    ("string", json!("hello")),
    ("integer", json!(42)),
    ("float", json!(2.5)),
    ("negative", json!(-7)),
    ("true", json!(true)),
    ("false", json!(false)),
    ("object", json!({"name": "ada", "tags": ["a", "b"], "nested": {"n": 1}})),
    ("array", json!([1, "two", {"three": 3}])),
  ];

  for (key, value) in &cases {
    store.set(key, value, None);
  }
  for (key, value) in &cases {
    assert_eq!(store.get(key).as_ref(), Some(value), "key {key}");
  }
}

#[test]
fn primitive_looking_strings_are_upgraded() {
  let env = TestEnv::new();
  let store = env.store();

  store.set("n", "42", None);
  store.set("f", "0.5", None);
  store.set("b", "true", None);
  store.set("s", "42 apples", None);

  assert_eq!(store.get("n"), Some(json!(42)));
  assert_eq!(store.get("f"), Some(json!(0.5)));
  assert_eq!(store.get("b"), Some(json!(true)));
  assert_eq!(store.get("s"), Some(json!("42 apples")));
}

#[test]
fn identifier_strings_keep_their_text() {
  let env = TestEnv::new();
  let store = env.store();

  store.set("zip", "007", None);
  store.set("phone", "+1555", None);
  store.set("ratio", ".5", None);

  assert_eq!(store.get("zip"), Some(json!("007")));
  assert_eq!(store.get("phone"), Some(json!("+1555")));
  assert_eq!(store.get("ratio"), Some(json!(".5")));
}

#[test]
fn set_returns_the_written_envelope() {
  let env = TestEnv::new();
  let store = env.store();

  assert_eq!(store.set("k", "hello", None), Some(json!({"v": "hello"})));
  assert_eq!(
    store.set("k", json!({"a": 1}), Some(Duration::from_secs(1))),
    Some(json!({"v": {"a": 1}, "e": 1_700_000_001_000_i64}))
  );
}

#[test]
fn value_expires_after_its_lifetime() {
  let env = TestEnv::new();
  let store = env.store();

  store.set("spec", "i will expire in 5 seconds", Some(Duration::from_secs(5)));

  env.clock.advance(Duration::from_secs(3));
  assert_eq!(store.get("spec"), Some(json!("i will expire in 5 seconds")));

  env.clock.advance(Duration::from_secs(3));
  assert_eq!(store.get("spec"), None);

  let file = env.read_data_file(LOCAL_STORAGE_FILENAME).unwrap();
  let entries: Value = serde_json::from_str(&file).unwrap();
  assert!(entries.get("spec").is_none(), "expired key removed from disk");
}

#[test]
fn rewriting_without_expiry_clears_it() {
  let env = TestEnv::new();
  let store = env.store();

  store.set("k", "short", Some(Duration::from_secs(1)));
  store.set("k", "forever", None);

  env.clock.advance(Duration::from_secs(3600));
  assert_eq!(store.get("k"), Some(json!("forever")));
}

#[test]
fn remove_deletes_and_is_idempotent() {
  let env = TestEnv::new();
  let store = env.store();

  store.set("spec", "value", None);
  assert!(store.remove("spec"));
  assert_eq!(store.get("spec"), None);

  assert!(store.remove("spec"));
  assert!(store.remove("never-existed"));
}

#[test]
fn values_survive_reopening() {
  let env = TestEnv::new();

  {
    let store = env.store();
    store.set("theme", "dark", None);
    store.set("session", "abc", Some(Duration::from_secs(60)));
  }

  let store = env.store();
  assert_eq!(store.get("theme"), Some(json!("dark")));
  assert_eq!(store.get("session"), Some(json!("abc")));

  env.clock.advance(Duration::from_secs(61));
  let store = env.store();
  assert_eq!(store.get("session"), None);
}

#[test]
fn file_holds_envelopes() {
  let env = TestEnv::new();
  let store = env.store();

  store.set("plain", "x", None);
  store.set("timed", 1, Some(Duration::from_secs(10)));

  let file = env.read_data_file(LOCAL_STORAGE_FILENAME).unwrap();
  let entries: Value = serde_json::from_str(&file).unwrap();
  assert_eq!(entries["plain"], json!(r#"{"v":"x"}"#));
  assert_eq!(entries["timed"], json!(r#"{"v":1,"e":1700000010000}"#));
}

#[test]
fn foreign_text_is_returned_raw() {
  let env = TestEnv::new();
  std::fs::create_dir_all(env.data_dir()).unwrap();
  std::fs::write(
    env.data_dir().join(LOCAL_STORAGE_FILENAME),
    r#"{"legacy": "written by something else", "json": "[1,2]"}"#,
  )
  .unwrap();

  let store = env.store();
  assert_eq!(store.get("legacy"), Some(json!("written by something else")));
  assert_eq!(store.get("json"), Some(json!("[1,2]")));
}

#[test]
fn typed_reads() {
  let env = TestEnv::new();
  let store = env.store();

  store.set("ids", vec![3_u32, 1, 2], None);
  assert_eq!(store.get_as::<Vec<u32>>("ids"), Some(vec![3, 1, 2]));
  assert_eq!(store.get_as::<String>("ids"), None);
  assert_eq!(store.get_as::<String>("missing"), None);
}
