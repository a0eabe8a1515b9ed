//! Names and limits shared across the crate.

/// Application name, used for the default data directory.
pub const APP_NAME: &str = "keystash";

/// Overrides the directory holding the storage files.
pub const DATA_DIR_ENV: &str = "KEYSTASH_DATA_DIR";

/// Forces a backend: `auto`, `local` or `cookie`.
pub const BACKEND_ENV: &str = "KEYSTASH_BACKEND";

/// Local storage file name within the data directory.
pub const LOCAL_STORAGE_FILENAME: &str = "local_storage.json";

/// Cookie jar file name within the data directory.
pub const COOKIE_FILENAME: &str = "cookies.txt";

/// Largest encoded `name=value` pair a cookie may hold.
pub const MAX_COOKIE_BYTES: usize = 4096;
