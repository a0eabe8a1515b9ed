
mod fallback_tests;
mod store_tests;
