// Shared helpers for integration tests. Each test file pulls this in with
// `#[path = "../common/mod.rs"]`, so not every helper is used everywhere.
#![allow(dead_code)]


/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
