// crates/degree-planner-config/tests/support/mod.rs
// ============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config integration tests.
// Purpose: Keep assertions and temp-file setup out of the suites.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::path::PathBuf;

use degree_planner_config::ConfigError;
use tempfile::TempDir;

/// Result type for tests returning string errors.
pub type TestResult = Result<(), String>;

/// Fails with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(message.into()) }
}

/// Asserts that `result` is an error whose message contains `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            ensure(message.contains(needle), format!("error {message} did not contain {needle}"))
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

/// Writes `bytes` to `degree-planner.toml` inside a fresh temp dir.
pub fn write_config(bytes: &[u8]) -> Result<(TempDir, PathBuf), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("degree-planner.toml");
    std::fs::write(&path, bytes).map_err(|err| err.to_string())?;
    Ok((dir, path))
}
