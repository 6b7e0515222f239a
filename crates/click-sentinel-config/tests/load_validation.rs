// click-sentinel-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Tests
// Description: Tests for configuration file loading and parse failures.
// Purpose: Ensure loading fails closed on missing or malformed files.
// Dependencies: click-sentinel-config, tempfile
// ============================================================================
//! ## Overview
//! Exercises the load path: a well-formed file round-trips, a malformed one
//! reports a parse error, and a missing one reports an I/O error.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::Path;

use click_sentinel_config::ClickSentinelConfig;
use click_sentinel_config::ConfigError;
use click_sentinel_config::EventStoreType;

/// Writes a config file into the directory and returns its path.
fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("click-sentinel.toml");
    fs::write(&path, content).unwrap();
    path
}

/// Verifies a well-formed config file loads and validates.
#[test]
fn load_accepts_well_formed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[server]
bind = "127.0.0.1:9000"

[store]
type = "sqlite"
path = "data/events.db"

[detection]
buffer_capacity = 500
correlation_window_ms = 100
"#,
    );

    let config = ClickSentinelConfig::load(Some(&path)).unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:9000");
    assert_eq!(config.store.store_type, EventStoreType::Sqlite);
    assert_eq!(config.detection.buffer_capacity, 500);
    assert_eq!(config.detection.correlation_window_ms, 100);
}

/// Verifies malformed TOML reports a parse error.
#[test]
fn load_rejects_malformed_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[server\nbind = ");

    let err = ClickSentinelConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

/// Verifies a missing file reports an I/O error.
#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ClickSentinelConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

/// Verifies a config that parses but fails validation is rejected.
#[test]
fn load_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[detection]
buffer_capacity = 0
"#,
    );

    let err = ClickSentinelConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
