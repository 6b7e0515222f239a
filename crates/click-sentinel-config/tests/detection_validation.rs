// click-sentinel-config/tests/detection_validation.rs
// ============================================================================
// Module: Detection Config Tests
// Description: Tests for detection parameter validation.
// Purpose: Ensure buffer and window tunables are range-checked.
// Dependencies: click-sentinel-config
// ============================================================================
//! ## Overview
//! Exercises the fail-closed range checks on the recent-click buffer
//! capacity and the correlation window.

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

use click_sentinel_config::ClickSentinelConfig;
use click_sentinel_config::ConfigError;

/// Verifies a zero buffer capacity is rejected.
#[test]
fn zero_buffer_capacity_is_rejected() {
    let mut config = ClickSentinelConfig::default();
    config.detection.buffer_capacity = 0;

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

/// Verifies an oversized buffer capacity is rejected.
#[test]
fn oversized_buffer_capacity_is_rejected() {
    let mut config = ClickSentinelConfig::default();
    config.detection.buffer_capacity = 1_000_000;

    assert!(config.validate().is_err());
}

/// Verifies a zero correlation window is rejected.
#[test]
fn zero_correlation_window_is_rejected() {
    let mut config = ClickSentinelConfig::default();
    config.detection.correlation_window_ms = 0;

    assert!(config.validate().is_err());
}

/// Verifies an oversized correlation window is rejected.
#[test]
fn oversized_correlation_window_is_rejected() {
    let mut config = ClickSentinelConfig::default();
    config.detection.correlation_window_ms = 120_000;

    assert!(config.validate().is_err());
}

/// Verifies boundary values are accepted.
#[test]
fn boundary_values_are_accepted() {
    let mut config = ClickSentinelConfig::default();
    config.detection.buffer_capacity = 65_536;
    config.detection.correlation_window_ms = 60_000;

    config.validate().unwrap();
}
