// click-sentinel-server/tests/hostname_tests.rs
// ============================================================================
// Module: Hostname Derivation Tests
// Description: Tests for whitelist hostname extraction.
// Purpose: Pin the URL-to-hostname mapping used by whitelist matching.
// Dependencies: click-sentinel-server
// ============================================================================
//! ## Overview
//! Absolute URLs contribute their host; unparseable inputs fall back to the
//! raw string so an entry always matches itself.

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

use click_sentinel_server::derive_hostname;

/// Verifies an absolute URL contributes its host.
#[test]
fn absolute_url_yields_host() {
    assert_eq!(derive_hostname("https://trusted.example/form?x=1"), "trusted.example");
}

/// Verifies the port is not part of the derived hostname.
#[test]
fn port_is_stripped() {
    assert_eq!(derive_hostname("http://trusted.example:8080/"), "trusted.example");
}

/// Verifies a bare host falls back to the raw input.
#[test]
fn bare_host_falls_back_to_raw() {
    assert_eq!(derive_hostname("trusted.example"), "trusted.example");
}

/// Verifies surrounding whitespace is trimmed before parsing.
#[test]
fn whitespace_is_trimmed() {
    assert_eq!(derive_hostname("  https://trusted.example/  "), "trusted.example");
}
