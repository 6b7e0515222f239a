// click-sentinel-core/tests/correlator.rs
// ============================================================================
// Module: Correlation Engine Tests
// Description: Tests for page/pointer click time-window correlation.
// Purpose: Validate verdicts, boundary inclusivity, and early-break scans.
// Dependencies: click-sentinel-core
// ============================================================================
//! ## Overview
//! Exercises the correlation verdicts across empty buffers, in-window and
//! out-of-window candidates, the exact window boundary, and the early-break
//! behavior on the first out-of-window candidate.

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

use click_sentinel_core::CorrelationConfig;
use click_sentinel_core::PointerClick;
use click_sentinel_core::RecentClickBuffer;
use click_sentinel_core::correlate;

/// Builds a pointer click at the given time.
fn pointer_at(timestamp: f64) -> PointerClick {
    PointerClick {
        x: 100.0,
        y: 200.0,
        timestamp,
    }
}

/// Verifies an empty buffer always yields the conservative verdict.
#[test]
fn correlate_empty_buffer_is_suspicious() {
    let buffer = RecentClickBuffer::new();
    let verdict = correlate(&buffer, 10.0, &CorrelationConfig::default());

    assert!(verdict.is_suspicious);
    assert!((verdict.confidence - 0.9).abs() < f64::EPSILON);
    assert_eq!(verdict.reason.as_deref(), Some("no pointer clicks recorded"));
}

/// Verifies an in-window candidate yields a fully legitimate verdict.
#[test]
fn correlate_within_window_matches() {
    let buffer = RecentClickBuffer::new();
    buffer.append(pointer_at(10.000));
    let verdict = correlate(&buffer, 10.249, &CorrelationConfig::default());

    assert!(!verdict.is_suspicious);
    assert!((verdict.confidence - 1.0).abs() < f64::EPSILON);
    assert_eq!(verdict.reason, None);
}

/// Verifies a difference exactly equal to the window still matches.
#[test]
fn correlate_boundary_is_inclusive() {
    let buffer = RecentClickBuffer::new();
    buffer.append(pointer_at(10.000));
    let verdict = correlate(&buffer, 10.250, &CorrelationConfig::default());

    assert!(!verdict.is_suspicious);
    assert!((verdict.confidence - 1.0).abs() < f64::EPSILON);
}

/// Verifies an out-of-window candidate yields a suspicious verdict naming
/// the window.
#[test]
fn correlate_outside_window_is_suspicious() {
    let buffer = RecentClickBuffer::new();
    buffer.append(pointer_at(10.000));
    let verdict = correlate(&buffer, 10.300, &CorrelationConfig::default());

    assert!(verdict.is_suspicious);
    assert!((verdict.confidence - 0.9).abs() < f64::EPSILON);
    let reason = verdict.reason.unwrap();
    assert!(reason.contains("250ms"), "reason should name the window: {reason}");
}

/// Verifies the scan breaks at the first out-of-window candidate instead of
/// continuing to older entries.
#[test]
fn correlate_breaks_on_first_out_of_window_candidate() {
    let buffer = RecentClickBuffer::new();
    // Arrival order: an in-window candidate followed by a newer one that is
    // out of window relative to the page click.
    buffer.append(pointer_at(10.050));
    buffer.append(pointer_at(11.000));
    let verdict = correlate(&buffer, 10.100, &CorrelationConfig::default());

    assert!(verdict.is_suspicious);
}

/// Verifies a wider configured window accepts a farther candidate.
#[test]
fn correlate_honors_configured_window() {
    let buffer = RecentClickBuffer::new();
    buffer.append(pointer_at(10.000));
    let verdict = correlate(&buffer, 10.400, &CorrelationConfig::new(500));

    assert!(!verdict.is_suspicious);
}
