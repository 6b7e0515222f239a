// click-sentinel-core/src/runtime/correlator.rs
// ============================================================================
// Module: Click Sentinel Correlation Engine
// Description: Time-window correlation of page clicks against pointer clicks.
// Purpose: Produce a suspicion verdict for each incoming page click.
// Dependencies: crate::{core, runtime::buffer}
// ============================================================================

//! ## Overview
//! Correlation decides whether a page-level click has a corroborating
//! pointer click close enough in time to be the same physical action. The
//! scan walks the buffer newest to oldest and stops at the first candidate
//! outside the window: the buffer is ordered by monotonic arrival
//! timestamps, so every older candidate is even farther away. This keeps the
//! cost proportional to the number of in-range entries rather than the full
//! buffer. Correlation is a total function: there are no error states.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ClickVerdict;
use crate::runtime::buffer::RecentClickBuffer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default correlation window in milliseconds.
pub const DEFAULT_CORRELATION_WINDOW_MS: u64 = 250;
/// Confidence reported for suspicious verdicts.
const SUSPICIOUS_CONFIDENCE: f64 = 0.9;
/// Confidence reported for matched verdicts.
const MATCH_CONFIDENCE: f64 = 1.0;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Correlation engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationConfig {
    /// Maximum allowed time difference between a page click and a pointer
    /// click, in milliseconds.
    pub window_ms: u64,
}

impl CorrelationConfig {
    /// Creates a configuration with an explicit window.
    #[must_use]
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
        }
    }

    /// Returns the window in seconds, matching click-timestamp units.
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "window values are far below 2^52 ms")]
    pub const fn window_seconds(&self) -> f64 {
        self.window_ms as f64 / 1_000.0
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CORRELATION_WINDOW_MS)
    }
}

// ============================================================================
// SECTION: Correlation
// ============================================================================

/// Correlates a page click against the recent pointer-click buffer.
///
/// An empty buffer yields a suspicious verdict: with no pointer-click signal
/// at all, the conservative default is to flag the click. Otherwise the
/// newest-first scan ends at the first candidate strictly outside the
/// window, so a difference exactly equal to the window still matches.
#[must_use]
pub fn correlate(
    buffer: &RecentClickBuffer,
    page_timestamp: f64,
    config: &CorrelationConfig,
) -> ClickVerdict {
    let snapshot = buffer.recent_first();
    if snapshot.is_empty() {
        return ClickVerdict {
            is_suspicious: true,
            confidence: SUSPICIOUS_CONFIDENCE,
            reason: Some("no pointer clicks recorded".to_string()),
        };
    }

    let window_seconds = config.window_seconds();
    // take_while is the early break: the first out-of-window candidate ends
    // the scan, it is never skipped.
    let matched = snapshot
        .iter()
        .map(|pointer| (page_timestamp - pointer.timestamp).abs())
        .take_while(|time_diff| *time_diff <= window_seconds)
        .next()
        .is_some();

    if matched {
        ClickVerdict {
            is_suspicious: false,
            confidence: MATCH_CONFIDENCE,
            reason: None,
        }
    } else {
        ClickVerdict {
            is_suspicious: true,
            confidence: SUSPICIOUS_CONFIDENCE,
            reason: Some(format!("no pointer click within {}ms", config.window_ms)),
        }
    }
}
