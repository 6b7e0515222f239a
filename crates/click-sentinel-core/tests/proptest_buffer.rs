// click-sentinel-core/tests/proptest_buffer.rs
// ============================================================================
// Module: Buffer Property-Based Tests
// Description: Property tests for FIFO eviction across arbitrary workloads.
// Purpose: Verify the buffer always retains the newest entries in order.
// ============================================================================

//! Property-based tests for recent-click buffer invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use click_sentinel_core::PointerClick;
use click_sentinel_core::RecentClickBuffer;
use proptest::prelude::*;

fn click_at(index: usize) -> PointerClick {
    let offset = index as f64;
    PointerClick {
        x: offset,
        y: -offset,
        timestamp: offset / 1_000.0,
    }
}

proptest! {
    /// For any append count and capacity, the buffer holds exactly the most
    /// recently appended entries in arrival order.
    #[test]
    fn buffer_retains_newest_entries_in_arrival_order(
        total in 0usize..600,
        capacity in 1usize..48,
    ) {
        let buffer = RecentClickBuffer::with_capacity(capacity);
        for index in 0..total {
            buffer.append(click_at(index));
        }

        prop_assert_eq!(buffer.len(), total.min(capacity));

        let snapshot = buffer.recent_first();
        let expected: Vec<PointerClick> =
            (0..total).rev().take(capacity).map(click_at).collect();
        prop_assert_eq!(snapshot, expected);
    }
}
