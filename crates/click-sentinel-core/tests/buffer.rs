// click-sentinel-core/tests/buffer.rs
// ============================================================================
// Module: Recent-Click Buffer Tests
// Description: Tests for the fixed-capacity pointer-click buffer.
// Purpose: Validate FIFO eviction, snapshot ordering, and concurrent appends.
// Dependencies: click-sentinel-core
// ============================================================================
//! ## Overview
//! Ensures the buffer retains exactly the most recent entries in arrival
//! order and stays within capacity under concurrent appends.

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

use std::sync::Arc;
use std::thread;

use click_sentinel_core::DEFAULT_BUFFER_CAPACITY;
use click_sentinel_core::PointerClick;
use click_sentinel_core::RecentClickBuffer;

/// Builds a pointer click at the given sequence index.
fn click_at(index: usize) -> PointerClick {
    let offset = index as f64;
    PointerClick {
        x: offset,
        y: offset,
        timestamp: offset / 1_000.0,
    }
}

/// Verifies appends beyond capacity retain exactly the newest entries.
#[test]
fn buffer_evicts_oldest_beyond_capacity() {
    let buffer = RecentClickBuffer::new();
    let appended = DEFAULT_BUFFER_CAPACITY + 250;
    for index in 0..appended {
        buffer.append(click_at(index));
    }

    assert_eq!(buffer.len(), DEFAULT_BUFFER_CAPACITY);
    let snapshot = buffer.recent_first();
    assert_eq!(snapshot.len(), DEFAULT_BUFFER_CAPACITY);
    // Newest first: the last appended click leads the snapshot.
    assert_eq!(snapshot[0], click_at(appended - 1));
    assert_eq!(snapshot[DEFAULT_BUFFER_CAPACITY - 1], click_at(appended - DEFAULT_BUFFER_CAPACITY));
}

/// Verifies the snapshot runs newest to oldest in arrival order.
#[test]
fn buffer_snapshot_is_newest_first() {
    let buffer = RecentClickBuffer::with_capacity(8);
    for index in 0..5 {
        buffer.append(click_at(index));
    }

    let snapshot = buffer.recent_first();
    let timestamps: Vec<f64> = snapshot.iter().map(|click| click.timestamp).collect();
    let mut sorted = timestamps.clone();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert_eq!(timestamps, sorted);
    assert_eq!(snapshot.len(), 5);
}

/// Verifies an empty buffer reports empty without panicking.
#[test]
fn buffer_starts_empty() {
    let buffer = RecentClickBuffer::new();
    assert!(buffer.is_empty());
    assert_eq!(buffer.len(), 0);
    assert!(buffer.recent_first().is_empty());
    assert_eq!(buffer.capacity(), DEFAULT_BUFFER_CAPACITY);
}

/// Verifies a zero capacity is raised to one.
#[test]
fn buffer_zero_capacity_retains_latest_click() {
    let buffer = RecentClickBuffer::with_capacity(0);
    buffer.append(click_at(1));
    buffer.append(click_at(2));

    assert_eq!(buffer.len(), 1);
    assert_eq!(buffer.recent_first(), vec![click_at(2)]);
}

/// Verifies concurrent appends never exceed capacity or corrupt the queue.
#[test]
fn buffer_concurrent_appends_stay_bounded() {
    let buffer = Arc::new(RecentClickBuffer::with_capacity(64));
    let mut handles = Vec::new();
    for worker in 0..4 {
        let buffer = Arc::clone(&buffer);
        handles.push(thread::spawn(move || {
            for index in 0..500 {
                buffer.append(click_at(worker * 10_000 + index));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(buffer.len(), 64);
    assert_eq!(buffer.recent_first().len(), 64);
}
