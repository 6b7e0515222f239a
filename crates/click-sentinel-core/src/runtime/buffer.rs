// click-sentinel-core/src/runtime/buffer.rs
// ============================================================================
// Module: Click Sentinel Recent-Click Buffer
// Description: Fixed-capacity FIFO buffer of pointer-click observations.
// Purpose: Hold the most recent pointer clicks for correlation scans.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The recent-click buffer is the sole mutable shared state in the core. It
//! is an explicitly owned, injectable component: callers construct one
//! instance and hand references to the ingestion and correlation entry
//! points, so tests can run against isolated buffers instead of process
//! globals. Appends are serialized behind a single mutex, which makes
//! eviction order consistent with arrival order; readers take a snapshot and
//! may miss clicks appended after their scan started, but never observe a
//! torn entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::core::PointerClick;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default buffer capacity.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1000;

// ============================================================================
// SECTION: Recent-Click Buffer
// ============================================================================

/// Fixed-capacity, append-only, oldest-evicted pointer-click buffer.
///
/// # Invariants
/// - Occupancy never exceeds the configured capacity; the oldest entry is
///   evicted on append when the buffer is full (strict FIFO).
/// - Entries are never mutated after insertion.
/// - Entry order matches arrival order; the correlation scan additionally
///   assumes arrival timestamps are monotonic (not enforced here).
#[derive(Debug)]
pub struct RecentClickBuffer {
    /// Clicks in arrival order, oldest at the front.
    clicks: Mutex<VecDeque<PointerClick>>,
    /// Maximum number of retained clicks.
    capacity: usize,
}

impl RecentClickBuffer {
    /// Creates a buffer with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    /// Creates a buffer with an explicit capacity; a zero capacity is
    /// raised to one so the buffer always retains the latest click.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            clicks: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Appends a pointer click, evicting the oldest entry at capacity.
    ///
    /// Buffer operations cannot fail: a poisoned lock is recovered rather
    /// than propagated, since the queue is valid after any append.
    pub fn append(&self, click: PointerClick) {
        let mut clicks = self.clicks.lock().unwrap_or_else(PoisonError::into_inner);
        if clicks.len() == self.capacity {
            clicks.pop_front();
        }
        clicks.push_back(click);
    }

    /// Returns the current occupancy.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clicks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true when no clicks are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a snapshot of the buffered clicks, newest first.
    ///
    /// Each call takes a fresh, consistent snapshot; clicks appended after
    /// the snapshot is taken are not visible to the returned pass.
    #[must_use]
    pub fn recent_first(&self) -> Vec<PointerClick> {
        let clicks = self.clicks.lock().unwrap_or_else(PoisonError::into_inner);
        clicks.iter().rev().copied().collect()
    }
}

impl Default for RecentClickBuffer {
    fn default() -> Self {
        Self::new()
    }
}
