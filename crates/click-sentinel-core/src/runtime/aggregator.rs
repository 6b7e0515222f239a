// click-sentinel-core/src/runtime/aggregator.rs
// ============================================================================
// Module: Click Sentinel Aggregator
// Description: Statistics assembly over stored records and the click buffer.
// Purpose: Compute reporting views without mutating any state.
// Dependencies: crate::{core, interfaces, runtime::buffer}
// ============================================================================

//! ## Overview
//! The aggregator composes counts supplied by the storage collaborator and
//! the buffer occupancy into the reporting structures. "Now" is an explicit
//! argument on time-relative views; the core never reads the wall clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ActivityStats;
use crate::core::ClassificationStats;
use crate::core::ClickStats;
use crate::core::Timestamp;
use crate::interfaces::ClickCountFilter;
use crate::interfaces::ClickStore;
use crate::interfaces::StoreError;
use crate::interfaces::SubmissionCountFilter;
use crate::interfaces::SubmissionStore;
use crate::runtime::buffer::RecentClickBuffer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of hostnames reported in activity statistics.
pub const TOP_HOSTNAME_LIMIT: usize = 10;
/// Length of the trailing per-day activity window, in days.
pub const TRAILING_ACTIVITY_DAYS: i64 = 7;

// ============================================================================
// SECTION: Submission Activity
// ============================================================================

/// Assembles submission activity statistics relative to `now`.
///
/// # Errors
///
/// Returns [`StoreError`] when a storage query fails, or
/// [`StoreError::Invalid`] when `now` falls outside the representable
/// calendar range.
pub fn activity_stats(
    store: &dyn SubmissionStore,
    now: Timestamp,
) -> Result<ActivityStats, StoreError> {
    let total_submissions = store.count_submissions(SubmissionCountFilter::All)?;
    let day_start = now
        .start_of_utc_day()
        .ok_or_else(|| StoreError::Invalid("timestamp outside calendar range".to_string()))?;
    let today_submissions = store.count_submissions(SubmissionCountFilter::Since(day_start))?;
    let top_hostnames = store.top_hostnames(TOP_HOSTNAME_LIMIT)?;
    let recent_activity = store.daily_counts(now.minus_days(TRAILING_ACTIVITY_DAYS))?;
    Ok(ActivityStats {
        total_submissions,
        today_submissions,
        top_hostnames,
        recent_activity,
    })
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Assembles human/bot classification statistics.
///
/// The correlation rate is the percentage of submissions carrying a definite
/// verdict; it is defined as `0.0` when no submissions are stored.
///
/// # Errors
///
/// Returns [`StoreError`] when a storage query fails.
#[allow(clippy::cast_precision_loss, reason = "counts are far below 2^52")]
pub fn classification_stats(store: &dyn SubmissionStore) -> Result<ClassificationStats, StoreError> {
    let total_submissions = store.count_submissions(SubmissionCountFilter::All)?;
    let human_submissions = store.count_submissions(SubmissionCountFilter::Human)?;
    let bot_submissions = store.count_submissions(SubmissionCountFilter::Bot)?;
    let uncorrelated_submissions = store.count_submissions(SubmissionCountFilter::Uncorrelated)?;
    let correlation_rate = if total_submissions == 0 {
        0.0
    } else {
        (human_submissions + bot_submissions) as f64 / total_submissions as f64 * 100.0
    };
    Ok(ClassificationStats {
        total_submissions,
        human_submissions,
        bot_submissions,
        uncorrelated_submissions,
        correlation_rate,
    })
}

// ============================================================================
// SECTION: Clicks
// ============================================================================

/// Assembles click detection statistics, including buffer occupancy.
///
/// # Errors
///
/// Returns [`StoreError`] when a storage query fails.
pub fn click_stats(
    store: &dyn ClickStore,
    buffer: &RecentClickBuffer,
) -> Result<ClickStats, StoreError> {
    let total_clicks = store.count_clicks(ClickCountFilter::All)?;
    let suspicious_clicks = store.count_clicks(ClickCountFilter::Suspicious)?;
    let legitimate_clicks = store.count_clicks(ClickCountFilter::Legitimate)?;
    let unique_pages = store.distinct_page_count()?;
    Ok(ClickStats {
        total_clicks,
        suspicious_clicks,
        legitimate_clicks,
        unique_pages,
        buffered_pointer_clicks: u64::try_from(buffer.len()).unwrap_or(u64::MAX),
    })
}
