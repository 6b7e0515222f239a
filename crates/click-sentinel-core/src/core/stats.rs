// click-sentinel-core/src/core/stats.rs
// ============================================================================
// Module: Click Sentinel Statistics Types
// Description: Aggregate statistics shapes for submissions and clicks.
// Purpose: Provide stable reporting structures assembled by the aggregator.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Statistics are read-only views computed over the stored record
//! collections and the recent-click buffer. Nothing here mutates state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Submission Activity
// ============================================================================

/// Submission count for a single hostname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostnameCount {
    /// Target hostname.
    pub hostname: String,
    /// Number of submissions targeting the hostname.
    pub count: u64,
}

/// Submission count for a single UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    /// UTC day bucket as `YYYY-MM-DD`.
    pub date: String,
    /// Number of submissions recorded on the day.
    pub count: u64,
}

/// Overall submission activity statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStats {
    /// Total stored submission count.
    pub total_submissions: u64,
    /// Submissions recorded since the start of the current UTC day.
    pub today_submissions: u64,
    /// Top hostnames by submission count, descending.
    pub top_hostnames: Vec<HostnameCount>,
    /// Per-day counts for the trailing seven days, ascending by date.
    pub recent_activity: Vec<DailyCount>,
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Human/bot classification statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationStats {
    /// Total stored submission count.
    pub total_submissions: u64,
    /// Submissions with a `Human` verdict.
    pub human_submissions: u64,
    /// Submissions with a `Bot` verdict.
    pub bot_submissions: u64,
    /// Submissions without a click correlation.
    pub uncorrelated_submissions: u64,
    /// Percentage of submissions carrying a definite verdict; `0.0` when no
    /// submissions are stored.
    pub correlation_rate: f64,
}

// ============================================================================
// SECTION: Clicks
// ============================================================================

/// Click detection statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickStats {
    /// Total stored page-click count.
    pub total_clicks: u64,
    /// Stored clicks flagged suspicious.
    pub suspicious_clicks: u64,
    /// Stored clicks with a legitimate verdict.
    pub legitimate_clicks: u64,
    /// Distinct non-null page URLs observed.
    pub unique_pages: u64,
    /// Current occupancy of the recent pointer-click buffer.
    pub buffered_pointer_clicks: u64,
}

/// Per-action-type click breakdown row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSummary {
    /// Action classification the row aggregates, when supplied.
    pub action_type: Option<String>,
    /// Number of clicks with this action type.
    pub count: u64,
    /// Number of those clicks flagged suspicious.
    pub suspicious_count: u64,
}
