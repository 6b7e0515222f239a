// click-sentinel-core/src/core/submission.rs
// ============================================================================
// Module: Click Sentinel Submission Types
// Description: Submission records and the tri-state bot verdict.
// Purpose: Provide the canonical shape classified by the submission views.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A submission record captures one intercepted form submission, annotated
//! upstream with a bot/human verdict and a click-correlation flag before it
//! reaches storage. The verdict is an explicit three-variant value so that
//! "unknown" can never be silently collapsed into "human"; on the wire it
//! round-trips through the nullable boolean used by the ingestion clients.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::SubmissionId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Bot Verdict
// ============================================================================

/// Tri-state origin verdict for a submission.
///
/// # Invariants
/// - Represents a closed set of outcomes: automated, human, or undetermined.
/// - `Unknown` is distinct from both `Bot` and `Human` in every predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum BotVerdict {
    /// Submission was produced by an automated agent.
    Bot,
    /// Submission was produced by a human.
    Human,
    /// No determination was made upstream.
    #[default]
    Unknown,
}

impl BotVerdict {
    /// Returns true if the verdict is `Bot`.
    #[must_use]
    pub const fn is_bot(self) -> bool {
        matches!(self, Self::Bot)
    }

    /// Returns true if the verdict is `Human`.
    #[must_use]
    pub const fn is_human(self) -> bool {
        matches!(self, Self::Human)
    }

    /// Returns true if the verdict is `Unknown`.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<bool> for BotVerdict {
    fn from(value: bool) -> Self {
        if value { Self::Bot } else { Self::Human }
    }
}

impl From<Option<bool>> for BotVerdict {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unknown, Self::from)
    }
}

impl From<BotVerdict> for Option<bool> {
    fn from(verdict: BotVerdict) -> Self {
        match verdict {
            BotVerdict::Bot => Some(true),
            BotVerdict::Human => Some(false),
            BotVerdict::Unknown => None,
        }
    }
}

// ============================================================================
// SECTION: Click Coordinates
// ============================================================================

/// Screen coordinates of a correlated click, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickPoint {
    /// Horizontal screen coordinate.
    pub x: f64,
    /// Vertical screen coordinate.
    pub y: f64,
}

// ============================================================================
// SECTION: Submission Records
// ============================================================================

/// Submission payload handed to the storage collaborator.
///
/// # Invariants
/// - `matched_values` keys are not validated against `matched_fields`; the
///   two collections are independently settable and independently checked.
/// - `recorded_at` is supplied by the caller; the core never reads the
///   wall clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubmission {
    /// Record creation time.
    pub recorded_at: Timestamp,
    /// Full URL the submission targeted.
    pub target_url: String,
    /// Hostname component of the target URL.
    pub target_hostname: String,
    /// URL of the page that produced the submission.
    pub source_url: String,
    /// Field names detected in the submission payload.
    pub matched_fields: BTreeSet<String>,
    /// Captured values keyed by field name.
    pub matched_values: BTreeMap<String, String>,
    /// HTTP method of the intercepted request.
    pub request_method: String,
    /// Interception status label (for example "detected").
    pub status: String,
    /// Upstream bot/human verdict.
    pub is_bot: BotVerdict,
    /// True iff upstream correlation found a temporally-close click.
    pub has_click_correlation: bool,
    /// Diagnostic: time between correlated click and request, milliseconds.
    pub click_time_diff_ms: Option<i64>,
    /// Diagnostic: coordinates of the correlated click.
    pub click_coordinates: Option<ClickPoint>,
}

/// Persisted submission record.
///
/// # Invariants
/// - Created once, never mutated afterward; upstream annotation happens
///   before storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Storage identifier.
    pub id: SubmissionId,
    /// Record creation time.
    pub recorded_at: Timestamp,
    /// Full URL the submission targeted.
    pub target_url: String,
    /// Hostname component of the target URL.
    pub target_hostname: String,
    /// URL of the page that produced the submission.
    pub source_url: String,
    /// Field names detected in the submission payload.
    pub matched_fields: BTreeSet<String>,
    /// Captured values keyed by field name.
    pub matched_values: BTreeMap<String, String>,
    /// HTTP method of the intercepted request.
    pub request_method: String,
    /// Interception status label.
    pub status: String,
    /// Upstream bot/human verdict.
    pub is_bot: BotVerdict,
    /// True iff upstream correlation found a temporally-close click.
    pub has_click_correlation: bool,
    /// Diagnostic: time between correlated click and request, milliseconds.
    pub click_time_diff_ms: Option<i64>,
    /// Diagnostic: coordinates of the correlated click.
    pub click_coordinates: Option<ClickPoint>,
}

impl SubmissionRecord {
    /// Builds a persisted record from a payload and its assigned identifier.
    #[must_use]
    pub fn from_new(id: SubmissionId, submission: NewSubmission) -> Self {
        Self {
            id,
            recorded_at: submission.recorded_at,
            target_url: submission.target_url,
            target_hostname: submission.target_hostname,
            source_url: submission.source_url,
            matched_fields: submission.matched_fields,
            matched_values: submission.matched_values,
            request_method: submission.request_method,
            status: submission.status,
            is_bot: submission.is_bot,
            has_click_correlation: submission.has_click_correlation,
            click_time_diff_ms: submission.click_time_diff_ms,
            click_coordinates: submission.click_coordinates,
        }
    }

    /// Returns true when both matched-field collections are non-empty.
    ///
    /// The two collections are checked independently; cross-consistency
    /// between field names and value keys is never assumed.
    #[must_use]
    pub fn has_input(&self) -> bool {
        !self.matched_fields.is_empty() && !self.matched_values.is_empty()
    }
}
